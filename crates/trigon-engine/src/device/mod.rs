//! Graphics device.
//!
//! [`Device`] is the seam between the engine and the GPU backend. The engine
//! creates resources through it and hands it one recorded frame at a time;
//! it never touches backend state directly.
//!
//! [`Gpu`] is the wgpu implementation. It also owns the swapchain, which is why
//! presenting goes through the device rather than the surface provider.

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;

use crate::error::{FrameError, LinkError};
use crate::frame::FrameCommands;
use crate::geometry::VertexLayout;
use crate::pipeline::StageUnit;

/// Result of presenting one frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// The frame reached the surface.
    Presented,
    /// The surface was not ready (lost, outdated, timed out); nothing was drawn.
    Skipped,
}

/// Backend contract.
///
/// Handles are owned values: dropping a `Buffer` or `Program` releases the
/// device resource, so release happens exactly once.
pub trait Device: Sized {
    type Buffer;
    type Program;

    /// Allocates a static vertex buffer initialized with `contents`.
    ///
    /// Allocation failure is an unrecoverable environment fault.
    fn create_vertex_buffer(&mut self, label: &str, contents: &[u8]) -> Self::Buffer;

    /// Builds the executable pipeline for two already validated stages.
    fn create_program(
        &mut self,
        vertex: &StageUnit,
        fragment: &StageUnit,
        layout: &VertexLayout,
    ) -> Result<Self::Program, LinkError>;

    /// Executes a recorded frame against the current surface image and presents it.
    ///
    /// `pre_present` is called right before the image is handed to the
    /// presentation engine, and only if the frame is actually presented.
    fn present(
        &mut self,
        commands: &FrameCommands<'_, Self>,
        pre_present: impl FnOnce(),
    ) -> Result<FrameOutcome, FrameError>;
}
