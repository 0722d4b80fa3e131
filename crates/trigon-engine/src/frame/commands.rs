use std::ops::Range;

use crate::device::Device;
use crate::geometry::{GeometryBuffer, VertexLayout};
use crate::pipeline::Program;

/// Color the surface is cleared to at the start of each frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ClearColor {
    pub const OPAQUE_BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
}

impl Default for ClearColor {
    fn default() -> Self {
        Self::OPAQUE_BLACK
    }
}

/// One recorded device operation.
pub enum FrameCommand<'r, D: Device> {
    Clear(ClearColor),
    UseProgram(&'r D::Program),
    BindGeometry {
        buffer: &'r D::Buffer,
    },
    Draw {
        vertices: Range<u32>,
    },
    UnbindGeometry,
}

/// A finished frame, ready to be handed to [`Device::present`].
pub struct FrameCommands<'r, D: Device> {
    commands: Vec<FrameCommand<'r, D>>,
}

impl<'r, D: Device> FrameCommands<'r, D> {
    pub fn iter(&self) -> impl Iterator<Item = &FrameCommand<'r, D>> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Clear color if the frame starts with a clear.
    pub fn clear_color(&self) -> Option<ClearColor> {
        match self.commands.first() {
            Some(FrameCommand::Clear(c)) => Some(*c),
            _ => None,
        }
    }

    /// Number of draw commands in the frame.
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, FrameCommand::Draw { .. }))
            .count()
    }
}

/// Records one frame. Always starts with a clear.
pub struct FrameEncoder<'r, D: Device> {
    commands: Vec<FrameCommand<'r, D>>,
}

impl<'r, D: Device> FrameEncoder<'r, D> {
    pub fn new(clear: ClearColor) -> Self {
        Self {
            commands: vec![FrameCommand::Clear(clear)],
        }
    }

    /// Makes `program` the active pipeline until the returned scope ends.
    ///
    /// The encoder is borrowed by the scope, so a second program cannot be
    /// activated while the first one is still in use.
    pub fn use_program<'a>(&'a mut self, program: &'r Program<D>) -> ActiveProgram<'a, 'r, D> {
        self.commands.push(FrameCommand::UseProgram(program.handle()));
        ActiveProgram {
            encoder: self,
            layout: *program.layout(),
        }
    }

    pub fn finish(self) -> FrameCommands<'r, D> {
        FrameCommands {
            commands: self.commands,
        }
    }
}

/// Scope in which one program is active.
pub struct ActiveProgram<'a, 'r, D: Device> {
    encoder: &'a mut FrameEncoder<'r, D>,
    layout: VertexLayout,
}

impl<'a, 'r, D: Device> ActiveProgram<'a, 'r, D> {
    /// Binds `geometry` for drawing. Unbinding happens when the returned scope
    /// is dropped (or [`BoundGeometry::unbind`] is called).
    pub fn bind<'b>(&'b mut self, geometry: &'r GeometryBuffer<D>) -> BoundGeometry<'b, 'r, D> {
        debug_assert_eq!(
            geometry.layout(),
            &self.layout,
            "geometry layout differs from the layout the program was linked against"
        );

        self.encoder.commands.push(FrameCommand::BindGeometry {
            buffer: geometry.handle(),
        });

        BoundGeometry {
            encoder: &mut *self.encoder,
            vertex_count: geometry.vertex_count(),
        }
    }
}

/// Scope in which a geometry buffer is bound. The only place draws can be issued.
pub struct BoundGeometry<'b, 'r, D: Device> {
    encoder: &'b mut FrameEncoder<'r, D>,
    vertex_count: u32,
}

impl<'b, 'r, D: Device> BoundGeometry<'b, 'r, D> {
    /// Draws `vertices` of the bound buffer as a triangle list.
    pub fn draw(&mut self, vertices: Range<u32>) {
        debug_assert!(
            vertices.start <= vertices.end && vertices.end <= self.vertex_count,
            "draw range {vertices:?} outside bound geometry (0..{})",
            self.vertex_count
        );
        self.encoder.commands.push(FrameCommand::Draw { vertices });
    }

    /// Ends the binding scope early.
    pub fn unbind(self) {}
}

impl<'b, 'r, D: Device> Drop for BoundGeometry<'b, 'r, D> {
    fn drop(&mut self) {
        self.encoder.commands.push(FrameCommand::UnbindGeometry);
    }
}
