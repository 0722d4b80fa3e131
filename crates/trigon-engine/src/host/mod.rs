//! Host surface.
//!
//! The host owns the window, tells the loop when the user asked to close it,
//! and pumps its event queue between frames.

mod winit;

pub use self::winit::WinitSurface;

/// Window configuration. The surface is fixed-size.
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            title: "Computer Graphics".to_string(),
            width: 1280,
            height: 720,
            resizable: false,
        }
    }
}

/// What the frame loop needs from the host.
pub trait SurfaceProvider {
    /// `true` once the host has asked the window to close.
    fn should_close(&self) -> bool;

    /// Called by the device after the frame is submitted and right before
    /// the image is presented. Not called for skipped frames.
    fn pre_present(&self) {}

    /// Dispatches pending host events without blocking.
    fn poll_events(&mut self);
}
