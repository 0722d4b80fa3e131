//! Trigon engine crate.
//!
//! This crate owns everything needed to put one static triangle on screen:
//! vertex upload, shader stage compilation and linking, the per-frame loop,
//! and the wgpu/winit backends that the loop drives.

pub mod app;
pub mod device;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod host;
pub mod pipeline;

pub mod logging;

#[cfg(test)]
mod testing;
