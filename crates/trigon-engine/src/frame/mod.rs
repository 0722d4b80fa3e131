//! Frame recording and the render loop.
//!
//! A frame is recorded as a short command list before the device sees it.
//! The active program and the bound geometry are explicit scope values on the
//! recorder rather than ambient device state:
//!
//! ```text
//! FrameEncoder::new(clear)          -> Clear
//!   .use_program(&program)          -> UseProgram      (ActiveProgram)
//!     .bind(&geometry)              -> BindGeometry    (BoundGeometry)
//!       .draw(0..3)                 -> Draw
//!     <drop BoundGeometry>          -> UnbindGeometry
//! ```
//!
//! [`FrameLoop`] repeats that once per iteration until the surface asks to close.

mod commands;
mod frame_loop;

pub use commands::{
    ActiveProgram, BoundGeometry, ClearColor, FrameCommand, FrameCommands, FrameEncoder,
};
pub use frame_loop::{FrameLoop, LoopReport, LoopState};
