//! Pipeline program.
//!
//! Two stage units (vertex, fragment) are compiled from GLSL, validated, then
//! linked into a single program the device can draw with.
//!
//! Each step follows the same protocol: build the object, check its status,
//! and only render a diagnostic when the status is a failure.

mod interface;
mod program;
mod source;
mod stage;

pub use program::{link, Program};
pub use source::{ShaderSources, FRAGMENT_SHADER_SOURCE, VERTEX_SHADER_SOURCE};
pub use stage::{compile, StageKind, StageUnit};

pub use crate::error::{CompileError, LinkError};
