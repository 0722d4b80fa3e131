//! Geometry buffer.
//!
//! Owns the fixed triangle and its layout description. The vertex data is
//! uploaded once at startup and never touched again.

mod buffer;
mod vertex;

pub use buffer::GeometryBuffer;
pub use vertex::{ComponentType, TRIANGLE, Vertex, VertexLayout};
