/// Vertex stage: passes the position attribute at location 0 straight through.
pub const VERTEX_SHADER_SOURCE: &str = include_str!("shaders/triangle.vert");

/// Fragment stage: writes a constant green.
pub const FRAGMENT_SHADER_SOURCE: &str = include_str!("shaders/triangle.frag");

/// Source text for the two stages of the program.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: &'static str,
    pub fragment: &'static str,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            vertex: VERTEX_SHADER_SOURCE,
            fragment: FRAGMENT_SHADER_SOURCE,
        }
    }
}
