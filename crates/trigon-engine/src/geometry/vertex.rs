use bytemuck::{Pod, Zeroable};

/// Position-only vertex: three `f32` components.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
}

impl Vertex {
    /// Layout of a tightly packed `Vertex` array.
    pub const LAYOUT: VertexLayout = VertexLayout {
        attribute_index: 0,
        components: 3,
        component_type: ComponentType::Float32,
        stride: 3 * ComponentType::Float32.size(),
        offset: 0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { pos: [x, y, z] }
    }
}

/// The triangle drawn every frame, in normalized device coordinates.
pub const TRIANGLE: [Vertex; 3] = [
    Vertex::new(-0.5, -0.5, 0.0),
    Vertex::new(0.5, -0.5, 0.0),
    Vertex::new(0.0, 0.5, 0.0),
];

/// Scalar type of one vertex component.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ComponentType {
    Float32,
}

impl ComponentType {
    /// Size of one component in bytes.
    #[inline]
    pub const fn size(self) -> u64 {
        match self {
            ComponentType::Float32 => 4,
        }
    }
}

/// How raw buffer bytes map onto one vertex attribute.
///
/// Mirrors a single `glVertexAttribPointer` call: attribute index, component
/// count and type, byte stride between vertices, byte offset of the first one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    pub attribute_index: u32,
    pub components: u32,
    pub component_type: ComponentType,
    pub stride: u64,
    pub offset: u64,
}

impl VertexLayout {
    /// Number of whole vertices contained in `byte_len` bytes.
    pub fn vertex_count(&self, byte_len: u64) -> u32 {
        if self.stride == 0 || byte_len <= self.offset {
            return 0;
        }
        ((byte_len - self.offset) / self.stride) as u32
    }
}
