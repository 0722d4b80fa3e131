use crate::device::Device;

use super::{Vertex, VertexLayout};

/// Vertex data resident on the device plus the layout needed to read it.
///
/// Created once, read-only afterwards. The device buffer is released when this
/// value is dropped, so it is released exactly once on every exit path.
pub struct GeometryBuffer<D: Device> {
    buffer: D::Buffer,
    layout: VertexLayout,
    vertex_count: u32,
}

impl<D: Device> GeometryBuffer<D> {
    /// Uploads `vertices` once with static usage.
    ///
    /// Allocation failure is not recoverable; the device treats it as fatal.
    pub fn create(device: &mut D, label: &str, vertices: &[Vertex]) -> Self {
        let contents: &[u8] = bytemuck::cast_slice(vertices);
        let layout = Vertex::LAYOUT;
        let vertex_count = layout.vertex_count(contents.len() as u64);

        let buffer = device.create_vertex_buffer(label, contents);
        log::debug!(
            "uploaded {vertex_count} vertices ({} bytes) to '{label}'",
            contents.len()
        );

        Self {
            buffer,
            layout,
            vertex_count,
        }
    }

    #[inline]
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Device handle, for backends executing recorded frames.
    #[inline]
    pub fn handle(&self) -> &D::Buffer {
        &self.buffer
    }
}

impl<D: Device> Drop for GeometryBuffer<D> {
    fn drop(&mut self) {
        log::debug!("releasing geometry buffer ({} vertices)", self.vertex_count);
    }
}
