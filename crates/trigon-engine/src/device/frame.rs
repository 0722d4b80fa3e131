/// The swapchain image a frame is being recorded into.
///
/// Lives for one `present` call. Submission happens before `present()` is
/// called on the texture, and the next image cannot be acquired while this
/// one is held.
pub(crate) struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
