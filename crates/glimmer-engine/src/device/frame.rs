/// One acquired surface texture with its render view and command encoder.
///
/// Holding it blocks acquisition of the next texture; hand it to
/// [`Gpu::submit`](super::Gpu::submit) within the same redraw.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    /// View in the sRGB render format, see `Gpu::surface_format`.
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
