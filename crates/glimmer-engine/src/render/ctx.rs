use crate::coords::Resolution;

/// Target for drawing (encoder + color view + its pixel size).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub size: Resolution,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        size: Resolution,
    ) -> Self {
        Self { encoder, color_view, size }
    }
}
