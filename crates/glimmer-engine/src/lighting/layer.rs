use crate::coords::Resolution;
use crate::paint::Color;
use crate::render::Texture;
use crate::render::common;

/// Draw target selector for sprite blits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Lit: multiplied by the lightmap at composite time.
    Background,
    /// Unlit: drawn over the lit background.
    Foreground,
}

/// Format of both layer targets.
pub(crate) const LAYER_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// The two native-resolution layer targets.
pub(crate) struct Layers {
    background: Texture,
    foreground: Texture,
}

impl Layers {
    pub(crate) fn new(device: &wgpu::Device, native: Resolution) -> Self {
        Self {
            background: Texture::render_target(device, "glimmer background layer", native, LAYER_FORMAT),
            foreground: Texture::render_target(device, "glimmer foreground layer", native, LAYER_FORMAT),
        }
    }

    #[inline]
    pub(crate) fn get(&self, layer: Layer) -> &Texture {
        match layer {
            Layer::Background => &self.background,
            Layer::Foreground => &self.foreground,
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, layer: Layer) -> &mut Texture {
        match layer {
            Layer::Background => &mut self.background,
            Layer::Foreground => &mut self.foreground,
        }
    }

    /// Background to `color`, foreground to transparent.
    pub(crate) fn clear(&self, encoder: &mut wgpu::CommandEncoder, color: Color) {
        common::clear_view(encoder, "glimmer background clear", self.background.view(), color.to_linear().to_wgpu());
        common::clear_view(
            encoder,
            "glimmer foreground clear",
            self.foreground.view(),
            wgpu::Color::TRANSPARENT,
        );
    }
}
