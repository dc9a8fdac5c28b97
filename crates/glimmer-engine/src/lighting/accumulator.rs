use crate::coords::Resolution;
use crate::paint::Color;
use crate::render::Texture;
use crate::render::common;

use super::PingPong;

/// Format of the accumulator and the lightmap; sums of several lights must not clip.
pub(crate) const LIGHT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Double-buffered light accumulation targets.
pub(crate) struct Accumulator {
    targets: PingPong<Texture>,
}

impl Accumulator {
    pub(crate) fn new(device: &wgpu::Device, size: Resolution) -> Self {
        Self {
            targets: PingPong::new(
                Texture::render_target(device, "glimmer accumulator a", size, LIGHT_FORMAT),
                Texture::render_target(device, "glimmer accumulator b", size, LIGHT_FORMAT),
            ),
        }
    }

    #[inline]
    pub(crate) fn read(&self) -> &Texture {
        self.targets.read()
    }

    /// Slot currently read from; selects the matching pre-built bind group.
    #[inline]
    pub(crate) fn read_index(&self) -> usize {
        self.targets.read_index()
    }

    #[inline]
    pub(crate) fn flip(&mut self) {
        self.targets.flip();
    }

    pub(crate) fn textures(&self) -> &[Texture; 2] {
        self.targets.both()
    }

    /// Clears both targets and restores the initial roles.
    pub(crate) fn clear(&mut self, encoder: &mut wgpu::CommandEncoder, color: Color) {
        for target in self.targets.both() {
            common::clear_view(encoder, "glimmer accumulator clear", target.view(), color.to_wgpu());
        }
        self.targets.reset();
    }
}
