use crate::coords::Resolution;

/// Texture sampling filter, applied per layer, per loaded texture and to the lightmap.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Crisp texels; the default for layers so pixel art stays sharp when upscaled.
    #[default]
    Nearest,
    Linear,
}

impl FilterMode {
    #[inline]
    pub(crate) fn to_wgpu(self) -> wgpu::FilterMode {
        match self {
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
            FilterMode::Linear => wgpu::FilterMode::Linear,
        }
    }

    pub(crate) fn create_sampler(self, device: &wgpu::Device) -> wgpu::Sampler {
        let label = match self {
            FilterMode::Nearest => "glimmer nearest sampler",
            FilterMode::Linear => "glimmer linear sampler",
        };
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: self.to_wgpu(),
            min_filter: self.to_wgpu(),
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        })
    }
}

/// One sampler per [`FilterMode`], created once and shared by all passes.
pub(crate) struct Samplers {
    nearest: wgpu::Sampler,
    linear: wgpu::Sampler,
}

impl Samplers {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        Self {
            nearest: FilterMode::Nearest.create_sampler(device),
            linear: FilterMode::Linear.create_sampler(device),
        }
    }

    #[inline]
    pub(crate) fn get(&self, mode: FilterMode) -> &wgpu::Sampler {
        match mode {
            FilterMode::Nearest => &self.nearest,
            FilterMode::Linear => &self.linear,
        }
    }
}

/// GPU texture with its default view.
///
/// Render targets (layers, accumulator, lightmap) and uploaded images share
/// this type; `filter` only matters when the texture is blitted.
pub struct Texture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: Resolution,
    pub filter: FilterMode,
}

impl Texture {
    /// Allocates a texture usable as render attachment, sampling source and copy endpoint.
    pub(crate) fn render_target(
        device: &wgpu::Device,
        label: &str,
        size: Resolution,
        format: wgpu::TextureFormat,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: size.to_extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        Self::from_wgpu(texture, size)
    }

    /// Uploads straight-alpha sRGB RGBA8 pixels.
    pub(crate) fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        size: Resolution,
        pixels: &[u8],
    ) -> Self {
        debug_assert_eq!(pixels.len(), size.width as usize * size.height as usize * 4);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: size.to_extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size.width * 4),
                rows_per_image: Some(size.height),
            },
            size.to_extent(),
        );

        Self::from_wgpu(texture, size)
    }

    fn from_wgpu(texture: wgpu::Texture, size: Resolution) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            size,
            filter: FilterMode::Nearest,
        }
    }

    #[inline]
    pub fn size(&self) -> Resolution {
        self.size
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.texture.format()
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn raw(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// Copy source/destination descriptor for the whole mip 0.
    #[inline]
    pub(crate) fn copy_info(&self) -> wgpu::TexelCopyTextureInfo<'_> {
        wgpu::TexelCopyTextureInfo {
            texture: &self.texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        }
    }
}
