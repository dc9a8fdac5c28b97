use winit::dpi::PhysicalSize;

/// What the caller should do after a failed frame acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was configured again; the next frame should succeed.
    Reconfigured,
    /// Drop this frame and try again on the next redraw.
    SkipFrame,
    /// The device cannot continue (out of memory).
    Fatal,
}

/// Format the surface is configured with, and the format frames are rendered in.
///
/// The composite writes linear color, so the render view must be sRGB. When
/// the surface only offers non-sRGB formats, an sRGB view format is added.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct SurfaceFormats {
    pub surface: wgpu::TextureFormat,
    pub view: wgpu::TextureFormat,
}

pub(crate) fn choose_formats(caps: &wgpu::SurfaceCapabilities, prefer_srgb: bool) -> Option<SurfaceFormats> {
    let first = *caps.formats.first()?;
    if !prefer_srgb {
        return Some(SurfaceFormats { surface: first, view: first });
    }

    if let Some(&srgb) = caps.formats.iter().find(|f| f.is_srgb()) {
        return Some(SurfaceFormats { surface: srgb, view: srgb });
    }

    Some(SurfaceFormats {
        surface: first,
        view: first.add_srgb_suffix(),
    })
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

pub(crate) fn choose_present_mode(caps: &wgpu::SurfaceCapabilities, requested: wgpu::PresentMode) -> wgpu::PresentMode {
    match requested {
        // Auto modes always resolve to something supported.
        wgpu::PresentMode::AutoVsync | wgpu::PresentMode::AutoNoVsync => requested,
        mode if caps.present_modes.contains(&mode) => mode,
        mode => {
            log::warn!("present mode {mode:?} unsupported by surface; falling back to Fifo");
            wgpu::PresentMode::Fifo
        }
    }
}

/// Window surface plus its live configuration.
pub(crate) struct SurfaceState<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
    view_format: wgpu::TextureFormat,
    size: PhysicalSize<u32>,
}

impl<'w> SurfaceState<'w> {
    pub(crate) fn new(
        surface: wgpu::Surface<'w>,
        device: &wgpu::Device,
        formats: SurfaceFormats,
        present_mode: wgpu::PresentMode,
        alpha_mode: wgpu::CompositeAlphaMode,
        desired_maximum_frame_latency: u32,
        size: PhysicalSize<u32>,
    ) -> Self {
        let view_formats = if formats.view != formats.surface {
            vec![formats.view]
        } else {
            vec![]
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: formats.surface,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats,
            desired_maximum_frame_latency,
        };
        surface.configure(device, &config);

        log::debug!(
            "surface configured: {}x{} {:?} (view {:?}) {:?}",
            config.width,
            config.height,
            config.format,
            formats.view,
            config.present_mode
        );

        Self {
            surface,
            config,
            view_format: formats.view,
            size,
        }
    }

    #[inline]
    pub(crate) fn view_format(&self) -> wgpu::TextureFormat {
        self.view_format
    }

    #[inline]
    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// A minimized window reports 0x0, which wgpu cannot configure; only
    /// the tracked size changes then.
    pub(crate) fn resize(&mut self, device: &wgpu::Device, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(device, &self.config);
    }

    /// Next surface texture and a view of it in the render format.
    pub(crate) fn acquire(&self) -> Result<(wgpu::SurfaceTexture, wgpu::TextureView), wgpu::SurfaceError> {
        let texture = self.surface.get_current_texture()?;
        let view = texture.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.view_format),
            ..Default::default()
        });
        Ok((texture, view))
    }

    pub(crate) fn recover(&self, device: &wgpu::Device, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                if self.size.width > 0 && self.size.height > 0 {
                    self.surface.configure(device, &self.config);
                }
                log::debug!("surface {err:?}; reconfigured");
                SurfaceErrorAction::Reconfigured
            }
            wgpu::SurfaceError::OutOfMemory => {
                log::error!("surface out of memory");
                SurfaceErrorAction::Fatal
            }
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => {
                log::warn!("surface {err:?}; skipping frame");
                SurfaceErrorAction::SkipFrame
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: &[wgpu::TextureFormat]) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            present_modes: vec![wgpu::PresentMode::Fifo],
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    #[test]
    fn picks_srgb_surface_when_offered() {
        let f = choose_formats(
            &caps(&[wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Bgra8UnormSrgb]),
            true,
        )
        .unwrap();
        assert_eq!(f.surface, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(f.view, f.surface);
    }

    #[test]
    fn adds_srgb_view_to_linear_surface() {
        let f = choose_formats(&caps(&[wgpu::TextureFormat::Rgba8Unorm]), true).unwrap();
        assert_eq!(f.surface, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(f.view, wgpu::TextureFormat::Rgba8UnormSrgb);
    }

    #[test]
    fn no_formats_means_no_surface() {
        assert!(choose_formats(&caps(&[]), true).is_none());
    }

    #[test]
    fn unsupported_requests_fall_back() {
        let c = caps(&[wgpu::TextureFormat::Bgra8UnormSrgb]);
        assert_eq!(choose_present_mode(&c, wgpu::PresentMode::Mailbox), wgpu::PresentMode::Fifo);
        assert_eq!(choose_present_mode(&c, wgpu::PresentMode::AutoNoVsync), wgpu::PresentMode::AutoNoVsync);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
    }
}
