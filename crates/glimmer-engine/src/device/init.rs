/// Device and surface options, derived from [`DisplayConfig`](crate::lighting::DisplayConfig).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Render through an sRGB view; the composite outputs linear color.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Falls back to the first supported mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,

    /// Hull geometry is read from fragment-stage storage buffers, which
    /// downlevel (WebGL2) limits do not provide.
    pub required_limits: wgpu::Limits,

    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    pub fn with_vsync(vsync: bool) -> Self {
        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        Self {
            present_mode,
            ..Self::default()
        }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vsync_toggle_selects_present_mode() {
        assert_eq!(GpuInit::with_vsync(true).present_mode, wgpu::PresentMode::AutoVsync);
        assert_eq!(GpuInit::with_vsync(false).present_mode, wgpu::PresentMode::AutoNoVsync);
        assert!(GpuInit::default().prefer_srgb);
    }
}
