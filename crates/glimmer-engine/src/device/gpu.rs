use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::{self, SurfaceState};
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// Device, queue and the window surface they present to.
///
/// Only constructible from a live window, so anything that needs a `Gpu`
/// (the lighting engine included) is created after the window.
pub struct Gpu<'w> {
    _instance: wgpu::Instance,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: SurfaceState<'w>,
}

async fn open_device(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
    features: wgpu::Features,
    limits: wgpu::Limits,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .context("no GPU adapter can present to this window")?;

    let info = adapter.get_info();
    log::info!("adapter: {} ({:?}, {})", info.name, info.backend, info.driver);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("glimmer device"),
            required_features: features,
            required_limits: limits,
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("adapter refused the requested features/limits")?;

    let granted = device.limits();
    log::debug!(
        "max texture {}px, uniform offset alignment {}",
        granted.max_texture_dimension_2d,
        granted.min_uniform_buffer_offset_alignment
    );

    Ok((adapter, device, queue))
}

impl<'w> Gpu<'w> {
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(
            size.width > 0 && size.height > 0,
            "cannot create a surface for a {}x{} window",
            size.width,
            size.height
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let raw_surface = instance
            .create_surface(window)
            .context("window surface creation failed")?;

        let (adapter, device, queue) =
            open_device(&instance, &raw_surface, init.required_features, init.required_limits).await?;

        let caps = raw_surface.get_capabilities(&adapter);
        let formats = surface::choose_formats(&caps, init.prefer_srgb)
            .context("surface reports no texture formats for this adapter")?;
        if init.prefer_srgb && formats.view != formats.surface {
            log::info!("surface has no sRGB format; rendering through a {:?} view", formats.view);
        }

        let surface = SurfaceState::new(
            raw_surface,
            &device,
            formats,
            surface::choose_present_mode(&caps, init.present_mode),
            surface::choose_alpha_mode(&caps, init.alpha_mode),
            init.desired_maximum_frame_latency,
            size,
        );

        Ok(Self {
            _instance: instance,
            device,
            queue,
            surface,
        })
    }

    /// Format frames are rendered in; what display pipelines must target.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface.view_format()
    }

    /// Drawable size in physical pixels. May be 0x0 while minimized.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.surface.size()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.surface.resize(&self.device, new_size);
    }

    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, wgpu::SurfaceError> {
        let (surface_texture, view) = self.surface.acquire()?;
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("glimmer frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the frame's commands and presents its surface texture.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    pub fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        self.surface.recover(&self.device, err)
    }
}
