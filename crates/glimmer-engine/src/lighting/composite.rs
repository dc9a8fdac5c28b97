//! Final composite onto the display target.

use bytemuck::{Pod, Zeroable};

use crate::coords::Resolution;
use crate::paint::Color;
use crate::render::blit::BlitRenderer;
use crate::render::common;
use crate::render::Texture;
use crate::render::texture::Samplers;

const COMPOSITE_WGSL: &str = include_str!("shaders/composite.wgsl");

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CompositeUniform {
    ambient: [f32; 4],
    max_luminosity: f32,
    _pad: [f32; 3],
}

/// Viewport `(x, y, width, height)` for compositing `native` onto `target`.
///
/// Without integer scaling the whole target is used. With it, the largest
/// integer multiple of `native` that fits is centered; if not even 1x fits,
/// the whole target is used instead.
pub fn composite_viewport(target: Resolution, native: Resolution, integer_scale: bool) -> [f32; 4] {
    let full = [0.0, 0.0, target.width as f32, target.height as f32];
    if !integer_scale || !native.is_valid() {
        return full;
    }

    let scale = (target.width / native.width).min(target.height / native.height);
    if scale == 0 {
        return full;
    }

    let w = native.width * scale;
    let h = native.height * scale;
    [
        ((target.width - w) / 2) as f32,
        ((target.height - h) / 2) as f32,
        w as f32,
        h as f32,
    ]
}

pub(crate) struct Compositor {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    params: wgpu::Buffer,
    background_group: wgpu::BindGroup,
    foreground_group: wgpu::BindGroup,
}

impl Compositor {
    pub(crate) fn new(
        device: &wgpu::Device,
        display_format: wgpu::TextureFormat,
        blit: &BlitRenderer,
        samplers: &Samplers,
        background: &Texture,
        foreground: &Texture,
        lightmap: &Texture,
    ) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glimmer composite bgl"),
            entries: &[
                common::texture_entry(0),
                common::sampler_entry(1),
                common::texture_entry(2),
                common::sampler_entry(3),
                common::uniform_entry::<CompositeUniform>(4, wgpu::ShaderStages::FRAGMENT, false),
            ],
        });

        let params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("glimmer composite params"),
            size: std::mem::size_of::<CompositeUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let shader = common::fullscreen_shader(device, "glimmer composite shader", COMPOSITE_WGSL);
        let pipeline = common::fullscreen_pipeline(
            device,
            "glimmer composite pipeline",
            &shader,
            "fs_composite",
            &[&layout],
            display_format,
            None,
        );

        let background_group = Self::background_group(device, &layout, &params, samplers, background, lightmap);
        let foreground_group = blit.bind_texture(device, foreground, samplers.get(foreground.filter));

        Self {
            pipeline,
            layout,
            params,
            background_group,
            foreground_group,
        }
    }

    fn background_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        params: &wgpu::Buffer,
        samplers: &Samplers,
        background: &Texture,
        lightmap: &Texture,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glimmer composite bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(background.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(samplers.get(background.filter)),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(lightmap.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(samplers.get(lightmap.filter)),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: params.as_entire_binding(),
                },
            ],
        })
    }

    /// Rebuilds bind groups after a filter change.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn rebind(
        &mut self,
        device: &wgpu::Device,
        blit: &BlitRenderer,
        samplers: &Samplers,
        background: &Texture,
        foreground: &Texture,
        lightmap: &Texture,
    ) {
        self.background_group =
            Self::background_group(device, &self.layout, &self.params, samplers, background, lightmap);
        self.foreground_group = blit.bind_texture(device, foreground, samplers.get(foreground.filter));
    }

    pub(crate) fn prepare(&self, queue: &wgpu::Queue, ambient: Color, max_luminosity: f32) {
        let uniform = CompositeUniform {
            ambient: ambient.to_array(),
            max_luminosity,
            _pad: [0.0; 3],
        };
        queue.write_buffer(&self.params, 0, bytemuck::bytes_of(&uniform));
    }

    /// Clears `target` to black, draws the lit background, then the unlit foreground.
    pub(crate) fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        blit: &BlitRenderer,
        target: &wgpu::TextureView,
        viewport: [f32; 4],
    ) {
        let mut rpass = common::color_pass(
            encoder,
            "glimmer composite pass",
            target,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
        );
        let [x, y, w, h] = viewport;
        rpass.set_viewport(x, y, w, h, 0.0, 1.0);

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.background_group, &[]);
        rpass.draw(0..3, 0..1);

        blit.draw_layer(&mut rpass, &self.foreground_group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_32_bytes() {
        assert_eq!(std::mem::size_of::<CompositeUniform>(), 32);
    }

    #[test]
    fn stretch_uses_whole_target() {
        let vp = composite_viewport(Resolution::new(1920, 1080), Resolution::new(320, 200), false);
        assert_eq!(vp, [0.0, 0.0, 1920.0, 1080.0]);
    }

    #[test]
    fn integer_scale_centers_largest_multiple() {
        let vp = composite_viewport(Resolution::new(1920, 1080), Resolution::new(320, 200), true);
        // 5x: 1600x1000
        assert_eq!(vp, [160.0, 40.0, 1600.0, 1000.0]);
    }

    #[test]
    fn integer_scale_exact_fit() {
        let vp = composite_viewport(Resolution::new(1280, 720), Resolution::new(640, 360), true);
        assert_eq!(vp, [0.0, 0.0, 1280.0, 720.0]);
    }

    #[test]
    fn integer_scale_falls_back_when_native_is_larger() {
        let vp = composite_viewport(Resolution::new(300, 200), Resolution::new(320, 200), true);
        assert_eq!(vp, [0.0, 0.0, 300.0, 200.0]);
    }
}
