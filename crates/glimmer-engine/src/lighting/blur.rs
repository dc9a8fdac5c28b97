//! Separable Gaussian blur from the accumulator into the lightmap.

use bytemuck::{Pod, Zeroable};

use crate::render::Texture;
use crate::render::common;

use super::accumulator::{Accumulator, LIGHT_FORMAT};

const BLUR_WGSL: &str = include_str!("shaders/blur.wgsl");

/// Largest radius the blur program supports.
pub const MAX_BLUR_RADIUS: u32 = 32;

const WEIGHT_VEC4S: usize = (MAX_BLUR_RADIUS as usize + 1).div_ceil(4);

/// Half kernel `w0..=w_radius` with `sigma = radius / 2`, normalized so that
/// `w0 + 2 * (w1 + ... + w_radius) == 1`.
pub fn gaussian_kernel(radius: u32) -> Vec<f32> {
    if radius == 0 {
        return vec![1.0];
    }
    let sigma = radius as f32 / 2.0;
    let denom = 2.0 * sigma * sigma;

    let mut weights: Vec<f32> = (0..=radius)
        .map(|k| (-((k * k) as f32) / denom).exp())
        .collect();

    let total = weights[0] + 2.0 * weights[1..].iter().sum::<f32>();
    for w in &mut weights {
        *w /= total;
    }
    weights
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct BlurUniform {
    direction: [i32; 2],
    radius: i32,
    _pad: i32,
    weights: [[f32; 4]; WEIGHT_VEC4S],
}

impl BlurUniform {
    fn new(direction: [i32; 2], radius: u32) -> Self {
        let mut weights = [[0.0; 4]; WEIGHT_VEC4S];
        for (k, w) in gaussian_kernel(radius).into_iter().enumerate() {
            weights[k / 4][k % 4] = w;
        }
        Self {
            direction,
            radius: radius as i32,
            _pad: 0,
            weights,
        }
    }
}

pub(crate) struct BlurPass {
    pipeline: wgpu::RenderPipeline,
    horizontal: wgpu::Buffer,
    vertical: wgpu::Buffer,
    /// `[horizontal, vertical]`.
    params_groups: [wgpu::BindGroup; 2],
    /// Indexed by accumulator slot.
    source_groups: [wgpu::BindGroup; 2],
    radius: u32,
    warned_radius_clamp: bool,
}

impl BlurPass {
    pub(crate) fn new(device: &wgpu::Device, accumulator: &Accumulator) -> Self {
        let params_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glimmer blur params bgl"),
            entries: &[common::uniform_entry::<BlurUniform>(0, wgpu::ShaderStages::FRAGMENT, false)],
        });
        let source_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glimmer blur source bgl"),
            entries: &[common::texture_entry(0)],
        });

        let uniform = |label: &str| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<BlurUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let horizontal = uniform("glimmer blur horizontal");
        let vertical = uniform("glimmer blur vertical");

        let params_groups = [&horizontal, &vertical].map(|buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("glimmer blur params bind group"),
                layout: &params_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            })
        });

        let source_groups = accumulator.textures().each_ref().map(|tex| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("glimmer blur source bind group"),
                layout: &source_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(tex.view()),
                }],
            })
        });

        let shader = common::fullscreen_shader(device, "glimmer blur shader", BLUR_WGSL);
        let pipeline = common::fullscreen_pipeline(
            device,
            "glimmer blur pipeline",
            &shader,
            "fs_blur",
            &[&params_layout, &source_layout],
            LIGHT_FORMAT,
            None,
        );

        Self {
            pipeline,
            horizontal,
            vertical,
            params_groups,
            source_groups,
            radius: 0,
            warned_radius_clamp: false,
        }
    }

    /// Uploads the kernel for `radius`, clamped to [`MAX_BLUR_RADIUS`].
    pub(crate) fn prepare(&mut self, queue: &wgpu::Queue, radius: u32) {
        if radius > MAX_BLUR_RADIUS && !self.warned_radius_clamp {
            log::warn!("shadow blur radius {radius} clamped to {MAX_BLUR_RADIUS}");
            self.warned_radius_clamp = true;
        }
        self.radius = radius.min(MAX_BLUR_RADIUS);
        if self.radius == 0 {
            return;
        }

        queue.write_buffer(&self.horizontal, 0, bytemuck::bytes_of(&BlurUniform::new([1, 0], self.radius)));
        queue.write_buffer(&self.vertical, 0, bytemuck::bytes_of(&BlurUniform::new([0, 1], self.radius)));
    }

    /// Blurs the accumulator's read side into `lightmap`.
    ///
    /// The horizontal pass uses the accumulator's write side as scratch.
    pub(crate) fn record(&self, encoder: &mut wgpu::CommandEncoder, accumulator: &Accumulator, lightmap: &Texture) {
        if self.radius == 0 {
            encoder.copy_texture_to_texture(
                accumulator.read().copy_info(),
                lightmap.copy_info(),
                lightmap.size().to_extent(),
            );
            return;
        }

        let [horizontal, vertical] = blur_sources(accumulator.read_index());
        let steps = [
            (accumulator.textures()[vertical].view(), &self.params_groups[0], &self.source_groups[horizontal]),
            (lightmap.view(), &self.params_groups[1], &self.source_groups[vertical]),
        ];

        for (target, params, source) in steps {
            let mut rpass = common::color_pass(
                encoder,
                "glimmer blur pass",
                target,
                wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
            );
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, params, &[]);
            rpass.set_bind_group(1, source, &[]);
            rpass.draw(0..3, 0..1);
        }
    }
}

/// Accumulator slots sampled by the horizontal and vertical passes. The
/// horizontal pass writes the slot the vertical pass then reads.
pub(crate) fn blur_sources(read_index: usize) -> [usize; 2] {
    [read_index, 1 - read_index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_matches_program() {
        assert_eq!(WEIGHT_VEC4S, 9);
        assert_eq!(std::mem::size_of::<BlurUniform>(), 160);
    }

    #[test]
    fn blur_starts_from_last_light_output() {
        use crate::lighting::PingPong;
        use crate::lighting::light_pass::pass_slots;

        let first = PingPong::new((), ()).read_index();
        for lights in 0..5u32 {
            let last_write = pass_slots(first, lights).last().map_or(first, |(_, write)| write);
            let [horizontal, vertical] = blur_sources(last_write);
            assert_eq!(horizontal, (first + lights as usize) % 2);
            assert_eq!(vertical, 1 - horizontal);
        }
    }

    #[test]
    fn kernel_is_normalized() {
        for radius in [1, 2, 5, 17, MAX_BLUR_RADIUS] {
            let k = gaussian_kernel(radius);
            assert_eq!(k.len(), radius as usize + 1);
            let total = k[0] + 2.0 * k[1..].iter().sum::<f32>();
            assert!((total - 1.0).abs() < 1e-5, "radius {radius}: {total}");
        }
    }

    #[test]
    fn kernel_decreases_from_center() {
        let k = gaussian_kernel(6);
        assert!(k.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn radius_zero_is_identity_kernel() {
        assert_eq!(gaussian_kernel(0), vec![1.0]);
    }

    #[test]
    fn weights_pack_four_per_vec4() {
        let u = BlurUniform::new([1, 0], 5);
        let k = gaussian_kernel(5);
        assert_eq!(u.weights[0][0], k[0]);
        assert_eq!(u.weights[1][1], k[5]);
        assert_eq!(u.weights[1][2], 0.0);
    }
}
