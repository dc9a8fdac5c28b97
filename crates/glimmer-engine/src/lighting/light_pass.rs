//! Per-light accumulation passes.
//!
//! Each enabled light gets one uniform slot at a dynamic offset, so all slots
//! are written once before the frame's command buffer executes.

use bytemuck::{Pod, Zeroable};

use crate::coords::Resolution;
use crate::render::common::{self, align_to};

use super::PointLight;
use super::accumulator::{Accumulator, LIGHT_FORMAT};
use super::error::{LightingError, LightingResult};
use super::geometry::GeometryBuffer;

const LIGHT_WGSL: &str = include_str!("shaders/light.wgsl");

/// GPU layout of one light (matches `Light` in `light.wgsl`).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub position: [f32; 2],
    pub native_size: [f32; 2],
    pub color: [f32; 4],
    pub power: f32,
    pub radius: f32,
    pub cast_shadows: u32,
    pub hull_count: u32,
}

/// Builds one uniform per enabled light, in insertion order.
pub fn plan_light_passes(lights: &[PointLight], native: Resolution, hull_count: u32) -> Vec<LightUniform> {
    lights
        .iter()
        .filter(|l| l.enabled)
        .map(|l| LightUniform {
            position: native.to_uv(l.position).to_array(),
            native_size: native.as_vec2().to_array(),
            color: l.color().to_array(),
            power: l.power.max(0.0),
            radius: l.radius,
            cast_shadows: l.cast_shadows as u32,
            hull_count,
        })
        .collect()
}

/// `(read, write)` accumulator slots for each of `lights` passes, starting
/// from `first_read`. Every pass reads what the previous one wrote.
pub(crate) fn pass_slots(first_read: usize, lights: u32) -> impl Iterator<Item = (usize, usize)> {
    (0..lights as usize).map(move |i| {
        let read = (first_read + i) % 2;
        (read, 1 - read)
    })
}

pub(crate) struct LightPass {
    pipeline: wgpu::RenderPipeline,
    uniforms: wgpu::Buffer,
    stride: u64,
    slots: usize,
    scene_group: wgpu::BindGroup,
    /// Indexed by the accumulator's read slot.
    previous_groups: [wgpu::BindGroup; 2],
    planned: u32,
}

impl LightPass {
    pub(crate) fn new(
        device: &wgpu::Device,
        geometry: &GeometryBuffer,
        accumulator: &Accumulator,
        slots: usize,
    ) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = align_to(std::mem::size_of::<LightUniform>() as u64, alignment);

        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("glimmer light uniforms"),
            size: stride * slots as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glimmer light scene bgl"),
            entries: &[
                common::uniform_entry::<LightUniform>(0, wgpu::ShaderStages::FRAGMENT, true),
                common::storage_entry(1),
                common::storage_entry(2),
            ],
        });
        let previous_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glimmer light previous bgl"),
            entries: &[common::texture_entry(0)],
        });

        let scene_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glimmer light scene bind group"),
            layout: &scene_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &uniforms,
                        offset: 0,
                        size: Some(common::binding_size::<LightUniform>()),
                    }),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: geometry.vertices().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: geometry.offsets().as_entire_binding(),
                },
            ],
        });

        let previous_groups = accumulator.textures().each_ref().map(|tex| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("glimmer light previous bind group"),
                layout: &previous_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(tex.view()),
                }],
            })
        });

        let shader = common::fullscreen_shader(device, "glimmer light shader", LIGHT_WGSL);
        let pipeline = common::fullscreen_pipeline(
            device,
            "glimmer light pipeline",
            &shader,
            "fs_light",
            &[&scene_layout, &previous_layout],
            LIGHT_FORMAT,
            None,
        );

        log::debug!("light pass: {slots} slots, stride {stride} bytes");

        Self {
            pipeline,
            uniforms,
            stride,
            slots,
            scene_group,
            previous_groups,
            planned: 0,
        }
    }

    /// Fails if more lights are planned than there are slots.
    pub(crate) fn check_capacity(&self, planned: usize) -> LightingResult<()> {
        if planned > self.slots {
            return Err(LightingError::capacity("light", planned, self.slots));
        }
        Ok(())
    }

    /// Writes all planned uniforms in one upload.
    pub(crate) fn prepare(&mut self, queue: &wgpu::Queue, planned: &[LightUniform]) -> LightingResult<()> {
        self.check_capacity(planned.len())?;
        self.planned = planned.len() as u32;
        if planned.is_empty() {
            return Ok(());
        }

        let stride = self.stride as usize;
        let mut bytes = vec![0u8; stride * planned.len()];
        for (slot, uniform) in bytes.chunks_exact_mut(stride).zip(planned) {
            slot[..std::mem::size_of::<LightUniform>()].copy_from_slice(bytemuck::bytes_of(uniform));
        }
        queue.write_buffer(&self.uniforms, 0, &bytes);
        Ok(())
    }

    /// Records one pass per prepared light, flipping the accumulator after each.
    pub(crate) fn record(&self, encoder: &mut wgpu::CommandEncoder, accumulator: &mut Accumulator) {
        for (slot, (read, write)) in (0u32..).zip(pass_slots(accumulator.read_index(), self.planned)) {
            debug_assert_eq!(accumulator.read_index(), read);
            {
                let mut rpass = common::color_pass(
                    encoder,
                    "glimmer light pass",
                    accumulator.textures()[write].view(),
                    wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                );
                rpass.set_pipeline(&self.pipeline);
                rpass.set_bind_group(0, &self.scene_group, &[slot * self.stride as u32]);
                rpass.set_bind_group(1, &self.previous_groups[read], &[]);
                rpass.draw(0..3, 0..1);
            }
            accumulator.flip();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    #[test]
    fn uniform_is_48_bytes() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 48);
    }

    #[test]
    fn planning_skips_disabled_and_keeps_order() {
        let native = Resolution::new(200, 100);
        let lights = vec![
            PointLight::new((0.0, 0.0), 1.0, 10.0),
            PointLight::new((1.0, 1.0), 2.0, 10.0).with_enabled(false),
            PointLight::new((100.0, 25.0), 3.0, 40.0).with_color((255, 0, 0)),
        ];

        let planned = plan_light_passes(&lights, native, 7);
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].power, 1.0);
        assert_eq!(planned[1].power, 3.0);
        assert_eq!(planned[1].position, [0.5, 0.75]);
        assert_eq!(planned[1].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(planned[1].native_size, [200.0, 100.0]);
        assert_eq!(planned[1].hull_count, 7);
        assert_eq!(planned[1].cast_shadows, 1);
    }

    #[test]
    fn negative_power_is_planned_as_dark() {
        let native = Resolution::new(10, 10);
        let planned = plan_light_passes(&[PointLight::new((5.0, 5.0), -3.0, 8.0)], native, 0);
        assert_eq!(planned[0].power, 0.0);
    }

    // ── accumulator slots ─────────────────────────────────────────────────

    #[test]
    fn each_pass_reads_the_previous_write() {
        let slots: Vec<_> = pass_slots(0, 4).collect();
        assert_eq!(slots, [(0, 1), (1, 0), (0, 1), (1, 0)]);
        assert!(slots.windows(2).all(|w| w[1].0 == w[0].1));
        assert_eq!(pass_slots(1, 1).collect::<Vec<_>>(), [(1, 0)]);
        assert_eq!(pass_slots(0, 0).count(), 0);
    }

    #[test]
    fn slots_follow_ping_pong_flips() {
        for lights in 0..6u32 {
            let mut pp = crate::lighting::PingPong::new(0usize, 1usize);
            for (read, write) in pass_slots(pp.read_index(), lights) {
                assert_eq!((*pp.read(), *pp.write()), (read, write));
                pp.flip();
            }
            let last = pass_slots(1, lights).last().map_or(1, |(_, write)| write);
            assert_eq!(pp.read_index(), last);
        }
    }

    #[test]
    fn position_is_y_flipped() {
        let native = Resolution::new(100, 100);
        let planned = plan_light_passes(&[PointLight::new(Vec2::new(10.0, 90.0), 1.0, 5.0)], native, 0);
        assert!((planned[0].position[0] - 0.1).abs() < 1e-6);
        assert!((planned[0].position[1] - 0.1).abs() < 1e-6);
    }
}
