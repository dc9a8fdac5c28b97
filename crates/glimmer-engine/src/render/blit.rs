//! Textured-quad blits onto layers, plus the unlit layer composite.
//!
//! This is the thin 2D collaborator the lighting core consumes; it knows
//! nothing about lights.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::{Rect, Resolution, Transform2};

use super::common::{self, PipelineDesc};
use super::texture::Texture;

const BLIT_WGSL: &str = include_str!("shaders/blit.wgsl");

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct BlitVertex {
    pub position: [f32; 2], // NDC
    pub tex: [f32; 2],
}

impl BlitVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2  // tex
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BlitVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Builds the triangle-strip vertices for blitting `source` (texture pixels)
/// through `transform` (unit quad → target pixels).
pub(crate) fn quad_vertices(
    transform: Transform2,
    source: Rect,
    target: Resolution,
    texture: Resolution,
) -> [BlitVertex; 4] {
    let tw = target.width.max(1) as f32;
    let th = target.height.max(1) as f32;
    let [u0, v0, u1, v1] = source.to_uv_bounds(texture.width, texture.height);
    let [c00, c10, c11, c01] = transform.corners();

    let v = |p: crate::coords::Vec2, tex: [f32; 2]| BlitVertex {
        position: [2.0 * p.x / tw - 1.0, 1.0 - 2.0 * p.y / th],
        tex,
    };

    // Strip order: top-left, top-right, bottom-left, bottom-right.
    [
        v(c00, [u0, v0]),
        v(c10, [u1, v0]),
        v(c01, [u0, v1]),
        v(c11, [u1, v1]),
    ]
}

/// Draws textures onto layer targets and layers onto the display.
pub(crate) struct BlitRenderer {
    bind_group_layout: wgpu::BindGroupLayout,
    quad_pipeline: wgpu::RenderPipeline,
    layer_pipeline: wgpu::RenderPipeline,
}

impl BlitRenderer {
    pub(crate) fn new(
        device: &wgpu::Device,
        layer_format: wgpu::TextureFormat,
        display_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = common::fullscreen_shader(device, "glimmer blit shader", BLIT_WGSL);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glimmer blit bgl"),
            entries: &[common::texture_entry(0), common::sampler_entry(1)],
        });

        let quad_pipeline = common::create_pipeline(
            device,
            PipelineDesc {
                label: "glimmer blit quad pipeline",
                shader: &shader,
                vertex_entry: "vs_quad",
                fragment_entry: "fs_quad",
                vertex_buffers: &[BlitVertex::layout()],
                bind_group_layouts: &[&bind_group_layout],
                format: layer_format,
                blend: Some(common::alpha_blend()),
                topology: wgpu::PrimitiveTopology::TriangleStrip,
            },
        );

        let layer_pipeline = common::fullscreen_pipeline(
            device,
            "glimmer blit layer pipeline",
            &shader,
            "fs_layer",
            &[&bind_group_layout],
            display_format,
            Some(common::alpha_blend()),
        );

        Self {
            bind_group_layout,
            quad_pipeline,
            layer_pipeline,
        }
    }

    pub(crate) fn bind_texture(
        &self,
        device: &wgpu::Device,
        texture: &Texture,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glimmer blit bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    /// Records a blit of `source` from `texture` onto `target` through `transform`.
    ///
    /// Empty or non-finite geometry is skipped with a debug message.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn draw_quad(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        target: &Texture,
        texture: &Texture,
        sampler: &wgpu::Sampler,
        transform: Transform2,
        source: Rect,
    ) {
        if source.is_empty() || !source.is_finite() {
            log::debug!("blit skipped: empty or non-finite source rect {source:?}");
            return;
        }

        let vertices = quad_vertices(transform, source, target.size(), texture.size());
        if vertices.iter().any(|v| !v.position.iter().all(|c| c.is_finite())) {
            log::debug!("blit skipped: non-finite transform {transform:?}");
            return;
        }

        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glimmer blit vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let bind_group = self.bind_texture(device, texture, sampler);

        let mut rpass = common::color_pass(encoder, "glimmer blit pass", target.view(), wgpu::LoadOp::Load);
        rpass.set_pipeline(&self.quad_pipeline);
        rpass.set_bind_group(0, &bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(0..4, 0..1);
    }

    /// Draws a whole layer over the current pass viewport, alpha-blended and unlit.
    pub(crate) fn draw_layer(&self, rpass: &mut wgpu::RenderPass<'_>, layer: &wgpu::BindGroup) {
        rpass.set_pipeline(&self.layer_pipeline);
        rpass.set_bind_group(0, layer, &[]);
        rpass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_target_blit_spans_ndc() {
        let target = Resolution::new(320, 180);
        let tex = Resolution::new(64, 64);
        let v = quad_vertices(
            Transform2::from_rect(Rect::from_size(320, 180)),
            Rect::from_size(64, 64),
            target,
            tex,
        );
        assert_eq!(v[0].position, [-1.0, 1.0]);
        assert_eq!(v[3].position, [1.0, -1.0]);
        assert_eq!(v[0].tex, [0.0, 0.0]);
        assert_eq!(v[3].tex, [1.0, 1.0]);
    }

    #[test]
    fn source_rect_selects_sub_region() {
        let v = quad_vertices(
            Transform2::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
            Rect::new(32.0, 0.0, 32.0, 32.0),
            Resolution::new(100, 100),
            Resolution::new(64, 64),
        );
        assert_eq!(v[0].tex, [0.5, 0.0]);
        assert_eq!(v[3].tex, [1.0, 0.5]);
        // Top-left corner of the destination rect.
        assert_eq!(v[0].position, [-1.0, 1.0]);
        assert!((v[3].position[0] - (-0.8)).abs() < 1e-6);
    }
}
