use std::path::Path;

use crate::coords::{Rect, Resolution, Transform2};
use crate::device::Gpu;
use crate::paint::Color;
use crate::render::blit::BlitRenderer;
use crate::render::texture::Samplers;
use crate::render::{FilterMode, RenderTarget, Texture};

use super::accumulator::{Accumulator, LIGHT_FORMAT};
use super::blur::BlurPass;
use super::composite::{Compositor, composite_viewport};
use super::config::EngineConfig;
use super::error::{LightingError, LightingResult};
use super::geometry::{self, GeometryBuffer, GeometryCapacity};
use super::layer::{LAYER_FORMAT, Layer, Layers};
use super::light_pass::{LightPass, plan_light_passes};
use super::pending::PendingDraws;
use super::scene::Scene;

/// 2D lighting compositor.
///
/// Owns the layer targets, the light accumulator, the lightmap and all
/// per-frame GPU buffers, sized once from [`EngineConfig`]. Layer draws are
/// recorded into a pending encoder; [`render`](Self::render) submits them,
/// then lights the scene into the given target.
///
/// The engine is single-threaded: scene edits and rendering must happen on
/// the thread that owns it.
pub struct LightingEngine {
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: EngineConfig,
    scene: Scene,

    samplers: Samplers,
    blit: BlitRenderer,
    layers: Layers,
    accumulator: Accumulator,
    lightmap: Texture,
    geometry: GeometryBuffer,
    light_pass: LightPass,
    blur: BlurPass,
    compositor: Compositor,

    pending: PendingDraws<wgpu::CommandEncoder>,
    warned_blit_texture: bool,
}

impl LightingEngine {
    /// Creates an engine drawing into `gpu`'s surface format.
    pub fn new(gpu: &Gpu<'_>, config: EngineConfig) -> LightingResult<Self> {
        Self::with_device(gpu.device().clone(), gpu.queue().clone(), gpu.surface_format(), config)
    }

    /// Creates an engine for an arbitrary display format.
    pub fn with_device(
        device: wgpu::Device,
        queue: wgpu::Queue,
        display_format: wgpu::TextureFormat,
        config: EngineConfig,
    ) -> LightingResult<Self> {
        config.validate(device.limits().max_texture_dimension_2d)?;

        if config.display.depth != 0 {
            log::info!(
                "display depth {} requested; surface format {:?} is used as is",
                config.display.depth,
                display_format
            );
        }

        let samplers = Samplers::new(&device);
        let blit = BlitRenderer::new(&device, LAYER_FORMAT, display_format);
        let layers = Layers::new(&device, config.native_res);
        let accumulator = Accumulator::new(&device, config.lightmap_res);

        let mut lightmap = Texture::render_target(&device, "glimmer lightmap", config.lightmap_res, LIGHT_FORMAT);
        lightmap.filter = FilterMode::Linear;

        let geometry = GeometryBuffer::new(
            &device,
            GeometryCapacity {
                max_hulls: config.max_hulls,
                max_vertices: config.max_vertices,
            },
        );
        let light_pass = LightPass::new(&device, &geometry, &accumulator, config.max_lights);
        let blur = BlurPass::new(&device, &accumulator);
        let compositor = Compositor::new(
            &device,
            display_format,
            &blit,
            &samplers,
            layers.get(Layer::Background),
            layers.get(Layer::Foreground),
            &lightmap,
        );

        log::info!(
            "lighting engine: screen {}x{}, native {}x{}, lightmap {}x{}",
            config.screen_res.width,
            config.screen_res.height,
            config.native_res.width,
            config.native_res.height,
            config.lightmap_res.width,
            config.lightmap_res.height
        );

        Ok(Self {
            device,
            queue,
            config,
            scene: Scene::new(),
            samplers,
            blit,
            layers,
            accumulator,
            lightmap,
            geometry,
            light_pass,
            blur,
            compositor,
            pending: PendingDraws::new(),
            warned_blit_texture: false,
        })
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn native_res(&self) -> Resolution {
        self.config.native_res
    }

    // ── scene ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn set_ambient(&mut self, color: impl Into<Color>) {
        self.scene.set_ambient(color);
    }

    pub fn ambient(&self) -> [u8; 4] {
        self.scene.ambient()
    }

    // ── layers ────────────────────────────────────────────────────────────

    /// Clears the background to `color` and the foreground to transparent.
    ///
    /// Layer draws still pending from a frame that was never rendered are
    /// discarded.
    pub fn clear(&mut self, color: impl Into<Color>) {
        let encoder = self.pending.restart(|| layer_encoder(&self.device));
        self.layers.clear(encoder, color.into());
    }

    /// Draws `source` (texture pixels) of `texture` into `dest` (native pixels) on `layer`.
    pub fn render_texture(&mut self, texture: &Texture, layer: Layer, dest: Rect, source: Rect) {
        self.render_transformed(texture, layer, Transform2::from_rect(dest), source);
    }

    /// Draws `source` of `texture` through an arbitrary unit-quad transform.
    pub fn render_transformed(&mut self, texture: &Texture, layer: Layer, transform: Transform2, source: Rect) {
        let encoder = self.pending.record(|| layer_encoder(&self.device));
        self.blit.draw_quad(
            &self.device,
            encoder,
            self.layers.get(layer),
            texture,
            self.samplers.get(texture.filter),
            transform,
            source,
        );
    }

    /// Older name of [`render_texture`](Self::render_texture).
    #[deprecated(note = "use `render_texture`")]
    pub fn blit_texture(&mut self, texture: &Texture, layer: Layer, dest: Rect, source: Rect) {
        if !self.warned_blit_texture {
            log::warn!("`blit_texture` is deprecated; use `render_texture`");
            self.warned_blit_texture = true;
        }
        self.render_texture(texture, layer, dest, source);
    }

    /// Sampling filter used when compositing `layer`.
    pub fn set_filter(&mut self, layer: Layer, mode: FilterMode) {
        self.layers.get_mut(layer).filter = mode;
        self.rebind();
    }

    /// Sampling filter used when stretching the lightmap over the background.
    pub fn set_lightmap_filter(&mut self, mode: FilterMode) {
        self.lightmap.filter = mode;
        self.rebind();
    }

    fn rebind(&mut self) {
        self.compositor.rebind(
            &self.device,
            &self.blit,
            &self.samplers,
            self.layers.get(Layer::Background),
            self.layers.get(Layer::Foreground),
            &self.lightmap,
        );
    }

    // ── textures ──────────────────────────────────────────────────────────

    /// Decodes an image file into a texture.
    pub fn load_texture(&self, path: impl AsRef<Path>) -> LightingResult<Texture> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| LightingError::TextureLoad {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("loaded texture {} ({}x{})", path.display(), image.width(), image.height());
        self.surface_to_texture(&image.to_rgba8())
    }

    /// Uploads an RGBA image (top row first).
    pub fn surface_to_texture(&self, image: &image::RgbaImage) -> LightingResult<Texture> {
        let (width, height) = image.dimensions();
        let limit = self.device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > limit || height > limit {
            return Err(LightingError::InvalidImage { width, height, limit });
        }
        Ok(Texture::from_rgba8(
            &self.device,
            &self.queue,
            "glimmer texture",
            Resolution::new(width, height),
            image.as_raw(),
        ))
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Submits pending layer draws without lighting a frame. Call when a
    /// frame is skipped so the layers stay current.
    pub fn flush(&mut self) {
        if let Some(encoder) = self.pending.take() {
            self.queue.submit(std::iter::once(encoder.finish()));
        }
    }

    /// Lights the scene and composites both layers into `target`.
    ///
    /// Capacity is checked first; on error nothing is submitted and pending
    /// layer draws are kept for the next call.
    pub fn render(&mut self, target: &mut RenderTarget<'_>) -> LightingResult<()> {
        let packed = geometry::pack(&self.scene.hulls, self.config.native_res, self.geometry.capacity())?;
        let planned = plan_light_passes(&self.scene.lights, self.config.native_res, packed.hull_count());
        self.light_pass.check_capacity(planned.len())?;

        self.flush();

        self.geometry.upload(&self.queue, &packed);
        self.light_pass.prepare(&self.queue, &planned)?;
        self.blur.prepare(&self.queue, self.scene.shadow_blur_radius);
        self.compositor
            .prepare(&self.queue, self.scene.ambient_normalized(), self.scene.max_luminosity);

        let encoder = &mut *target.encoder;
        self.accumulator.clear(encoder, Color::transparent());
        self.light_pass.record(encoder, &mut self.accumulator);
        self.blur.record(encoder, &self.accumulator, &self.lightmap);

        let viewport = composite_viewport(target.size, self.config.native_res, self.config.display.integer_scale);
        self.compositor.record(encoder, &self.blit, target.color_view, viewport);

        log::trace!(
            "frame: {} light passes, {} hulls, blur {}",
            planned.len(),
            self.geometry.hull_count(),
            self.scene.shadow_blur_radius
        );
        Ok(())
    }
}

fn layer_encoder(device: &wgpu::Device) -> wgpu::CommandEncoder {
    device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("glimmer layer encoder"),
    })
}
