//! Interactive lighting demo.
//!
//! A light follows the mouse over a background (a checkerboard, or the image
//! given as the first argument) with a rotating square and a static triangle
//! casting shadows. Click to drop more lights.
//!
//! Keys: Space toggles shadows, B cycles the blur radius, L toggles lightmap
//! filtering, Escape quits.

use std::f32::consts::FRAC_PI_2;

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};

use glimmer_engine::coords::{Rect, Transform2, Vec2};
use glimmer_engine::core::{App, AppControl, FrameCtx, SetupCtx};
use glimmer_engine::input::{Key, MouseButton};
use glimmer_engine::lighting::{EngineConfig, Hull, Layer, LightingEngine, PointLight};
use glimmer_engine::logging::{LoggingConfig, init_logging};
use glimmer_engine::render::{FilterMode, Texture};
use glimmer_engine::window::Runtime;

const SCREEN: (u32, u32) = (1280, 720);
const LIGHT_RADIUS: f32 = 900.0;

const SQUARE_CENTER: Vec2 = Vec2::new(600.0, 300.0);
const SQUARE_SIZE: f32 = 200.0;
const SQUARE_SPEED: f32 = 0.6; // rad/s

const BLUR_STEPS: [u32; 5] = [0, 2, 5, 10, 20];
const TITLE_EVERY: u64 = 30;

/// Square of half-diagonal `size` around `center`, rotated by `angle`.
fn square_vertices(center: Vec2, size: f32, angle: f32) -> Vec<Vec2> {
    (0..4)
        .map(|i| center + Vec2::new(size, 0.0).rotated(angle + i as f32 * FRAC_PI_2))
        .collect()
}

/// Evenly spread hues so consecutive lights are easy to tell apart.
fn light_color(index: usize) -> (u8, u8, u8) {
    let hue = (index as f32 * 0.618_034).fract() * 6.0;
    let x = 1.0 - (hue % 2.0 - 1.0).abs();
    let (r, g, b) = match hue as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let to_u8 = |c: f32| (c * 255.0) as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}

fn checkerboard(width: u32, height: u32, cell: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            Rgba([205, 195, 175, 255])
        } else {
            Rgba([95, 105, 125, 255])
        }
    })
}

/// Framed crate sprite, blitted rotated onto the lit background.
fn crate_sprite(size: u32) -> RgbaImage {
    let border = size / 8;
    RgbaImage::from_fn(size, size, |x, y| {
        let edge = x < border || y < border || x >= size - border || y >= size - border;
        let diagonal = x.abs_diff(y) < border / 2 || (x + y).abs_diff(size) < border / 2;
        if edge || diagonal {
            Rgba([110, 70, 35, 255])
        } else {
            Rgba([170, 120, 70, 255])
        }
    })
}

struct Assets {
    background: Texture,
    sprite: Texture,
    /// 1x1 white texel stretched into the unlit HUD bar.
    white: Texture,
}

struct Demo {
    background_path: Option<String>,
    assets: Option<Assets>,
    hull_angle: f32,
    blur_step: usize,
    shadows: bool,
    linear_lightmap: bool,
}

impl Demo {
    fn new(background_path: Option<String>) -> Self {
        Self {
            background_path,
            assets: None,
            hull_angle: 0.0,
            blur_step: 2,
            shadows: true,
            linear_lightmap: true,
        }
    }

    fn add_light(engine: &mut LightingEngine, position: Vec2) {
        let index = engine.scene().lights.len();
        let light = PointLight::new(position, 1.0, LIGHT_RADIUS).with_color(light_color(index));
        engine.scene_mut().lights.push(light);
        log::info!("light count: {}", index + 1);
    }

    fn handle_input(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        if ctx.input.key_pressed(Key::Space) {
            self.shadows = !self.shadows;
            for light in &mut ctx.engine.scene_mut().lights {
                light.cast_shadows = self.shadows;
            }
            log::info!("shadows: {}", self.shadows);
        }

        if ctx.input.key_pressed(Key::Letter('b')) {
            self.blur_step = (self.blur_step + 1) % BLUR_STEPS.len();
            ctx.engine.scene_mut().shadow_blur_radius = BLUR_STEPS[self.blur_step];
            log::info!("blur radius: {}", BLUR_STEPS[self.blur_step]);
        }

        if ctx.input.key_pressed(Key::Letter('l')) {
            self.linear_lightmap = !self.linear_lightmap;
            let mode = if self.linear_lightmap { FilterMode::Linear } else { FilterMode::Nearest };
            ctx.engine.set_lightmap_filter(mode);
            log::info!("lightmap filter: {mode:?}");
        }

        if ctx.input.buttons_pressed.contains(&MouseButton::Left) {
            if let Some(p) = ctx.pointer_native() {
                Self::add_light(ctx.engine, p);
            }
        }

        AppControl::Continue
    }
}

impl App for Demo {
    fn init(&mut self, ctx: &mut SetupCtx<'_>) -> Result<()> {
        let engine = &mut *ctx.engine;
        let native = engine.native_res();

        let background = match &self.background_path {
            Some(path) => {
                let tex = engine
                    .load_texture(path)
                    .with_context(|| format!("failed to load background `{path}`"))?;
                engine.set_filter(Layer::Background, FilterMode::Linear);
                tex
            }
            None => engine.surface_to_texture(&checkerboard(native.width, native.height, 40))?,
        };
        let sprite = engine.surface_to_texture(&crate_sprite(64))?;
        let white = engine.surface_to_texture(&RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255])))?;

        let scene = engine.scene_mut();
        scene.shadow_blur_radius = BLUR_STEPS[self.blur_step];
        scene.hulls.push(Hull::new(square_vertices(SQUARE_CENTER, SQUARE_SIZE, 0.0)));
        scene.hulls.push(Hull::new([(1000.0, 400.0), (1100.0, 586.0), (900.0, 586.0)]));
        Self::add_light(engine, Vec2::new(100.0, 100.0));

        self.assets = Some(Assets {
            background,
            sprite,
            white,
        });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        if self.handle_input(ctx) == AppControl::Exit {
            return Ok(AppControl::Exit);
        }
        let Some(assets) = &self.assets else {
            return Ok(AppControl::Continue);
        };

        self.hull_angle += SQUARE_SPEED * ctx.time.dt;
        let pointer = ctx.pointer_native();

        let engine = &mut *ctx.engine;
        let native = engine.native_res();
        {
            let scene = engine.scene_mut();
            scene.hulls[0].vertices = square_vertices(SQUARE_CENTER, SQUARE_SIZE, self.hull_angle);
            if let (Some(p), Some(light)) = (pointer, scene.lights.first_mut()) {
                light.position = p;
            }
        }

        engine.clear((0, 0, 0));
        engine.render_texture(
            &assets.background,
            Layer::Background,
            Rect::from_size(native.width, native.height),
            Rect::from_size(assets.background.width(), assets.background.height()),
        );
        engine.render_transformed(
            &assets.sprite,
            Layer::Background,
            Transform2::from_rect_rotated(Rect::new(200.0, 480.0, 96.0, 96.0), -self.hull_angle),
            Rect::from_size(64, 64),
        );

        // Unlit HUD: one segment per light.
        let lights = engine.scene().lights.len() as f32;
        engine.render_texture(
            &assets.white,
            Layer::Foreground,
            Rect::new(16.0, 16.0, 24.0 * lights, 12.0),
            Rect::from_size(1, 1),
        );

        let control = ctx.present()?;

        if ctx.time.frame_index % TITLE_EVERY == 0 {
            let title = format!("{:.2} mspt; {:.2} fps", ctx.time.smoothed_ms, ctx.time.fps());
            log::debug!("{title}");
            ctx.runtime.set_title(title);
        }

        Ok(control)
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut config = EngineConfig::new(SCREEN, SCREEN, (SCREEN.0 * 2 / 5, SCREEN.1 * 2 / 5));
    config.display.title = "glimmer demo".to_string();

    Runtime::run(config, Demo::new(std::env::args().nth(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_is_centered() {
        let v = square_vertices(Vec2::new(10.0, 20.0), 5.0, 0.3);
        assert_eq!(v.len(), 4);
        let c = v.iter().fold(Vec2::zero(), |acc, &p| acc + p) / 4.0;
        assert!((c.x - 10.0).abs() < 1e-4 && (c.y - 20.0).abs() < 1e-4);
    }

    #[test]
    fn consecutive_light_colors_differ() {
        assert_ne!(light_color(0), light_color(1));
        assert_ne!(light_color(1), light_color(2));
    }
}
