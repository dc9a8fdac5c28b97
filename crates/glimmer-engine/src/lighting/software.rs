//! CPU reference of the lighting programs.
//!
//! Every function here mirrors a WGSL counterpart in `lighting/shaders`, on
//! the same inputs the GPU sees (packed geometry, planned light uniforms).
//! It renders one sample per lightmap texel at the texel center, in `f32`,
//! so it is exact where the GPU is exact and close where the GPU rounds to
//! half floats.

use crate::coords::{Resolution, Vec2};
use crate::paint::Color;

use super::blur::{MAX_BLUR_RADIUS, gaussian_kernel};
use super::config::EngineConfig;
use super::error::{LightingError, LightingResult};
use super::geometry::{self, GeometryCapacity, HullGeometry};
use super::light_pass::{LightUniform, plan_light_passes};
use super::scene::Scene;

const PARALLEL_EPSILON: f32 = 1e-6;

// ── shading ───────────────────────────────────────────────────────────────

/// `power * (1 - d / radius)^2` inside the radius, 0 outside.
pub fn attenuation(distance: f32, power: f32, radius: f32) -> f32 {
    if radius <= 0.0 || distance >= radius {
        return 0.0;
    }
    let f = 1.0 - distance / radius;
    power * f * f
}

/// Whether segments `p1-p2` and `a-b` intersect (endpoints included).
pub fn segments_intersect(p1: Vec2, p2: Vec2, a: Vec2, b: Vec2) -> bool {
    let r = p2 - p1;
    let s = b - a;
    let denom = r.cross(s);
    if denom.abs() < PARALLEL_EPSILON {
        return false;
    }
    let qp = a - p1;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Whether any edge of the first `hull_count` packed hulls blocks `from-to`.
/// Positions are native pixels; packed vertices are UV.
pub fn occluded(from: Vec2, to: Vec2, geometry: &HullGeometry, hull_count: u32, native: Vec2) -> bool {
    let hulls = (hull_count as usize).min(geometry.offsets.len());
    (0..hulls).any(|h| {
        let ring = &geometry.vertices[geometry.hull_range(h)];
        let n = ring.len();
        n >= 3
            && (0..n).any(|i| {
                let a = Vec2::from(ring[i]).scale(native);
                let b = Vec2::from(ring[(i + 1) % n]).scale(native);
                segments_intersect(from, to, a, b)
            })
    })
}

/// One light's contribution at scene UV `uv`.
pub fn light_contribution(light: &LightUniform, uv: Vec2, geometry: &HullGeometry) -> [f32; 4] {
    let native = Vec2::from(light.native_size);
    let pixel_px = uv.scale(native);
    let light_px = Vec2::from(light.position).scale(native);

    let att = attenuation((pixel_px - light_px).length(), light.power, light.radius);
    if att <= 0.0 {
        return [0.0; 4];
    }
    if light.cast_shadows != 0 && occluded(light_px, pixel_px, geometry, light.hull_count, native) {
        return [0.0; 4];
    }
    light.color.map(|c| c * att)
}

/// Background texel under the lightmap mask.
pub fn composite_pixel(background: [f32; 4], light: [f32; 4], ambient: Color, max_luminosity: f32) -> [f32; 4] {
    let ambient = ambient.to_array();
    let mut out = background;
    for i in 0..3 {
        out[i] = background[i] * (light[i].min(max_luminosity) + ambient[i]);
    }
    out
}

// ── images ────────────────────────────────────────────────────────────────

/// Float RGBA image, row-major from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct LightImage {
    size: Resolution,
    pixels: Vec<[f32; 4]>,
}

impl LightImage {
    pub fn new(size: Resolution, fill: [f32; 4]) -> Self {
        Self {
            size,
            pixels: vec![fill; size.width as usize * size.height as usize],
        }
    }

    #[inline]
    pub fn size(&self) -> Resolution {
        self.size
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [f32; 4] {
        self.pixels[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: [f32; 4]) {
        let i = self.index(x, y);
        self.pixels[i] = value;
    }

    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }

    /// Scene UV of the center of texel `(x, y)`.
    #[inline]
    pub fn texel_uv(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) / self.size.width as f32,
            1.0 - (y as f32 + 0.5) / self.size.height as f32,
        )
    }

    /// Nearest texel at scene UV `uv`, edges clamped.
    pub fn sample_nearest(&self, uv: Vec2) -> [f32; 4] {
        let tx = uv.x * self.size.width as f32;
        let ty = (1.0 - uv.y) * self.size.height as f32;
        let x = (tx.max(0.0) as u32).min(self.size.width - 1);
        let y = (ty.max(0.0) as u32).min(self.size.height - 1);
        self.get(x, y)
    }

    fn clamped(&self, x: i64, y: i64) -> [f32; 4] {
        let x = x.clamp(0, self.size.width as i64 - 1) as u32;
        let y = y.clamp(0, self.size.height as i64 - 1) as u32;
        self.get(x, y)
    }
}

/// One separable blur axis, edge texels clamped.
fn blur_axis(src: &LightImage, direction: (i64, i64), kernel: &[f32]) -> LightImage {
    let mut out = LightImage::new(src.size, [0.0; 4]);
    for y in 0..src.size.height {
        for x in 0..src.size.width {
            let (xi, yi) = (x as i64, y as i64);
            let mut sum = src.get(x, y).map(|c| c * kernel[0]);
            for (k, w) in kernel.iter().enumerate().skip(1) {
                let k = k as i64;
                let plus = src.clamped(xi + direction.0 * k, yi + direction.1 * k);
                let minus = src.clamped(xi - direction.0 * k, yi - direction.1 * k);
                for c in 0..4 {
                    sum[c] += (plus[c] + minus[c]) * w;
                }
            }
            out.set(x, y, sum);
        }
    }
    out
}

/// Separable Gaussian of `radius` (clamped to [`MAX_BLUR_RADIUS`]); 0 is identity.
pub fn blur(image: &LightImage, radius: u32) -> LightImage {
    let radius = radius.min(MAX_BLUR_RADIUS);
    if radius == 0 {
        return image.clone();
    }
    let kernel = gaussian_kernel(radius);
    let horizontal = blur_axis(image, (1, 0), &kernel);
    blur_axis(&horizontal, (0, 1), &kernel)
}

// ── compositor ────────────────────────────────────────────────────────────

/// Renders a [`Scene`] the way `LightingEngine::render` does, on the CPU.
#[derive(Debug, Clone)]
pub struct SoftwareCompositor {
    native: Resolution,
    lightmap: Resolution,
    capacity: GeometryCapacity,
    max_lights: usize,
}

impl SoftwareCompositor {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            native: config.native_res,
            lightmap: config.lightmap_res,
            capacity: GeometryCapacity {
                max_hulls: config.max_hulls,
                max_vertices: config.max_vertices,
            },
            max_lights: config.max_lights,
        }
    }

    /// Accumulator contents after every light pass.
    pub fn accumulate(&self, scene: &Scene) -> LightingResult<LightImage> {
        let geometry = geometry::pack(&scene.hulls, self.native, self.capacity)?;
        let planned = plan_light_passes(&scene.lights, self.native, geometry.hull_count());
        if planned.len() > self.max_lights {
            return Err(LightingError::capacity("light", planned.len(), self.max_lights));
        }

        let mut acc = LightImage::new(self.lightmap, [0.0; 4]);
        for light in &planned {
            for y in 0..self.lightmap.height {
                for x in 0..self.lightmap.width {
                    let add = light_contribution(light, acc.texel_uv(x, y), &geometry);
                    let mut px = acc.get(x, y);
                    for c in 0..4 {
                        px[c] += add[c];
                    }
                    acc.set(x, y, px);
                }
            }
        }
        Ok(acc)
    }

    /// Blurred lightmap.
    pub fn lightmap(&self, scene: &Scene) -> LightingResult<LightImage> {
        Ok(blur(&self.accumulate(scene)?, scene.shadow_blur_radius))
    }

    /// Lit `background`, sampling the lightmap at each background texel center.
    pub fn composite(&self, scene: &Scene, background: &LightImage) -> LightingResult<LightImage> {
        let lightmap = self.lightmap(scene)?;
        let ambient = scene.ambient_normalized();

        let mut out = background.clone();
        for y in 0..background.size().height {
            for x in 0..background.size().width {
                let light = lightmap.sample_nearest(background.texel_uv(x, y));
                out.set(x, y, composite_pixel(background.get(x, y), light, ambient, scene.max_luminosity));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::{Hull, PointLight};

    const WHITE: [f32; 4] = [1.0; 4];

    fn config(size: u32) -> EngineConfig {
        EngineConfig::new((size, size), (size, size), (size, size))
    }

    fn white_light(x: f32, y: f32, radius: f32) -> PointLight {
        PointLight::new((x, y), 1.0, radius).with_color((255, 255, 255))
    }

    /// Vertical wall from (30, 0) to (34, 64).
    fn wall() -> Hull {
        Hull::new([(30.0, 0.0), (34.0, 0.0), (34.0, 64.0), (30.0, 64.0)])
    }

    fn unblurred() -> Scene {
        let mut scene = Scene::new();
        scene.shadow_blur_radius = 0;
        scene
    }

    // ── primitives ────────────────────────────────────────────────────────

    #[test]
    fn attenuation_is_power_at_center_and_zero_at_radius() {
        assert_eq!(attenuation(0.0, 2.0, 10.0), 2.0);
        assert_eq!(attenuation(10.0, 2.0, 10.0), 0.0);
        assert_eq!(attenuation(5.0, 1.0, 10.0), 0.25);
        assert_eq!(attenuation(1.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn attenuation_is_monotonic() {
        let samples: Vec<f32> = (0..=20).map(|d| attenuation(d as f32, 1.0, 20.0)).collect();
        assert!(samples.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn crossing_segments_intersect() {
        let p = |x, y| Vec2::new(x, y);
        assert!(segments_intersect(p(0.0, 0.0), p(10.0, 10.0), p(0.0, 10.0), p(10.0, 0.0)));
        assert!(!segments_intersect(p(0.0, 0.0), p(4.0, 4.0), p(0.0, 10.0), p(10.0, 0.0)));
        // Parallel.
        assert!(!segments_intersect(p(0.0, 0.0), p(10.0, 0.0), p(0.0, 1.0), p(10.0, 1.0)));
    }

    #[test]
    fn degenerate_hull_never_occludes() {
        let native = Resolution::new(64, 64);
        let cap = GeometryCapacity {
            max_hulls: 4,
            max_vertices: 16,
        };
        let line = Hull::new([(30.0, 0.0), (30.0, 64.0)]);
        let g = geometry::pack(&[line], native, cap).unwrap();
        assert!(!occluded(
            Vec2::new(10.0, 32.0),
            Vec2::new(50.0, 32.0),
            &g,
            g.hull_count(),
            native.as_vec2()
        ));
    }

    #[test]
    fn composite_keeps_background_alpha() {
        let out = composite_pixel([0.5, 0.5, 0.5, 0.3], [2.0; 4], Color::new(0.1, 0.1, 0.1, 1.0), 1.0);
        assert_eq!(out[3], 0.3);
        assert!((out[0] - 0.55).abs() < 1e-6);
    }

    // ── scene properties ──────────────────────────────────────────────────

    #[test]
    fn disabled_light_matches_removed_light() {
        let sw = SoftwareCompositor::new(&config(64));

        let mut with_disabled = Scene::new();
        with_disabled.hulls.push(wall());
        with_disabled.lights.push(white_light(10.0, 32.0, 40.0));
        with_disabled.lights.push(white_light(50.0, 20.0, 40.0).with_enabled(false));

        let mut removed = with_disabled.clone();
        removed.lights.pop();

        assert_eq!(sw.lightmap(&with_disabled).unwrap(), sw.lightmap(&removed).unwrap());
    }

    #[test]
    fn negative_power_light_adds_nothing() {
        let sw = SoftwareCompositor::new(&config(32));

        let mut scene = unblurred();
        scene.lights.push(white_light(16.0, 16.0, 20.0));
        let alone = sw.accumulate(&scene).unwrap();

        let mut dark = white_light(18.0, 16.0, 20.0);
        dark.power = -2.0;
        scene.lights.push(dark);
        assert_eq!(sw.accumulate(&scene).unwrap(), alone);
    }

    #[test]
    fn zero_blur_radius_is_identity() {
        let sw = SoftwareCompositor::new(&config(32));
        let mut scene = unblurred();
        scene.lights.push(white_light(16.0, 16.0, 12.0));
        assert_eq!(sw.lightmap(&scene).unwrap(), sw.accumulate(&scene).unwrap());
    }

    #[test]
    fn blur_spreads_and_preserves_energy_away_from_edges() {
        let mut img = LightImage::new(Resolution::new(33, 33), [0.0; 4]);
        img.set(16, 16, WHITE);
        let out = blur(&img, 4);
        assert!(out.get(16, 16)[0] < 1.0);
        assert!(out.get(18, 16)[0] > 0.0);
        let total: f32 = out.pixels().iter().map(|p| p[0]).sum();
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn no_lights_gives_ambient_only() {
        let sw = SoftwareCompositor::new(&config(16));
        let scene = Scene::new();
        let bg = LightImage::new(Resolution::new(16, 16), [0.8, 0.4, 0.2, 1.0]);
        let out = sw.composite(&scene, &bg).unwrap();
        for px in out.pixels() {
            assert!(px.iter().all(|c| c.is_finite()));
            assert!((px[0] - 0.2).abs() < 1e-6);
            assert!((px[1] - 0.1).abs() < 1e-6);
            assert!((px[2] - 0.05).abs() < 1e-6);
            assert_eq!(px[3], 1.0);
        }
    }

    #[test]
    fn lightmap_is_clamped_to_max_luminosity() {
        let sw = SoftwareCompositor::new(&config(16));
        let mut scene = unblurred();
        scene.max_luminosity = 0.6;
        scene.set_ambient((0, 0, 0, 0));
        for _ in 0..4 {
            scene.lights.push(PointLight::new((8.0, 8.0), 3.0, 20.0).with_color((255, 255, 255)));
        }

        let bg = LightImage::new(Resolution::new(16, 16), WHITE);
        let out = sw.composite(&scene, &bg).unwrap();
        assert!(out.pixels().iter().all(|p| p[..3].iter().all(|&c| c <= 0.6)));
        assert_eq!(out.get(8, 8)[0], 0.6);
    }

    #[test]
    fn disabled_hull_matches_absent_hull() {
        let sw = SoftwareCompositor::new(&config(64));
        let mut scene = unblurred();
        scene.lights.push(white_light(10.0, 32.0, 60.0));
        scene.hulls.push(Hull::new([(40.0, 10.0), (50.0, 10.0), (45.0, 20.0)]));

        let mut disabled = scene.clone();
        disabled.hulls.push(Hull {
            enabled: false,
            ..wall()
        });

        assert_eq!(sw.lightmap(&disabled).unwrap(), sw.lightmap(&scene).unwrap());
    }

    #[test]
    fn shadowed_pixel_receives_only_ambient() {
        let sw = SoftwareCompositor::new(&config(64));
        let mut scene = unblurred();
        scene.lights.push(white_light(10.0, 32.0, 100.0));
        scene.hulls.push(wall());

        let bg = LightImage::new(Resolution::new(64, 64), WHITE);
        let out = sw.composite(&scene, &bg).unwrap();
        let ambient = scene.ambient_normalized();

        let shadowed = out.get(50, 32);
        assert!((shadowed[0] - ambient.r).abs() < 1e-6);
        // The lit side is brighter.
        assert!(out.get(20, 32)[0] > shadowed[0]);

        // Shadows off: the same pixel is lit.
        scene.lights[0].cast_shadows = false;
        let lit = sw.composite(&scene, &bg).unwrap();
        assert!(lit.get(50, 32)[0] > ambient.r);
    }

    #[test]
    fn single_light_falloff() {
        let sw = SoftwareCompositor::new(&config(64));
        let mut scene = unblurred();
        scene.lights.push(white_light(32.5, 32.5, 20.0));

        let acc = sw.accumulate(&scene).unwrap();
        assert_eq!(acc.get(32, 32), WHITE);
        assert!(acc.get(51, 32)[0] < 0.01);
        assert_eq!(acc.get(52, 32), [0.0; 4]);
        assert!(acc.get(40, 32)[0] > acc.get(45, 32)[0]);
    }

    #[test]
    fn overlapping_lights_double_before_clamp() {
        let sw = SoftwareCompositor::new(&config(32));
        let mut one = unblurred();
        one.lights.push(PointLight::new((16.0, 16.0), 0.4, 12.0).with_color((255, 128, 0)));
        let mut two = one.clone();
        two.lights.push(two.lights[0].clone());

        let a = sw.accumulate(&one).unwrap();
        let b = sw.accumulate(&two).unwrap();
        for (pa, pb) in a.pixels().iter().zip(b.pixels()) {
            for c in 0..4 {
                assert!((pb[c] - 2.0 * pa[c]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn light_overflow_is_reported() {
        let cfg = EngineConfig {
            max_lights: 2,
            ..config(8)
        };
        let sw = SoftwareCompositor::new(&cfg);
        let mut scene = Scene::new();
        for _ in 0..3 {
            scene.lights.push(white_light(4.0, 4.0, 4.0));
        }
        assert!(matches!(
            sw.accumulate(&scene),
            Err(LightingError::CapacityExceeded { what: "light", .. })
        ));
    }
}
