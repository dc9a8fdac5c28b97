use crate::paint::Color;

use super::{Hull, PointLight};

/// Live lighting scene.
///
/// Lights are drawn in insertion order. The engine reads this directly every
/// frame; there is no dirty tracking. Mutation and rendering happen on the
/// same thread, which `&mut` access to the engine already enforces.
#[derive(Debug, Clone)]
pub struct Scene {
    pub lights: Vec<PointLight>,
    pub hulls: Vec<Hull>,
    /// Gaussian blur radius in lightmap texels; 0 disables the blur.
    pub shadow_blur_radius: u32,
    /// Upper bound applied to the lightmap before the ambient term.
    pub max_luminosity: f32,
    ambient: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            lights: Vec::new(),
            hulls: Vec::new(),
            shadow_blur_radius: 5,
            max_luminosity: 1.0,
            ambient: Color::new(0.25, 0.25, 0.25, 0.25),
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ambient floor from 0–255 channels; alpha defaults to 255.
    pub fn set_ambient(&mut self, color: impl Into<Color>) {
        self.ambient = color.into();
    }

    /// Ambient floor in 0–255 channels.
    pub fn ambient(&self) -> [u8; 4] {
        self.ambient.to_rgba8()
    }

    #[inline]
    pub(crate) fn ambient_normalized(&self) -> Color {
        self.ambient
    }

    /// Number of enabled lights, i.e. lighting passes per frame.
    pub fn enabled_lights(&self) -> usize {
        self.lights.iter().filter(|l| l.enabled).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ambient_reads_back_in_bytes() {
        let scene = Scene::new();
        assert_eq!(scene.ambient(), [63, 63, 63, 63]);
        assert_eq!(scene.shadow_blur_radius, 5);
    }

    #[test]
    fn set_ambient_defaults_alpha() {
        let mut scene = Scene::new();
        scene.set_ambient((10, 20, 30));
        assert_eq!(scene.ambient()[3], 255);
    }

    #[test]
    fn enabled_lights_skips_disabled() {
        let mut scene = Scene::new();
        scene.lights.push(PointLight::default());
        scene.lights.push(PointLight::default().with_enabled(false));
        assert_eq!(scene.enabled_lights(), 1);
    }
}
