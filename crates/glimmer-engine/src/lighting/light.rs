use crate::coords::Vec2;
use crate::paint::Color;

use super::error::LightingResult;

/// Point light in native pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub position: Vec2,
    /// Intensity at the center. Negative values light nothing.
    pub power: f32,
    /// Falloff distance in native pixels.
    pub radius: f32,
    pub enabled: bool,
    pub cast_shadows: bool,
    color: Color,
}

impl PointLight {
    pub fn new(position: impl Into<Vec2>, power: f32, radius: f32) -> Self {
        Self {
            position: position.into(),
            power,
            radius,
            ..Default::default()
        }
    }

    /// Sets the color from 0–255 channels; alpha defaults to 255.
    pub fn set_color(&mut self, color: impl Into<Color>) {
        self.color = color.into();
    }

    /// Sets the color from a 3 or 4 component slice.
    pub fn try_set_color(&mut self, channels: &[u8]) -> LightingResult<()> {
        self.color = Color::try_from(channels)?;
        Ok(())
    }

    /// Builder form of [`set_color`](Self::set_color).
    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.set_color(color);
        self
    }

    /// Builder form of toggling [`enabled`](Self::enabled).
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Color in 0–255 channels, `floor(x * 255)`.
    pub fn color_rgba8(&self) -> [u8; 4] {
        self.color.to_rgba8()
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            power: 1.0,
            radius: 10.0,
            enabled: true,
            cast_shadows: true,
            color: Color::black(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::LightingError;

    #[test]
    fn defaults() {
        let light = PointLight::new((4.0, 2.0), 1.0, 10.0);
        assert!(light.enabled);
        assert!(light.cast_shadows);
        assert_eq!(light.color_rgba8(), [0, 0, 0, 255]);
    }

    #[test]
    fn set_color_accepts_all_shapes() {
        let mut light = PointLight::default();

        light.set_color((255, 128, 0));
        assert_eq!(light.color_rgba8()[3], 255);

        light.set_color([10, 20, 30, 40]);
        let c = light.color_rgba8();
        for (got, want) in c.iter().zip([10u8, 20, 30, 40]) {
            assert!((*got as i16 - want as i16).abs() <= 1);
        }

        light.try_set_color(&[1, 2, 3]).unwrap();
        assert_eq!(light.color_rgba8()[3], 255);
    }

    #[test]
    fn bad_slice_length_is_rejected_and_keeps_color() {
        let mut light = PointLight::default().with_color((200, 100, 50));
        let before = light.color();
        let err = light.try_set_color(&[1, 2]).unwrap_err();
        assert!(matches!(err, LightingError::InvalidColor { len: 2 }));
        assert_eq!(light.color(), before);
    }

    #[test]
    fn color_round_trips_within_one() {
        let mut light = PointLight::default();
        for v in [0u8, 1, 17, 127, 128, 200, 254, 255] {
            light.set_color((v, v, v, v));
            for ch in light.color_rgba8() {
                assert!((ch as i16 - v as i16).abs() <= 1, "{v} -> {ch}");
            }
        }
    }
}
