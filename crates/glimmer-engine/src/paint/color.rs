/// Normalized straight-alpha RGBA color.
///
/// Invariant: channels are stored as `f32` in `[0, 1]`. Integer accessors read
/// back as `floor(x * 255)`, so a `from_rgba8` / `to_rgba8` round trip is exact
/// to within one unit.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// A color slice had neither 3 (RGB) nor 4 (RGBA) components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("color must have 3 (RGB) or 4 (RGBA) components, got {0}")]
pub struct InvalidColorLength(pub usize);

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    /// Creates a color from 0–255 channels.
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Creates an opaque color from 0–255 channels.
    #[inline]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    /// Returns 0–255 channels, `floor(x * 255)` each.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            denormalize(self.r),
            denormalize(self.g),
            denormalize(self.b),
            denormalize(self.a),
        ]
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    /// Decodes sRGB-encoded channels to linear; alpha is unchanged.
    ///
    /// Clear colors on sRGB targets are given in linear space.
    pub fn to_linear(self) -> Self {
        Self::new(srgb_to_linear(self.r), srgb_to_linear(self.g), srgb_to_linear(self.b), self.a)
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn denormalize(x: f32) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).floor() as u8
}

impl From<(u8, u8, u8)> for Color {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::from_rgb8(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Color {
    #[inline]
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Self::from_rgba8(r, g, b, a)
    }
}

impl From<[u8; 3]> for Color {
    #[inline]
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::from_rgb8(r, g, b)
    }
}

impl From<[u8; 4]> for Color {
    #[inline]
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::from_rgba8(r, g, b, a)
    }
}

impl TryFrom<&[u8]> for Color {
    type Error = InvalidColorLength;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match *value {
            [r, g, b] => Ok(Self::from_rgb8(r, g, b)),
            [r, g, b, a] => Ok(Self::from_rgba8(r, g, b, a)),
            _ => Err(InvalidColorLength(value.len())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_defaults_alpha_to_opaque() {
        assert_eq!(Color::from((10, 20, 30)).to_rgba8()[3], 255);
        assert_eq!(Color::from([10, 20, 30]).a, 1.0);
    }

    #[test]
    fn rgba8_round_trip_within_one_unit() {
        for v in 0..=255u8 {
            let back = Color::from_rgba8(v, 255 - v, v / 2, v).to_rgba8();
            let expected = [v, 255 - v, v / 2, v];
            for (got, want) in back.iter().zip(expected) {
                assert!(got.abs_diff(want) <= 1, "{got} vs {want}");
            }
        }
    }

    #[test]
    fn slice_accepts_three_or_four_components() {
        assert_eq!(Color::try_from(&[1u8, 2, 3][..]).unwrap(), Color::from_rgb8(1, 2, 3));
        assert_eq!(Color::try_from(&[1u8, 2, 3, 4][..]).unwrap(), Color::from_rgba8(1, 2, 3, 4));
    }

    #[test]
    fn slice_rejects_other_lengths() {
        assert_eq!(Color::try_from(&[1u8, 2][..]), Err(InvalidColorLength(2)));
        assert_eq!(Color::try_from(&[0u8; 5][..]), Err(InvalidColorLength(5)));
    }

    #[test]
    fn to_linear_keeps_endpoints_and_alpha() {
        let c = Color::new(0.0, 1.0, 0.5, 0.3).to_linear();
        assert_eq!(c.r, 0.0);
        assert!((c.g - 1.0).abs() < 1e-6);
        assert!((c.b - 0.214).abs() < 1e-3);
        assert_eq!(c.a, 0.3);
    }

    #[test]
    fn to_rgba8_clamps_out_of_range() {
        assert_eq!(Color::new(2.0, -1.0, 0.5, 1.0).to_rgba8(), [255, 0, 127, 255]);
    }
}
