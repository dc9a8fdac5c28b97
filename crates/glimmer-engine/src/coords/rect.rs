use super::Vec2;

/// Pixel rectangle, top-left origin with +Y down.
///
/// Blit destinations are in layer pixels, sources in texture pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// The whole of a `width`x`height` image.
    #[inline]
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Bottom-right corner.
    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Nothing to draw: zero or negative extent on either axis.
    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// `[u0, v0, u1, v1]` of this rect inside a `width`x`height` texture.
    #[inline]
    pub fn to_uv_bounds(self, width: u32, height: u32) -> [f32; 4] {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        let end = self.max();
        [self.origin.x / w, self.origin.y / h, end.x / w, end.y / h]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_texture_maps_to_unit_uv() {
        assert_eq!(Rect::from_size(64, 32).to_uv_bounds(64, 32), [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn tile_in_atlas_maps_to_sub_uv() {
        let uv = Rect::new(16.0, 8.0, 16.0, 8.0).to_uv_bounds(64, 32);
        assert_eq!(uv, [0.25, 0.25, 0.5, 0.5]);
    }

    #[test]
    fn degenerate_rects_are_empty() {
        assert!(Rect::new(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(Rect::new(0.0, 0.0, -3.0, 5.0).is_empty());
        assert!(Rect::new(0.0, 0.0, f32::NAN, 5.0).is_empty());
        assert!(!Rect::new(4.0, 4.0, 1.0, 1.0).is_empty());
        assert_eq!(Rect::new(2.0, 2.0, 4.0, 6.0).center(), Vec2::new(4.0, 5.0));
    }
}
