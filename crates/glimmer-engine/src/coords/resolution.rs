use super::Vec2;

/// Integer pixel extent of a render target or display.
///
/// The engine deals with three of these at once: screen, native and lightmap.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[inline]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Converts a pixel position (top-left origin, +Y down) into UV space with Y
    /// flipped: `(x / w, 1 - y / h)`.
    ///
    /// This is the convention shared by hull vertices and light positions in the
    /// lighting programs.
    #[inline]
    pub fn to_uv(self, p: Vec2) -> Vec2 {
        let w = self.width.max(1) as f32;
        let h = self.height.max(1) as f32;
        Vec2::new(p.x / w, 1.0 - p.y / h)
    }

    /// Scales by a rational factor, rounding down and never reaching zero.
    #[inline]
    pub fn scaled_by(self, factor: f32) -> Self {
        Self {
            width: ((self.width as f32 * factor) as u32).max(1),
            height: ((self.height as f32 * factor) as u32).max(1),
        }
    }

    #[inline]
    pub fn to_extent(self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }
}

impl From<(u32, u32)> for Resolution {
    #[inline]
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_uv_flips_y() {
        let res = Resolution::new(200, 100);
        assert_eq!(res.to_uv(Vec2::new(0.0, 0.0)), Vec2::new(0.0, 1.0));
        assert_eq!(res.to_uv(Vec2::new(200.0, 100.0)), Vec2::new(1.0, 0.0));
        assert_eq!(res.to_uv(Vec2::new(50.0, 25.0)), Vec2::new(0.25, 0.75));
    }

    #[test]
    fn scaled_by_never_reaches_zero() {
        assert_eq!(Resolution::new(1280, 720).scaled_by(0.4), Resolution::new(512, 288));
        assert_eq!(Resolution::new(1, 1).scaled_by(0.1), Resolution::new(1, 1));
    }
}
