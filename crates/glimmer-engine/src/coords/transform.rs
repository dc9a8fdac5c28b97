use super::{Rect, Vec2};

/// Affine map from the unit quad `[0, 1]²` to target pixels.
///
/// `p' = x_axis * p.x + y_axis * p.y + translation`
///
/// Blits are expressed as the image of the unit quad, so an axis-aligned
/// destination rect and a rotated/sheared sprite share one code path.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform2 {
    pub x_axis: Vec2,
    pub y_axis: Vec2,
    pub translation: Vec2,
}

impl Transform2 {
    #[inline]
    pub const fn new(x_axis: Vec2, y_axis: Vec2, translation: Vec2) -> Self {
        Self { x_axis, y_axis, translation }
    }

    /// Maps the unit quad onto `rect`.
    #[inline]
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x_axis: Vec2::new(rect.size.x, 0.0),
            y_axis: Vec2::new(0.0, rect.size.y),
            translation: rect.origin,
        }
    }

    /// Maps the unit quad onto `rect`, rotated by `angle` radians around the rect center.
    pub fn from_rect_rotated(rect: Rect, angle: f32) -> Self {
        let center = rect.center();
        let x_axis = Vec2::new(rect.size.x, 0.0).rotated(angle);
        let y_axis = Vec2::new(0.0, rect.size.y).rotated(angle);
        Self {
            x_axis,
            y_axis,
            translation: center - (x_axis + y_axis) * 0.5,
        }
    }

    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        self.x_axis * p.x + self.y_axis * p.y + self.translation
    }

    /// Images of the unit-quad corners, in `(0,0) (1,0) (1,1) (0,1)` order.
    pub fn corners(self) -> [Vec2; 4] {
        [
            self.apply(Vec2::new(0.0, 0.0)),
            self.apply(Vec2::new(1.0, 0.0)),
            self.apply(Vec2::new(1.0, 1.0)),
            self.apply(Vec2::new(0.0, 1.0)),
        ]
    }
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn from_rect_maps_corners_onto_rect() {
        let t = Transform2::from_rect(Rect::new(10.0, 20.0, 30.0, 40.0));
        let c = t.corners();
        assert_eq!(c[0], Vec2::new(10.0, 20.0));
        assert_eq!(c[2], Vec2::new(40.0, 60.0));
    }

    #[test]
    fn rotation_keeps_center_fixed() {
        let rect = Rect::new(0.0, 0.0, 20.0, 10.0);
        let t = Transform2::from_rect_rotated(rect, 1.1);
        assert!(close(t.apply(Vec2::new(0.5, 0.5)), rect.center()));
    }

    #[test]
    fn half_turn_swaps_opposite_corners() {
        let rect = Rect::new(0.0, 0.0, 20.0, 10.0);
        let t = Transform2::from_rect_rotated(rect, core::f32::consts::PI);
        assert!(close(t.apply(Vec2::new(0.0, 0.0)), Vec2::new(20.0, 10.0)));
    }
}
