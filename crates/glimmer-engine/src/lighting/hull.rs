use crate::coords::Vec2;

/// Opaque polygon occluder, vertices in native pixels.
///
/// The vertex loop is closed implicitly. Hulls with fewer than three vertices
/// are accepted and cast no shadow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hull {
    pub vertices: Vec<Vec2>,
    /// Reserved: interiors are never lit.
    pub illuminate_interior: bool,
    pub enabled: bool,
}

impl Hull {
    pub fn new<I, P>(vertices: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Vec2>,
    {
        Self {
            vertices: vertices.into_iter().map(Into::into).collect(),
            illuminate_interior: false,
            enabled: true,
        }
    }

    /// True if this hull takes part in occlusion.
    #[inline]
    pub fn occludes(&self) -> bool {
        self.enabled && self.vertices.len() >= 3
    }

    /// Closed edge loop: `(v0, v1), (v1, v2), ..., (vn, v0)`.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_close_the_loop() {
        let hull = Hull::new([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let edges: Vec<_> = hull.edges().collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2], (Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn degenerate_hull_does_not_occlude() {
        let mut hull = Hull::new([(0.0, 0.0), (1.0, 1.0)]);
        assert!(!hull.occludes());
        hull.vertices.push(Vec2::new(2.0, 0.0));
        assert!(hull.occludes());
        hull.enabled = false;
        assert!(!hull.occludes());
    }
}
