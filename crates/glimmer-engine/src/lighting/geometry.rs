//! Hull geometry snapshot and its GPU storage.
//!
//! Vertices of every enabled hull are concatenated into one array in UV space
//! (Y flipped). A second array holds one cumulative end offset per hull, so
//! hull `i` spans `offsets[i - 1]..offsets[i]` (with `offsets[-1] = 0`).

use crate::coords::Resolution;

use super::Hull;
use super::error::{LightingError, LightingResult};

/// Fixed limits of the geometry buffers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GeometryCapacity {
    pub max_hulls: usize,
    pub max_vertices: usize,
}

/// Packed per-frame hull data, ready for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HullGeometry {
    pub vertices: Vec<[f32; 2]>,
    pub offsets: Vec<u32>,
}

impl HullGeometry {
    /// Number of packed (enabled) hulls.
    #[inline]
    pub fn hull_count(&self) -> u32 {
        self.offsets.len() as u32
    }

    /// Vertex range of hull `index` in [`vertices`](Self::vertices).
    pub fn hull_range(&self, index: usize) -> std::ops::Range<usize> {
        let start = if index == 0 { 0 } else { self.offsets[index - 1] as usize };
        start..self.offsets[index] as usize
    }
}

/// Packs enabled hulls for the occlusion test.
///
/// Fails with `CapacityExceeded` rather than dropping hulls.
pub fn pack(hulls: &[Hull], native: Resolution, capacity: GeometryCapacity) -> LightingResult<HullGeometry> {
    let enabled = || hulls.iter().filter(|h| h.enabled);

    let hull_count = enabled().count();
    if hull_count > capacity.max_hulls {
        return Err(LightingError::capacity("hull", hull_count, capacity.max_hulls));
    }

    let vertex_count: usize = enabled().map(|h| h.vertices.len()).sum();
    if vertex_count > capacity.max_vertices {
        return Err(LightingError::capacity("hull vertex", vertex_count, capacity.max_vertices));
    }

    let mut geometry = HullGeometry {
        vertices: Vec::with_capacity(vertex_count),
        offsets: Vec::with_capacity(hull_count),
    };

    for hull in enabled() {
        geometry
            .vertices
            .extend(hull.vertices.iter().map(|&v| native.to_uv(v).to_array()));
        geometry.offsets.push(geometry.vertices.len() as u32);
    }

    Ok(geometry)
}

/// Pre-sized storage buffers holding the current [`HullGeometry`].
pub(crate) struct GeometryBuffer {
    vertices: wgpu::Buffer,
    offsets: wgpu::Buffer,
    capacity: GeometryCapacity,
    hull_count: u32,
}

impl GeometryBuffer {
    pub(crate) fn new(device: &wgpu::Device, capacity: GeometryCapacity) -> Self {
        let storage = |label: &str, size: u64| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };

        let vertices = storage(
            "glimmer hull vertices",
            (capacity.max_vertices * std::mem::size_of::<[f32; 2]>()) as u64,
        );
        let offsets = storage(
            "glimmer hull offsets",
            (capacity.max_hulls * std::mem::size_of::<u32>()) as u64,
        );

        log::debug!(
            "geometry buffers: {} hulls, {} vertices",
            capacity.max_hulls,
            capacity.max_vertices
        );

        Self {
            vertices,
            offsets,
            capacity,
            hull_count: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> GeometryCapacity {
        self.capacity
    }

    #[inline]
    pub(crate) fn hull_count(&self) -> u32 {
        self.hull_count
    }

    /// Writes a packed snapshot. Stale data past the new lengths is never read
    /// because the hull count bounds every lookup.
    pub(crate) fn upload(&mut self, queue: &wgpu::Queue, geometry: &HullGeometry) {
        debug_assert!(geometry.offsets.len() <= self.capacity.max_hulls);
        debug_assert!(geometry.vertices.len() <= self.capacity.max_vertices);

        if !geometry.vertices.is_empty() {
            queue.write_buffer(&self.vertices, 0, bytemuck::cast_slice(&geometry.vertices));
        }
        if !geometry.offsets.is_empty() {
            queue.write_buffer(&self.offsets, 0, bytemuck::cast_slice(&geometry.offsets));
        }
        self.hull_count = geometry.hull_count();
    }

    pub(crate) fn vertices(&self) -> &wgpu::Buffer {
        &self.vertices
    }

    pub(crate) fn offsets(&self) -> &wgpu::Buffer {
        &self.offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAP: GeometryCapacity = GeometryCapacity {
        max_hulls: 4,
        max_vertices: 8,
    };

    fn square(x: f32, y: f32) -> Hull {
        Hull::new([(x, y), (x + 10.0, y), (x + 10.0, y + 10.0), (x, y + 10.0)])
    }

    #[test]
    fn packs_uv_and_cumulative_offsets() {
        let native = Resolution::new(100, 50);
        let tri = Hull::new([(0.0, 0.0), (50.0, 0.0), (50.0, 25.0)]);
        let g = pack(&[tri, square(10.0, 10.0)], native, CAP).unwrap();

        assert_eq!(g.offsets, vec![3, 7]);
        assert_eq!(g.vertices[0], [0.0, 1.0]);
        assert_eq!(g.vertices[2], [0.5, 0.5]);
        assert_eq!(g.hull_range(1), 3..7);
    }

    #[test]
    fn disabled_hulls_are_skipped() {
        let native = Resolution::new(100, 100);
        let mut off = square(0.0, 0.0);
        off.enabled = false;
        let g = pack(&[off, square(50.0, 50.0)], native, CAP).unwrap();
        assert_eq!(g.hull_count(), 1);
        assert_eq!(g.offsets, vec![4]);
        assert_eq!(g.vertices[0], [0.5, 0.5]);
    }

    #[test]
    fn empty_scene_packs_nothing() {
        let g = pack(&[], Resolution::new(10, 10), CAP).unwrap();
        assert_eq!(g, HullGeometry::default());
    }

    // ── capacity ──────────────────────────────────────────────────────────

    #[test]
    fn vertex_overflow_is_an_error() {
        let hulls = [square(0.0, 0.0), square(20.0, 0.0), square(40.0, 0.0)];
        let err = pack(&hulls, Resolution::new(100, 100), CAP).unwrap_err();
        assert!(matches!(
            err,
            LightingError::CapacityExceeded { requested: 12, capacity: 8, .. }
        ));
    }

    #[test]
    fn hull_overflow_is_an_error() {
        let hulls: Vec<Hull> = (0..5).map(|_| Hull::new([(0.0, 0.0)])).collect();
        let err = pack(&hulls, Resolution::new(100, 100), CAP).unwrap_err();
        assert!(matches!(
            err,
            LightingError::CapacityExceeded { what: "hull", requested: 5, capacity: 4 }
        ));
    }

    #[test]
    fn disabled_hulls_do_not_count_against_capacity() {
        let mut hulls = vec![square(0.0, 0.0), square(20.0, 0.0), square(40.0, 0.0)];
        hulls[2].enabled = false;
        assert!(pack(&hulls, Resolution::new(100, 100), CAP).is_ok());
    }
}
