//! World-space axis-aligned bounding boxes

use glam::Vec3;

/// Axis-aligned bounding box in world coordinates.
///
/// Invariant: every component of `min` is less than or equal to `max`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    /// Builds a box centered at `center` with the given half-extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let he = half_extents.abs();
        Self {
            min: center - he,
            max: center + he,
        }
    }

    /// Box of a mesh with local size `size`, uniformly scaled by `scale`
    pub fn of_scaled_box(center: Vec3, size: Vec3, scale: f32) -> Self {
        Self::from_center_half_extents(center, size * scale * 0.5)
    }

    /// Inclusive overlap test (touching faces count)
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}
