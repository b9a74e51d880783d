//! Bounding volumes for collision tests.

use glam::Vec3;
use rapier3d::na::Point3;
use rapier3d::parry::bounding_volume::{Aabb, BoundingVolume};

/// Per-axis factors used to shrink the player's raw bounds so grazing
/// contacts with the mesh silhouette don't register as hits.
pub const PLAYER_BOUNDS_TIGHTENING: Vec3 = Vec3::new(0.8, 0.7, 0.9);

/// Collision volume of an object, expressed as half-extents around a centre
/// offset from the object's transform position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub half_extents: Vec3,
    /// Offset from the transform position to the volume centre.
    pub center_offset: Vec3,
}

impl Bounds {
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            center_offset: Vec3::ZERO,
        }
    }

    /// Bounds whose base sits at the transform position (trees, cacti).
    pub fn standing(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            center_offset: Vec3::new(0.0, half_extents.y, 0.0),
        }
    }

    /// Uniform cube bounds.
    pub fn cube(half: f32) -> Self {
        Self::new(Vec3::splat(half))
    }

    /// World-space box for an unrotated object at `position`.
    pub fn world_aabb(&self, position: Vec3) -> Aabb {
        aabb_from_center(position + self.center_offset, self.half_extents)
    }

    /// World-space box enclosing the volume after a yaw rotation, like a
    /// box computed from a rotated mesh.
    pub fn world_aabb_yawed(&self, position: Vec3, heading: f32) -> Aabb {
        let (s, c) = heading.sin_cos();
        let (s, c) = (s.abs(), c.abs());
        let h = self.half_extents;
        let half = Vec3::new(c * h.x + s * h.z, h.y, s * h.x + c * h.z);
        aabb_from_center(position + self.center_offset, half)
    }
}

/// Build an `Aabb` from a centre point and half-extents.
pub fn aabb_from_center(center: Vec3, half: Vec3) -> Aabb {
    let half = half.abs();
    let mins = center - half;
    let maxs = center + half;
    Aabb::new(
        Point3::new(mins.x, mins.y, mins.z),
        Point3::new(maxs.x, maxs.y, maxs.z),
    )
}

/// Centre of a box as a glam vector.
pub fn aabb_center(aabb: &Aabb) -> Vec3 {
    let c = aabb.center();
    Vec3::new(c.x, c.y, c.z)
}

/// Full size of a box along each axis.
pub fn aabb_size(aabb: &Aabb) -> Vec3 {
    Vec3::new(
        aabb.maxs.x - aabb.mins.x,
        aabb.maxs.y - aabb.mins.y,
        aabb.maxs.z - aabb.mins.z,
    )
}

/// Scale a box about its centre by per-axis factors.
pub fn tighten(aabb: &Aabb, factors: Vec3) -> Aabb {
    let half = aabb_size(aabb) * 0.5 * factors;
    aabb_from_center(aabb_center(aabb), half)
}

/// Overlap test (touching faces count as overlapping).
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.intersects(b)
}
