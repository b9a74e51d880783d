//! Transform component and utilities for spatial positioning.
//!
//! Ground vehicles only ever rotate about the vertical axis, so besides the
//! general position/rotation/scale triple the transform exposes yaw-based
//! helpers. Heading 0 faces +Z; positive heading turns toward +X.

use glam::{Quat, Vec2, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform at `position` facing `heading` radians about +Y.
    pub fn from_position_yaw(position: Vec3, heading: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(heading),
            ..Default::default()
        }
    }

    /// Builder: uniform scale.
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Set rotation from a heading about +Y.
    pub fn set_yaw(&mut self, heading: f32) {
        self.rotation = Quat::from_rotation_y(heading);
    }

    /// Horizontal (x, z) position.
    pub fn planar(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }

    /// Distance between two transforms ignoring height.
    pub fn planar_distance(&self, other: &Transform) -> f32 {
        self.planar().distance(other.planar())
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }
}

/// Unit forward vector for a heading about +Y (heading 0 = +Z).
pub fn heading_forward(heading: f32) -> Vec3 {
    Vec3::new(heading.sin(), 0.0, heading.cos())
}
