//! Collision volumes and contact response for the driving game.
//!
//! There is no rigid-body simulation: objects carry axis-aligned bounds
//! (parry's `Aabb`, re-exported by Rapier) and contacts are resolved with a
//! single closed-form impulse.

pub mod collision;
pub mod impulse;

pub use collision::*;
pub use impulse::*;

// Re-export the bounding-volume types downstream crates work with
pub use rapier3d::parry::bounding_volume::{Aabb, BoundingVolume};
