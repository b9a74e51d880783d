//! Core engine types shared by every crate of the driving game.
//!
//! This crate provides the foundational types used across all systems:
//! - Transform with yaw helpers for ground vehicles
//! - Session clock (wall-clock or manually stepped)
//! - Common components (health, lifetimes)

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
