//! Deterministic content generation for the endless road.
//!
//! Everything here is a pure function of chunk coordinates: biomes, decor,
//! road segments and reward placement.

pub mod biome;
pub mod decor;
pub mod random;
pub mod rewards;
pub mod terrain;

pub use biome::*;
pub use decor::*;
pub use random::*;
pub use rewards::*;
pub use terrain::*;
