//! Biome classification for roadside terrain.

use glam::Vec3;

/// Biome of a chunk, picked from its world-space origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiomeType {
    /// Sparse palms and cacti.
    Desert,
    /// Open grass with a few oaks.
    Grassland,
    /// Dense pines.
    Forest,
}

impl BiomeType {
    /// Classify a world position. The classifier is a smooth periodic field
    /// of both horizontal axes, so neighbouring chunks tend to agree.
    pub fn at(world_x: f32, world_z: f32) -> Self {
        let v = ((world_x * 0.01).sin() + (world_z * 0.01).cos()) * 0.5;
        if v < -0.3 {
            BiomeType::Desert
        } else if v < 0.3 {
            BiomeType::Grassland
        } else {
            BiomeType::Forest
        }
    }
}

/// Biome-dependent placement parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomeConfig {
    pub biome_type: BiomeType,
    /// Trees always placed (before road exclusion).
    pub tree_base: u32,
    /// Extra trees drawn uniformly from `[0, tree_extra)`.
    pub tree_extra: u32,
    /// Vegetation candidates per chunk.
    pub vegetation_count: u32,
    /// Tint for the ground surface.
    pub ground_tint: Vec3,
}

impl BiomeConfig {
    /// Get configuration for a biome type.
    pub fn from_type(biome_type: BiomeType) -> Self {
        match biome_type {
            BiomeType::Desert => Self {
                biome_type,
                tree_base: 0,
                tree_extra: 3,
                vegetation_count: 10,
                ground_tint: Vec3::new(0.88, 0.78, 0.60),
            },
            BiomeType::Grassland => Self {
                biome_type,
                tree_base: 3,
                tree_extra: 5,
                vegetation_count: 50,
                ground_tint: Vec3::new(0.36, 0.51, 0.20),
            },
            BiomeType::Forest => Self {
                biome_type,
                tree_base: 15,
                tree_extra: 10,
                vegetation_count: 20,
                ground_tint: Vec3::new(0.25, 0.42, 0.16),
            },
        }
    }

    /// Tree count for a uniform roll `r` in `[0, 1)`.
    pub fn tree_count(&self, r: f32) -> u32 {
        self.tree_base + (r * self.tree_extra as f32) as u32
    }
}
