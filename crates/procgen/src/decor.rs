//! Roadside decor: trees, boulders and low vegetation.

use glam::Vec3;
use rand::{rngs::StdRng, Rng};

use crate::biome::{BiomeConfig, BiomeType};
use crate::random::chunk_rng;
use crate::terrain::{ChunkCoord, GenConfig};

/// Clearance beyond the road half-width for each decor class.
pub const TREE_ROAD_MARGIN: f32 = 3.0;
pub const BOULDER_ROAD_MARGIN: f32 = 50.0;
pub const VEGETATION_ROAD_MARGIN: f32 = 0.5;

/// Boulder candidates per chunk.
pub const BOULDERS_PER_CHUNK: u32 = 2;

const SALT_TREES: u64 = 0x7472_6565;
const SALT_BOULDERS: u64 = 0x726f_636b;
const SALT_VEGETATION: u64 = 0x7665_6765;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeSpecies {
    Pine,
    Oak,
    Palm,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreePlacement {
    pub species: TreeSpecies,
    /// Base of the trunk, on the ground.
    pub position: Vec3,
    pub scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoulderPlacement {
    /// Centre of the boulder (half sunk into the ground).
    pub position: Vec3,
    pub size: f32,
    /// Euler rotation in radians.
    pub rotation: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VegetationKind {
    Grass,
    Bush,
    Cactus,
}

impl VegetationKind {
    /// Only cacti are solid.
    pub fn is_collidable(self) -> bool {
        matches!(self, VegetationKind::Cactus)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VegetationPlacement {
    pub kind: VegetationKind,
    pub position: Vec3,
    pub scale: f32,
}

/// Random point inside the chunk square, as world coordinates.
fn scatter(rng: &mut StdRng, origin: Vec3, chunk_size: f32) -> Vec3 {
    let x = rng.gen::<f32>() * chunk_size - chunk_size / 2.0 + origin.x;
    let z = rng.gen::<f32>() * chunk_size - chunk_size / 2.0 + origin.z;
    Vec3::new(x, 0.0, z)
}

/// Whether a point is too close to the road centre line of its chunk.
fn on_road(position: Vec3, origin: Vec3, config: &GenConfig, margin: f32) -> bool {
    (position.x - origin.x).abs() < config.road_width / 2.0 + margin
}

pub fn place_trees(coord: ChunkCoord, biome: &BiomeConfig, config: &GenConfig) -> Vec<TreePlacement> {
    let mut rng = chunk_rng(coord.x, coord.z, SALT_TREES);
    let origin = coord.origin(config.chunk_size);
    let count = biome.tree_count(rng.gen());

    let mut trees = Vec::new();
    for _ in 0..count {
        // Every candidate consumes the same draws, placed or not.
        let position = scatter(&mut rng, origin, config.chunk_size);
        let roll: f32 = rng.gen();
        let scale = rng.gen_range(3.0..8.0);
        if on_road(position, origin, config, TREE_ROAD_MARGIN) {
            continue;
        }
        let species = match biome.biome_type {
            BiomeType::Desert => TreeSpecies::Palm,
            BiomeType::Grassland if roll < 0.7 => TreeSpecies::Oak,
            BiomeType::Grassland => TreeSpecies::Pine,
            BiomeType::Forest if roll < 0.6 => TreeSpecies::Pine,
            BiomeType::Forest => TreeSpecies::Oak,
        };
        trees.push(TreePlacement {
            species,
            position,
            scale,
        });
    }
    trees
}

pub fn place_boulders(coord: ChunkCoord, config: &GenConfig) -> Vec<BoulderPlacement> {
    let mut rng = chunk_rng(coord.x, coord.z, SALT_BOULDERS);
    let origin = coord.origin(config.chunk_size);

    let mut boulders = Vec::new();
    for _ in 0..BOULDERS_PER_CHUNK {
        let mut position = scatter(&mut rng, origin, config.chunk_size);
        let size = rng.gen_range(10.0..12.5);
        let rotation = Vec3::new(
            rng.gen::<f32>() * std::f32::consts::PI,
            rng.gen::<f32>() * std::f32::consts::PI,
            rng.gen::<f32>() * std::f32::consts::PI,
        );
        if on_road(position, origin, config, BOULDER_ROAD_MARGIN) {
            continue;
        }
        position.y = size / 2.0;
        boulders.push(BoulderPlacement { position, size, rotation });
    }
    boulders
}

pub fn place_vegetation(
    coord: ChunkCoord,
    biome: &BiomeConfig,
    config: &GenConfig,
) -> Vec<VegetationPlacement> {
    let mut rng = chunk_rng(coord.x, coord.z, SALT_VEGETATION);
    let origin = coord.origin(config.chunk_size);

    let mut plants = Vec::new();
    for _ in 0..biome.vegetation_count {
        let position = scatter(&mut rng, origin, config.chunk_size);
        let roll: f32 = rng.gen();
        let scale = rng.gen_range(2.0..2.5);
        if on_road(position, origin, config, VEGETATION_ROAD_MARGIN) {
            continue;
        }
        let kind = match biome.biome_type {
            BiomeType::Desert if roll < 0.7 => VegetationKind::Cactus,
            BiomeType::Desert => VegetationKind::Bush,
            BiomeType::Grassland if roll < 0.8 => VegetationKind::Grass,
            BiomeType::Grassland => VegetationKind::Bush,
            BiomeType::Forest if roll < 0.5 => VegetationKind::Bush,
            BiomeType::Forest => VegetationKind::Grass,
        };
        plants.push(VegetationPlacement { kind, position, scale });
    }
    plants
}
