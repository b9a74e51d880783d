//! Chunk content generation.
//!
//! [`ChunkContent::generate`] is a pure function of the chunk coordinate and
//! the generation config: the same chunk always comes out the same, so the
//! streamer can drop chunks freely and rebuild them when the player returns.

use glam::Vec3;

use crate::biome::{BiomeConfig, BiomeType};
use crate::decor::{self, BoulderPlacement, TreePlacement, VegetationPlacement};
use crate::rewards::{self, RewardPlacement};

/// Spacing between lane markings along the road.
pub const MARKING_SPACING: f32 = 20.0;
/// Every n-th chunk row/column is a sand strip.
const SAND_PERIOD: i32 = 5;

/// Integer chunk coordinates on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing a world position (floor division on both axes).
    pub fn from_world(position: Vec3, chunk_size: f32) -> Self {
        Self {
            x: (position.x / chunk_size).floor() as i32,
            z: (position.z / chunk_size).floor() as i32,
        }
    }

    /// World-space anchor of the chunk: the centre of its ground plane.
    pub fn origin(&self, chunk_size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * chunk_size, 0.0, self.z as f32 * chunk_size)
    }

    /// Largest per-axis distance to another chunk.
    pub fn chebyshev_distance(&self, other: ChunkCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }

    /// The road runs along the `x == 0` column.
    pub fn has_road(&self) -> bool {
        self.x == 0
    }

    /// Every coordinate within `radius` of `self` (inclusive square).
    pub fn square(self, radius: u32) -> impl Iterator<Item = ChunkCoord> {
        let r = radius as i32;
        (-r..=r).flat_map(move |dx| (-r..=r).map(move |dz| ChunkCoord::new(self.x + dx, self.z + dz)))
    }
}

/// Ground surface material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroundKind {
    Sand,
    Grass,
}

impl GroundKind {
    pub fn for_chunk(coord: ChunkCoord) -> Self {
        if coord.x.abs() % SAND_PERIOD == 0 || coord.z.abs() % SAND_PERIOD == 0 {
            GroundKind::Sand
        } else {
            GroundKind::Grass
        }
    }
}

/// Straight road piece running along +Z through the chunk centre.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSegment {
    pub center: Vec3,
    pub width: f32,
    pub length: f32,
    /// World-space positions of the centre-line markings.
    pub markings: Vec<Vec3>,
}

impl RoadSegment {
    fn build(coord: ChunkCoord, config: &GenConfig) -> Self {
        let center = coord.origin(config.chunk_size);
        let half = config.chunk_size / 2.0;
        let mut markings = Vec::new();
        let mut offset = -half + MARKING_SPACING / 2.0;
        while offset < half {
            markings.push(center + Vec3::new(0.0, 0.02, offset));
            offset += MARKING_SPACING;
        }
        Self {
            center,
            width: config.road_width,
            length: config.chunk_size,
            markings,
        }
    }
}

/// Generation parameters shared by every chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenConfig {
    /// Edge length of a square chunk.
    pub chunk_size: f32,
    /// Width of the road along the `x == 0` column.
    pub road_width: f32,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            chunk_size: 200.0,
            road_width: 80.0,
        }
    }
}

/// Everything placed in one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkContent {
    pub coord: ChunkCoord,
    pub biome: BiomeType,
    pub ground: GroundKind,
    pub road: Option<RoadSegment>,
    pub trees: Vec<TreePlacement>,
    pub boulders: Vec<BoulderPlacement>,
    pub vegetation: Vec<VegetationPlacement>,
    pub rewards: Vec<RewardPlacement>,
}

impl ChunkContent {
    /// Generate a chunk. `include_health` allows a health pickup among the
    /// rewards (set while the player is below full health).
    pub fn generate(coord: ChunkCoord, config: &GenConfig, include_health: bool) -> Self {
        let origin = coord.origin(config.chunk_size);
        let biome = BiomeType::at(origin.x, origin.z);
        let biome_config = BiomeConfig::from_type(biome);

        let content = Self {
            coord,
            biome,
            ground: GroundKind::for_chunk(coord),
            road: coord.has_road().then(|| RoadSegment::build(coord, config)),
            trees: decor::place_trees(coord, &biome_config, config),
            boulders: decor::place_boulders(coord, config),
            vegetation: decor::place_vegetation(coord, &biome_config, config),
            rewards: rewards::place_rewards(coord, config, include_health),
        };

        log::trace!(
            "Generated chunk ({}, {}): {:?}, {} trees, {} boulders, {} plants, {} rewards",
            coord.x,
            coord.z,
            biome,
            content.trees.len(),
            content.boulders.len(),
            content.vegetation.len(),
            content.rewards.len()
        );
        content
    }

    /// Number of decor objects that block the car.
    pub fn collidable_count(&self) -> usize {
        self.trees.len()
            + self.boulders.len()
            + self.vegetation.iter().filter(|v| v.kind.is_collidable()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Same chunk, same content (replayability).
    #[test]
    fn chunk_generation_is_deterministic() {
        let cfg = GenConfig::default();
        for coord in ChunkCoord::new(0, 0).square(3) {
            let a = ChunkContent::generate(coord, &cfg, true);
            let b = ChunkContent::generate(coord, &cfg, true);
            assert_eq!(a, b, "chunk {:?} should regenerate identically", coord);
        }
    }

    #[test]
    fn from_world_floors_negative_positions() {
        assert_eq!(ChunkCoord::from_world(Vec3::new(-0.1, 0.0, 199.9), 200.0), ChunkCoord::new(-1, 0));
        assert_eq!(ChunkCoord::from_world(Vec3::new(200.0, 5.0, -200.0), 200.0), ChunkCoord::new(1, -1));
    }

    #[test]
    fn square_has_expected_size() {
        let coords: Vec<_> = ChunkCoord::new(5, -2).square(3).collect();
        assert_eq!(coords.len(), 49);
        assert!(coords.iter().all(|c| c.chebyshev_distance(ChunkCoord::new(5, -2)) <= 3));
    }

    #[test]
    fn road_only_in_centre_column() {
        let cfg = GenConfig::default();
        let road = ChunkContent::generate(ChunkCoord::new(0, 4), &cfg, false).road;
        let road = road.expect("centre column has a road");
        assert_eq!(road.markings.len(), 10);
        assert_eq!(road.width, 80.0);
        assert!(ChunkContent::generate(ChunkCoord::new(1, 4), &cfg, false).road.is_none());
    }

    #[test]
    fn sand_strips_every_fifth_chunk() {
        assert_eq!(GroundKind::for_chunk(ChunkCoord::new(0, 3)), GroundKind::Sand);
        assert_eq!(GroundKind::for_chunk(ChunkCoord::new(-5, 3)), GroundKind::Sand);
        assert_eq!(GroundKind::for_chunk(ChunkCoord::new(2, 10)), GroundKind::Sand);
        assert_eq!(GroundKind::for_chunk(ChunkCoord::new(2, 3)), GroundKind::Grass);
    }

    proptest! {
        #[test]
        fn any_chunk_regenerates_identically(x in -10_000i32..10_000, z in -10_000i32..10_000, health: bool) {
            let cfg = GenConfig::default();
            let coord = ChunkCoord::new(x, z);
            prop_assert_eq!(
                ChunkContent::generate(coord, &cfg, health),
                ChunkContent::generate(coord, &cfg, health)
            );
        }
    }
}
