//! Chunk streaming around the player.

use std::collections::HashMap;

use engine_core::{Entity, Vec3, World};
use procgen::{BiomeType, ChunkContent, ChunkCoord, GenConfig};

use crate::scene::Scene;
use crate::world;

/// A chunk that is currently in the world.
#[derive(Debug)]
pub struct LoadedChunk {
    pub biome: BiomeType,
    /// Every entity spawned for this chunk.
    pub entities: Vec<Entity>,
}

/// What one streaming pass changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamingReport {
    pub loaded: Vec<ChunkCoord>,
    pub unloaded: Vec<ChunkCoord>,
}

impl StreamingReport {
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty() && self.unloaded.is_empty()
    }
}

/// Keeps the square of chunks within `render_distance` of the player loaded.
pub struct ChunkManager {
    chunks: HashMap<ChunkCoord, LoadedChunk>,
    gen: GenConfig,
    render_distance: u32,
    /// Player chunk at the last streaming pass.
    current: Option<ChunkCoord>,
}

impl ChunkManager {
    pub fn new(gen: GenConfig, render_distance: u32) -> Self {
        Self {
            chunks: HashMap::new(),
            gen,
            render_distance,
            current: None,
        }
    }

    /// Chunk containing a world position.
    pub fn world_to_chunk(&self, position: Vec3) -> ChunkCoord {
        ChunkCoord::from_world(position, self.gen.chunk_size)
    }

    pub fn gen_config(&self) -> &GenConfig {
        &self.gen
    }

    pub fn render_distance(&self) -> u32 {
        self.render_distance
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&LoadedChunk> {
        self.chunks.get(&coord)
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn loaded_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// Load missing chunks around `position` and unload those out of range.
    /// `include_health` lets newly generated road chunks carry a health pickup.
    pub fn update_streaming(
        &mut self,
        position: Vec3,
        include_health: bool,
        registry: &mut World,
        scene: &mut impl Scene,
    ) -> StreamingReport {
        let center = self.world_to_chunk(position);
        if self.current == Some(center) && !self.chunks.is_empty() {
            return StreamingReport::default();
        }
        self.current = Some(center);

        let mut report = StreamingReport::default();

        let r = self.render_distance;
        let stale: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|coord| coord.chebyshev_distance(center) > r)
            .copied()
            .collect();
        for coord in stale {
            if let Some(chunk) = self.chunks.remove(&coord) {
                for entity in chunk.entities {
                    world::despawn(registry, scene, entity);
                }
                report.unloaded.push(coord);
            }
        }

        for coord in center.square(r) {
            if self.chunks.contains_key(&coord) {
                continue;
            }
            let content = ChunkContent::generate(coord, &self.gen, include_health);
            let entities = world::spawn_chunk(&content, self.gen.chunk_size, registry, scene);
            self.chunks.insert(
                coord,
                LoadedChunk {
                    biome: content.biome,
                    entities,
                },
            );
            report.loaded.push(coord);
        }

        if !report.is_empty() {
            log::debug!(
                "Streaming around ({}, {}): +{} / -{} chunks, {} loaded",
                center.x,
                center.z,
                report.loaded.len(),
                report.unloaded.len(),
                self.chunks.len()
            );
        }
        report
    }

    /// Drop every chunk and its entities.
    pub fn clear(&mut self, registry: &mut World, scene: &mut impl Scene) {
        for (_, chunk) in self.chunks.drain() {
            for entity in chunk.entities {
                world::despawn(registry, scene, entity);
            }
        }
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RecordingScene;
    use crate::world::ChunkOwned;
    use proptest::prelude::*;

    fn manager() -> ChunkManager {
        ChunkManager::new(GenConfig::default(), 3)
    }

    fn expected_square(center: ChunkCoord, r: i32) -> Vec<ChunkCoord> {
        let mut v: Vec<_> = (-r..=r)
            .flat_map(|dx| (-r..=r).map(move |dz| ChunkCoord::new(center.x + dx, center.z + dz)))
            .collect();
        v.sort();
        v
    }

    #[test]
    fn origin_loads_49_chunks() {
        let mut chunks = manager();
        let mut registry = World::new();
        let mut scene = RecordingScene::new();
        let report = chunks.update_streaming(Vec3::ZERO, false, &mut registry, &mut scene);
        assert_eq!(report.loaded.len(), 49);
        assert_eq!(chunks.loaded_count(), 49);
        let mut loaded: Vec<_> = chunks.loaded_coords().collect();
        loaded.sort();
        assert_eq!(loaded, expected_square(ChunkCoord::new(0, 0), 3));
    }

    #[test]
    fn same_chunk_is_a_no_op() {
        let mut chunks = manager();
        let mut registry = World::new();
        let mut scene = RecordingScene::new();
        chunks.update_streaming(Vec3::ZERO, false, &mut registry, &mut scene);
        let added = scene.added;
        let report = chunks.update_streaming(Vec3::new(150.0, 0.0, 150.0), false, &mut registry, &mut scene);
        assert!(report.is_empty());
        assert_eq!(scene.added, added);
    }

    #[test]
    fn moving_one_chunk_swaps_a_row() {
        let mut chunks = manager();
        let mut registry = World::new();
        let mut scene = RecordingScene::new();
        chunks.update_streaming(Vec3::ZERO, false, &mut registry, &mut scene);
        let report = chunks.update_streaming(Vec3::new(0.0, 0.0, 210.0), false, &mut registry, &mut scene);
        assert_eq!(report.loaded.len(), 7);
        assert_eq!(report.unloaded.len(), 7);
        assert!(report.unloaded.iter().all(|c| c.z == -3));
        assert!(report.loaded.iter().all(|c| c.z == 4));
    }

    #[test]
    fn unloading_despawns_owned_entities() {
        let mut chunks = manager();
        let mut registry = World::new();
        let mut scene = RecordingScene::new();
        chunks.update_streaming(Vec3::ZERO, false, &mut registry, &mut scene);
        chunks.update_streaming(Vec3::new(5_000.0, 0.0, 5_000.0), false, &mut registry, &mut scene);
        let far = ChunkCoord::new(0, 0);
        let leftovers = registry
            .query::<&ChunkOwned>()
            .iter()
            .filter(|(_, owner)| owner.0.chebyshev_distance(far) <= 3)
            .count();
        assert_eq!(leftovers, 0);
        assert_eq!(scene.objects.len(), registry.len() as usize);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn loaded_set_is_exactly_the_square(
            path in proptest::collection::vec((-3_000.0f32..3_000.0, -3_000.0f32..3_000.0), 1..4)
        ) {
            let mut chunks = ChunkManager::new(GenConfig::default(), 2);
            let mut registry = World::new();
            let mut scene = RecordingScene::new();
            for (x, z) in &path {
                chunks.update_streaming(Vec3::new(*x, 0.0, *z), false, &mut registry, &mut scene);
            }
            let (x, z) = path[path.len() - 1];
            let center = chunks.world_to_chunk(Vec3::new(x, 0.0, z));
            let mut loaded: Vec<_> = chunks.loaded_coords().collect();
            loaded.sort();
            prop_assert_eq!(loaded, expected_square(center, 2));
        }
    }
}
