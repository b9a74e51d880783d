//! Session state: phase machine, the world state bundle, deferred removals
//! and the gameplay events systems report back to the session.

use std::time::Duration;

use engine_core::{Entity, Vec3, World};
use procgen::RewardKind;

use crate::chunks::ChunkManager;
use crate::config::GameConfig;
use crate::player::PlayerVehicle;
use crate::scene::Scene;
use crate::spawner::HazardSpawner;
use crate::world;

// ── Phases ─────────────────────────────────────────────────────────────────

/// Session lifecycle. `GameOver` is terminal; only a restart leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Running,
    GameOver,
}

// ── Deferred removal ───────────────────────────────────────────────────────

/// Entities scheduled to leave the world at a later session time. Drained
/// once per tick.
#[derive(Debug, Default)]
pub struct PendingRemovals {
    entries: Vec<(Duration, Entity)>,
}

impl PendingRemovals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, entity: Entity, due: Duration) {
        self.entries.push((due, entity));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take every entry due at or before `now`.
    pub fn take_due(&mut self, now: Duration) -> Vec<Entity> {
        let mut due = Vec::new();
        self.entries.retain(|&(at, entity)| {
            if at <= now {
                due.push(entity);
                false
            } else {
                true
            }
        });
        due
    }

    /// Despawn every due entity. Entities already gone (chunk unloaded
    /// first) are skipped. Returns how many were actually removed.
    pub fn drain(&mut self, now: Duration, registry: &mut World, scene: &mut impl Scene) -> usize {
        self.take_due(now)
            .into_iter()
            .filter(|&entity| world::despawn(registry, scene, entity))
            .count()
    }
}

// ── Events ─────────────────────────────────────────────────────────────────

/// Something the collision engine wants the session to present.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The car hit something; drives the impact sound.
    Impact { force: f32 },
    /// Health went down.
    Damaged { amount: f32, health: f32 },
    /// Health reached zero.
    Destroyed,
    /// A tree was knocked down.
    DecorSmashed { entity: Entity, position: Vec3 },
    /// A rolling rock was struck.
    RockStruck { position: Vec3, size: f32 },
    RewardCollected { entity: Entity, kind: RewardKind, position: Vec3 },
}

// ── World state ────────────────────────────────────────────────────────────

/// Everything the simulation mutates, owned by the session.
pub struct WorldState {
    pub registry: World,
    pub player: PlayerVehicle,
    /// The player's car entity (scene object id).
    pub car: Entity,
    pub chunks: ChunkManager,
    pub spawner: HazardSpawner,
    pub pending: PendingRemovals,
}

impl WorldState {
    pub fn new(config: &GameConfig, scene: &mut impl Scene) -> Self {
        let mut registry = World::new();
        let player = PlayerVehicle::new(config.max_health);
        let car = world::spawn_car(&mut registry, scene, player.transform);
        Self {
            registry,
            player,
            car,
            chunks: ChunkManager::new(config.gen_config(), config.render_distance),
            spawner: HazardSpawner::new(config),
            pending: PendingRemovals::new(),
        }
    }

    /// Remove every entity from the scene (before a rebuild).
    pub fn teardown(&mut self, scene: &mut impl Scene) {
        self.chunks.clear(&mut self.registry, scene);
        let remaining: Vec<Entity> = self.registry.iter().map(|e| e.entity()).collect();
        for entity in remaining {
            world::despawn(&mut self.registry, scene, entity);
        }
        self.pending = PendingRemovals::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RecordingScene;
    use engine_core::Transform;

    #[test]
    fn pending_removal_waits_for_due_time() {
        let mut registry = World::new();
        let mut scene = RecordingScene::new();
        let e = world::spawn_car(&mut registry, &mut scene, Transform::default());
        let mut pending = PendingRemovals::new();
        pending.schedule(e, Duration::from_millis(1000));

        assert_eq!(pending.drain(Duration::from_millis(999), &mut registry, &mut scene), 0);
        assert!(registry.contains(e));
        assert_eq!(pending.drain(Duration::from_millis(1000), &mut registry, &mut scene), 1);
        assert!(!registry.contains(e));
        assert!(pending.is_empty());
    }

    #[test]
    fn draining_an_already_removed_entity_is_a_no_op() {
        let mut registry = World::new();
        let mut scene = RecordingScene::new();
        let e = world::spawn_car(&mut registry, &mut scene, Transform::default());
        let mut pending = PendingRemovals::new();
        pending.schedule(e, Duration::ZERO);
        pending.schedule(e, Duration::ZERO);
        world::despawn(&mut registry, &mut scene, e);
        assert_eq!(pending.drain(Duration::from_secs(1), &mut registry, &mut scene), 0);
        assert_eq!(scene.removed, 1);
    }

    #[test]
    fn teardown_empties_scene() {
        let mut scene = RecordingScene::new();
        let config = GameConfig {
            render_distance: 1,
            ..GameConfig::default()
        };
        let mut state = WorldState::new(&config, &mut scene);
        state
            .chunks
            .update_streaming(Vec3::ZERO, false, &mut state.registry, &mut scene);
        assert!(!scene.objects.is_empty());
        state.teardown(&mut scene);
        assert!(scene.objects.is_empty());
        assert_eq!(state.registry.len(), 0);
    }
}
