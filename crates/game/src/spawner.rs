//! Rolling rock hazards.
//!
//! Rocks appear on a ring around the player, aimed at where the player was
//! when they spawned, and roll in a straight line from then on. The gap
//! between spawns shrinks after every rock down to a floor, so pressure
//! only ever goes up during a session.

use std::time::Duration;

use engine_core::{Entity, Quat, Transform, Vec3, World};
use rand::prelude::*;

use crate::config::GameConfig;
use crate::scene::{ObjectKind, Scene};
use crate::world::{self, rock_bounds, Collidable, RollingRock};

/// Rock travel per second per unit of speed.
pub const ROCK_SPEED_SCALE: f32 = 10.0;

/// What one hazard update did.
#[derive(Debug, Default)]
pub struct HazardReport {
    pub spawned: Option<Entity>,
    pub removed: Vec<Entity>,
}

/// Spawns and moves rolling rocks.
pub struct HazardSpawner {
    /// Current gap between spawns (never grows).
    spawn_interval: Duration,
    /// Shrink applied after each spawn.
    spawn_step: Duration,
    /// Lower bound for `spawn_interval`.
    spawn_floor: Duration,
    last_spawn: Option<Duration>,
    /// Minimum distance from player to spawn.
    pub min_spawn_distance: f32,
    /// Maximum distance from player to spawn.
    pub max_spawn_distance: f32,
    /// Rocks farther than this from the player are removed.
    pub despawn_distance: f32,
    spawned_total: u64,
    /// Random number generator.
    rng: StdRng,
}

impl HazardSpawner {
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            spawn_interval: Duration::from_millis(config.rock_spawn_interval_ms),
            spawn_step: Duration::from_millis(config.rock_spawn_step_ms),
            spawn_floor: Duration::from_millis(config.rock_spawn_floor_ms),
            last_spawn: None,
            min_spawn_distance: 150.0,
            max_spawn_distance: 250.0,
            despawn_distance: config.rock_despawn_distance(),
            spawned_total: 0,
            rng,
        }
    }

    pub fn spawn_interval(&self) -> Duration {
        self.spawn_interval
    }

    pub fn spawn_floor(&self) -> Duration {
        self.spawn_floor
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    fn spawn_due(&self, now: Duration) -> bool {
        match self.last_spawn {
            None => true,
            Some(last) => now.saturating_sub(last) > self.spawn_interval,
        }
    }

    /// Spawn a rock if one is due, then move every rock and drop the ones
    /// that rolled out of range.
    pub fn update(
        &mut self,
        now: Duration,
        dt: f32,
        player_position: Vec3,
        registry: &mut World,
        scene: &mut impl Scene,
    ) -> HazardReport {
        let mut report = HazardReport::default();

        if self.spawn_due(now) {
            report.spawned = Some(self.spawn_random(now, player_position, registry, scene));
            self.last_spawn = Some(now);
            self.spawn_interval = self.spawn_interval.saturating_sub(self.spawn_step).max(self.spawn_floor);
        }

        report.removed = advance_rocks(now, dt, player_position, self.despawn_distance, registry, scene);
        report
    }

    fn spawn_random(&mut self, now: Duration, player_position: Vec3, registry: &mut World, scene: &mut impl Scene) -> Entity {
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = self.rng.gen_range(self.min_spawn_distance..self.max_spawn_distance);
        let size = self.rng.gen_range(1.5..3.5);
        let speed = self.rng.gen_range(2.0..7.0);
        let position = Vec3::new(
            player_position.x + angle.cos() * distance,
            0.0,
            player_position.z + angle.sin() * distance,
        );
        self.spawned_total += 1;
        spawn_rock(now, position, size, speed, player_position, registry, scene)
    }
}

/// Spawn one rock at `position`, rolling toward `target`.
pub fn spawn_rock(
    now: Duration,
    position: Vec3,
    size: f32,
    speed: f32,
    target: Vec3,
    registry: &mut World,
    scene: &mut impl Scene,
) -> Entity {
    let rock = RollingRock {
        direction: (target.z - position.z).atan2(target.x - position.x),
        speed,
        mass: size * 2.0,
        size,
        damage: 10.0 + size * 10.0,
        spawned_at: now,
        roll: 0.0,
    };
    let transform = Transform::from_position(Vec3::new(position.x, rock_height(size, 0.0), position.z));
    let entity = registry.spawn((transform, rock_bounds(size), Collidable::Hazard(rock)));
    scene.add_object(entity, &ObjectKind::Rock { size }, &transform);
    log::trace!(
        "Spawned rock {:?} at ({:.0}, {:.0}), size {:.2}, speed {:.2}",
        entity,
        position.x,
        position.z,
        size,
        speed
    );
    entity
}

/// Centre height of a rock of `size` that has been rolling for `age` seconds.
pub fn rock_height(size: f32, age: f32) -> f32 {
    size * 1.2 + (age * 2.0).sin().abs() * 0.5
}

/// Roll every rock along its direction; despawn those beyond `max_distance`
/// (planar) of the player.
fn advance_rocks(
    now: Duration,
    dt: f32,
    player_position: Vec3,
    max_distance: f32,
    registry: &mut World,
    scene: &mut impl Scene,
) -> Vec<Entity> {
    let player = Transform::from_position(player_position);
    let mut out_of_range = Vec::new();

    for (entity, (transform, collidable)) in registry.query_mut::<(&mut Transform, &mut Collidable)>() {
        let Collidable::Hazard(rock) = collidable else {
            continue;
        };
        let step = rock.speed * dt * ROCK_SPEED_SCALE;
        let (sin, cos) = rock.direction.sin_cos();
        transform.position.x += cos * step;
        transform.position.z += sin * step;

        let age = now.saturating_sub(rock.spawned_at).as_secs_f32();
        transform.position.y = rock_height(rock.size, age);

        // Roll about the axis perpendicular to travel.
        let radius = rock.size * world::ROCK_RADIUS_PER_SIZE;
        if radius > 0.0 {
            rock.roll += step / radius;
        }
        let axis = Vec3::new(-sin, 0.0, cos);
        transform.rotation = Quat::from_axis_angle(axis, rock.roll);

        if transform.planar_distance(&player) > max_distance {
            out_of_range.push(entity);
        } else {
            scene.set_transform(entity, transform);
        }
    }

    for &entity in &out_of_range {
        log::trace!("Rock {:?} rolled out of range", entity);
        world::despawn(registry, scene, entity);
    }
    out_of_range
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RecordingScene;

    fn seeded() -> HazardSpawner {
        HazardSpawner::new(&GameConfig {
            rng_seed: Some(99),
            ..GameConfig::default()
        })
    }

    fn rock(registry: &World, entity: Entity) -> RollingRock {
        match *registry.get::<&Collidable>(entity).expect("rock exists") {
            Collidable::Hazard(rock) => rock,
            other => panic!("not a rock: {:?}", other),
        }
    }

    #[test]
    fn first_update_spawns_on_the_ring() {
        let mut spawner = seeded();
        let mut registry = World::new();
        let mut scene = RecordingScene::new();
        let report = spawner.update(Duration::ZERO, 0.0, Vec3::ZERO, &mut registry, &mut scene);
        let entity = report.spawned.expect("first tick spawns");
        let transform = *registry.get::<&Transform>(entity).expect("has transform");
        let d = transform.planar().length();
        assert!((150.0..=250.0).contains(&d), "spawned at {}", d);

        let r = rock(&registry, entity);
        assert!((1.5..=3.5).contains(&r.size));
        assert!((2.0..=7.0).contains(&r.speed));
        assert_eq!(r.mass, r.size * 2.0);
        assert_eq!(r.damage, 10.0 + r.size * 10.0);
    }

    #[test]
    fn rocks_roll_toward_the_spawn_target() {
        let mut registry = World::new();
        let mut scene = RecordingScene::new();
        let e = spawn_rock(Duration::ZERO, Vec3::new(200.0, 0.0, 0.0), 2.0, 5.0, Vec3::ZERO, &mut registry, &mut scene);
        advance_rocks(Duration::from_millis(100), 0.1, Vec3::ZERO, 300.0, &mut registry, &mut scene);
        let t = *registry.get::<&Transform>(e).expect("still alive");
        // 5 * 0.1 * 10 = 5 units toward the origin
        assert!((t.position.x - 195.0).abs() < 1e-3);
        assert!(t.position.z.abs() < 1e-3);
    }

    #[test]
    fn far_rock_is_removed_on_next_update() {
        let mut spawner = seeded();
        let mut registry = World::new();
        let mut scene = RecordingScene::new();
        // Consume the initial spawn so the next update only moves rocks.
        spawner.update(Duration::ZERO, 0.0, Vec3::ZERO, &mut registry, &mut scene);
        let far = spawn_rock(
            Duration::ZERO,
            Vec3::new(400.0, 0.0, 0.0),
            2.0,
            2.0,
            Vec3::new(800.0, 0.0, 0.0),
            &mut registry,
            &mut scene,
        );
        let report = spawner.update(Duration::from_millis(16), 0.016, Vec3::ZERO, &mut registry, &mut scene);
        assert!(report.spawned.is_none());
        assert_eq!(report.removed, vec![far]);
        assert!(!registry.contains(far));
        assert!(!scene.contains(far));
    }

    #[test]
    fn spawn_interval_only_shrinks_to_floor() {
        let mut spawner = seeded();
        let mut registry = World::new();
        let mut scene = RecordingScene::new();
        let mut now = Duration::ZERO;
        let mut previous = spawner.spawn_interval();
        for _ in 0..400 {
            spawner.update(now, 0.05, Vec3::ZERO, &mut registry, &mut scene);
            let current = spawner.spawn_interval();
            assert!(current <= previous);
            assert!(current >= spawner.spawn_floor());
            previous = current;
            now += Duration::from_millis(250);
        }
        assert_eq!(spawner.spawn_interval(), spawner.spawn_floor());
    }

    #[test]
    fn spawns_wait_for_the_interval() {
        let mut spawner = seeded();
        let mut registry = World::new();
        let mut scene = RecordingScene::new();
        assert!(spawner.update(Duration::ZERO, 0.0, Vec3::ZERO, &mut registry, &mut scene).spawned.is_some());
        // Interval is now 2900 ms.
        assert!(spawner.update(Duration::from_millis(2900), 0.0, Vec3::ZERO, &mut registry, &mut scene).spawned.is_none());
        assert!(spawner.update(Duration::from_millis(2901), 0.0, Vec3::ZERO, &mut registry, &mut scene).spawned.is_some());
    }

    #[test]
    fn rock_bobs_above_its_base_height() {
        assert_eq!(rock_height(2.0, 0.0), 2.4);
        let h = rock_height(2.0, 0.7);
        assert!(h > 2.4 && h <= 2.9);
    }
}
