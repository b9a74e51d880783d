//! Short-lived visual effects (debris, dust, balloon shreds) and the idle
//! animation of rewards.

use engine_core::{Lifetime, Quat, Transform, Vec3, World};
use procgen::BalloonColor;

use crate::scene::{ObjectKind, Scene};
use crate::world::{self, Collidable};

const GRAVITY: Vec3 = Vec3::new(0.0, -9.0, 0.0);

/// One particle of an effect.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub velocity: Vec3,
    /// Radians per second about a random-ish axis.
    pub spin: f32,
    /// Whether gravity pulls this particle down.
    pub falls: bool,
}

fn random_spread(horizontal: f32, up: f32) -> Vec3 {
    Vec3::new(
        (rand::random::<f32>() - 0.5) * horizontal,
        rand::random::<f32>() * up,
        (rand::random::<f32>() - 0.5) * horizontal,
    )
}

fn spawn_particle(
    registry: &mut World,
    scene: &mut impl Scene,
    kind: ObjectKind,
    position: Vec3,
    scale: f32,
    particle: Particle,
    seconds: f32,
) {
    let transform = Transform::from_position(position).with_uniform_scale(scale);
    let entity = registry.spawn((transform, particle, Lifetime::new(seconds)));
    scene.add_object(entity, &kind, &transform);
}

/// Grey chips thrown up where a rock was struck.
pub fn spawn_rock_dust(registry: &mut World, scene: &mut impl Scene, position: Vec3, size: f32) {
    let count = ((10.0 * size) as usize).min(10);
    for _ in 0..count {
        let offset = random_spread(size, size) - Vec3::new(0.0, size * 0.5, 0.0);
        let particle = Particle {
            velocity: random_spread(2.0, 3.0),
            spin: 0.0,
            falls: true,
        };
        spawn_particle(registry, scene, ObjectKind::RockDust, position + offset, size * 0.2, particle, 1.0);
    }
}

/// Splinters flying off a smashed tree.
pub fn spawn_splinters(registry: &mut World, scene: &mut impl Scene, position: Vec3) {
    for _ in 0..8 {
        let particle = Particle {
            velocity: random_spread(8.0, 6.0),
            spin: rand::random::<f32>() * 6.0,
            falls: true,
        };
        let start = position + Vec3::new(0.0, 2.0 + rand::random::<f32>() * 4.0, 0.0);
        spawn_particle(registry, scene, ObjectKind::Splinter, start, 0.5, particle, 1.5);
    }
}

/// Burst of coloured shreds when a balloon is collected.
pub fn spawn_balloon_burst(registry: &mut World, scene: &mut impl Scene, position: Vec3, color: BalloonColor) {
    for _ in 0..15 {
        let particle = Particle {
            velocity: random_spread(6.0, 4.0),
            spin: rand::random::<f32>() * 8.0,
            falls: false,
        };
        let scale = 0.1 + rand::random::<f32>() * 0.2;
        spawn_particle(registry, scene, ObjectKind::BalloonShred(color), position, scale, particle, 0.5);
    }
}

/// Rising sparkles for a health pickup.
pub fn spawn_sparkles(registry: &mut World, scene: &mut impl Scene, position: Vec3) {
    for _ in 0..10 {
        let particle = Particle {
            velocity: Vec3::new(0.0, 2.0 + rand::random::<f32>() * 2.0, 0.0) + random_spread(1.0, 0.0),
            spin: 0.0,
            falls: false,
        };
        spawn_particle(registry, scene, ObjectKind::Sparkle, position, 0.2, particle, 0.8);
    }
}

/// Move particles and remove expired ones. Returns how many expired.
pub fn update_effects(registry: &mut World, scene: &mut impl Scene, dt: f32) -> usize {
    let mut expired = Vec::new();
    for (entity, (transform, particle, lifetime)) in
        registry.query_mut::<(&mut Transform, &mut Particle, &mut Lifetime)>()
    {
        if lifetime.update(dt) {
            expired.push(entity);
            continue;
        }
        if particle.falls {
            particle.velocity += GRAVITY * dt;
        }
        transform.position += particle.velocity * dt;
        if particle.spin != 0.0 {
            transform.rotation = Quat::from_rotation_x(particle.spin * dt) * transform.rotation;
        }
        scene.set_transform(entity, transform);
    }
    for &entity in &expired {
        world::despawn(registry, scene, entity);
    }
    expired.len()
}

// ── Reward idle animation ──────────────────────────────────────────────────

/// Rewards animated per tick at most.
pub const MAX_ANIMATED_PER_TICK: usize = 15;
const HOVER_AMPLITUDE: f32 = 0.3;
const SPIN_SPEED: f32 = 0.5;

/// Hover-and-spin for rewards, limited to a sliding window of
/// [`MAX_ANIMATED_PER_TICK`] rewards each tick. Collection does not depend
/// on this; it only moves meshes.
#[derive(Debug, Default)]
pub struct RewardAnimator {
    spin: f32,
}

impl RewardAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many rewards were moved.
    pub fn animate(&mut self, registry: &mut World, scene: &mut impl Scene, time: f32, dt: f32) -> usize {
        self.spin = (self.spin + dt * SPIN_SPEED) % std::f32::consts::TAU;

        let active = registry
            .query::<&Collidable>()
            .iter()
            .filter(|(_, c)| matches!(c, Collidable::Reward(r) if !r.collected))
            .count();
        let start = if active <= MAX_ANIMATED_PER_TICK {
            0
        } else {
            (time * 10.0) as usize % (active - MAX_ANIMATED_PER_TICK)
        };

        let mut index = 0;
        let mut moved = 0;
        for (entity, (transform, collidable)) in registry.query_mut::<(&mut Transform, &Collidable)>() {
            let Collidable::Reward(reward) = collidable else {
                continue;
            };
            if reward.collected {
                // Float up and shrink until the pending removal takes it.
                transform.position.y += dt * 5.0;
                transform.scale = (transform.scale * (1.0 - dt * 3.0)).max(Vec3::ZERO);
                scene.set_transform(entity, transform);
                continue;
            }
            let in_window = index >= start && index < start + MAX_ANIMATED_PER_TICK;
            index += 1;
            if !in_window {
                continue;
            }
            let phase = (reward.anchor.x * 100.0 + reward.anchor.z) * 0.001;
            transform.position.y = reward.anchor.y + (time + phase).sin() * HOVER_AMPLITUDE;
            transform.set_yaw(self.spin + phase);
            scene.set_transform(entity, transform);
            moved += 1;
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RecordingScene;
    use crate::world::Reward;
    use procgen::RewardKind;

    #[test]
    fn effects_expire_after_their_lifetime() {
        let mut registry = World::new();
        let mut scene = RecordingScene::new();
        spawn_balloon_burst(&mut registry, &mut scene, Vec3::ZERO, BalloonColor::Green);
        assert_eq!(scene.objects.len(), 15);
        assert_eq!(update_effects(&mut registry, &mut scene, 0.3), 0);
        assert_eq!(update_effects(&mut registry, &mut scene, 0.3), 15);
        assert!(scene.objects.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn rock_dust_count_is_capped() {
        let mut registry = World::new();
        let mut scene = RecordingScene::new();
        spawn_rock_dust(&mut registry, &mut scene, Vec3::ZERO, 3.0);
        assert_eq!(scene.objects.len(), 10);
    }

    #[test]
    fn animation_is_batched() {
        let mut registry = World::new();
        let mut scene = RecordingScene::new();
        for i in 0..40 {
            let p = Vec3::new(0.0, 1.5, i as f32 * 5.0);
            registry.spawn((
                Transform::from_position(p),
                Collidable::Reward(Reward {
                    kind: RewardKind::Health,
                    collected: false,
                    anchor: p,
                }),
            ));
        }
        let mut animator = RewardAnimator::new();
        assert_eq!(animator.animate(&mut registry, &mut scene, 1.0, 0.016), MAX_ANIMATED_PER_TICK);
    }
}
