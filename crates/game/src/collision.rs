//! Car-versus-world collision checks and their gameplay reactions.

use std::time::Duration;

use engine_core::{Entity, Transform, Vec3, World};
use physics::{aabb_center, lateral_component, overlaps, tighten, Aabb, Bounds, ContactModel, PLAYER_BOUNDS_TIGHTENING};
use procgen::RewardKind;

use crate::player::PlayerVehicle;
use crate::scene::Scene;
use crate::state::{GameEvent, PendingRemovals};
use crate::world::{Collidable, CAR_HALF_EXTENTS};

/// Objects farther than this from the car are not box-tested.
pub const DETECTION_RADIUS: f32 = 20.0;
/// Any single hit takes at most this much health.
pub const MAX_DAMAGE_PER_HIT: f32 = 50.0;
/// Health restored by a health pickup.
pub const HEALTH_PICKUP_AMOUNT: f32 = 25.0;
/// Share of a rock's damage rating dealt on contact.
pub const ROCK_DAMAGE_FACTOR: f32 = 0.7;
/// Car keeps this share of its speed after hitting a rock.
pub const ROCK_SPEED_RETENTION: f32 = 0.7;
/// Heading change per unit of lateral impulse.
pub const ROCK_SPIN_FACTOR: f32 = 0.02;

/// Detects contacts and applies damage, impulses and pickups.
pub struct CollisionEngine {
    pub contact: ContactModel,
    damage_cooldown: Duration,
    reward_removal_delay: Duration,
    last_damage: Option<Duration>,
}

/// Snapshot of one candidate taken before reacting, so the registry can be
/// mutated while handling hits.
struct Candidate {
    entity: Entity,
    position: Vec3,
    aabb: Aabb,
    collidable: Collidable,
}

impl CollisionEngine {
    pub fn new(damage_cooldown: Duration, reward_removal_delay: Duration) -> Self {
        Self {
            contact: ContactModel::default(),
            damage_cooldown,
            reward_removal_delay,
            last_damage: None,
        }
    }

    /// Raw world box of the car.
    pub fn car_box(player: &PlayerVehicle, car: Entity, scene: &impl Scene) -> Aabb {
        scene.world_bounds(car).unwrap_or_else(|| {
            Bounds::new(CAR_HALF_EXTENTS).world_aabb_yawed(player.position(), player.heading)
        })
    }

    /// Subtract `amount * 0.5` (capped) from health unless the cooldown is
    /// still running. Returns the damage dealt.
    pub fn apply_damage(&mut self, now: Duration, amount: f32, player: &mut PlayerVehicle) -> Option<f32> {
        if let Some(last) = self.last_damage {
            if now.saturating_sub(last) <= self.damage_cooldown {
                return None;
            }
        }
        if !amount.is_finite() || player.health.is_dead() {
            return None;
        }
        self.last_damage = Some(now);
        let damage = (amount * 0.5).clamp(0.0, MAX_DAMAGE_PER_HIT);
        player.health.take_damage(damage);
        log::info!("Car took {:.1} damage, health {:.1}", damage, player.health.current());
        Some(damage)
    }

    fn damage_events(&mut self, now: Duration, amount: f32, player: &mut PlayerVehicle, events: &mut Vec<GameEvent>) {
        if let Some(dealt) = self.apply_damage(now, amount, player) {
            events.push(GameEvent::Damaged {
                amount: dealt,
                health: player.health.current(),
            });
            if player.health.is_dead() {
                log::info!("Car destroyed");
                events.push(GameEvent::Destroyed);
            }
        }
    }

    /// Test the car against live obstacles near it and react to each hit.
    pub fn check_collisions(
        &mut self,
        now: Duration,
        registry: &mut World,
        player: &mut PlayerVehicle,
        car: Entity,
        scene: &impl Scene,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if player.health.is_dead() {
            return events;
        }

        let car_box = tighten(&Self::car_box(player, car, scene), PLAYER_BOUNDS_TIGHTENING);
        let car_center = aabb_center(&car_box);
        let car_position = player.position();

        let candidates: Vec<Candidate> = registry
            .query::<(&Transform, &Bounds, &Collidable)>()
            .iter()
            .filter(|(_, (_, _, c))| c.is_live() && !matches!(c, Collidable::Reward(_)))
            .filter(|(_, (t, _, _))| t.position.distance(car_position) <= DETECTION_RADIUS)
            .map(|(entity, (t, bounds, c))| Candidate {
                entity,
                position: t.position,
                aabb: scene.world_bounds(entity).unwrap_or_else(|| bounds.world_aabb(t.position)),
                collidable: *c,
            })
            .filter(|c| overlaps(&car_box, &c.aabb))
            .collect();

        for hit in candidates {
            if player.health.is_dead() {
                break;
            }
            let contact = self
                .contact
                .contact(car_center, aabb_center(&hit.aabb), player.speed, player.heading);

            match hit.collidable {
                Collidable::Hazard(rock) => {
                    events.push(GameEvent::RockStruck {
                        position: hit.position,
                        size: rock.size,
                    });
                    self.damage_events(now, rock.damage * ROCK_DAMAGE_FACTOR, player, &mut events);

                    let impulse = self.contact.impulse_magnitude(contact.relative_speed, rock.mass);
                    player.speed *= ROCK_SPEED_RETENTION;
                    player.heading += lateral_component(contact.normal * impulse, player.heading) * ROCK_SPIN_FACTOR;

                    if let Ok(mut c) = registry.get::<&mut Collidable>(hit.entity) {
                        if let Collidable::Hazard(rock) = &mut *c {
                            // Knock the rock away from the car.
                            rock.direction = (hit.position.z - car_position.z).atan2(hit.position.x - car_position.x);
                            rock.speed += impulse * 0.5;
                        }
                    }
                    events.push(GameEvent::Impact { force: contact.impact_force });
                }
                Collidable::Decor(decor) if decor.is_destructible() => {
                    if let Ok(mut c) = registry.get::<&mut Collidable>(hit.entity) {
                        if let Collidable::Decor(d) = &mut *c {
                            if d.destroyed {
                                continue;
                            }
                            d.destroyed = true;
                        }
                    }
                    log::debug!("Smashed {:?} at {:?}", decor.kind, hit.position);
                    events.push(GameEvent::DecorSmashed {
                        entity: hit.entity,
                        position: hit.position,
                    });
                    events.push(GameEvent::Impact { force: contact.impact_force });
                    self.damage_events(now, contact.impact_force, player, &mut events);
                }
                // Boulders and cacti are scenery.
                Collidable::Decor(_) => {}
                Collidable::Reward(_) => {}
            }
        }
        events
    }

    /// Test the car's raw box against uncollected rewards; collect hits and
    /// schedule their removal.
    pub fn check_reward_collection(
        &mut self,
        now: Duration,
        registry: &mut World,
        player: &mut PlayerVehicle,
        car: Entity,
        pending: &mut PendingRemovals,
        scene: &impl Scene,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if player.health.is_dead() {
            return events;
        }
        let car_box = Self::car_box(player, car, scene);

        for (entity, (transform, bounds, collidable)) in
            registry.query_mut::<(&Transform, &Bounds, &mut Collidable)>()
        {
            let Collidable::Reward(reward) = collidable else {
                continue;
            };
            if reward.collected {
                continue;
            }
            let aabb = scene
                .world_bounds(entity)
                .unwrap_or_else(|| bounds.world_aabb(transform.position));
            if !overlaps(&car_box, &aabb) {
                continue;
            }

            reward.collected = true;
            match reward.kind {
                RewardKind::Health => player.health.heal(HEALTH_PICKUP_AMOUNT),
                RewardKind::Points(_) => player.score += 1,
            }
            pending.schedule(entity, now + self.reward_removal_delay);
            events.push(GameEvent::RewardCollected {
                entity,
                kind: reward.kind,
                position: transform.position,
            });
        }
        events
    }
}
