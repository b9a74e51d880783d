//! Collectible rewards placed along the road.

use glam::Vec3;
use rand::Rng;

use crate::random::chunk_rng;
use crate::terrain::{ChunkCoord, GenConfig};

/// Probability that a road chunk carries any rewards.
pub const REWARD_CHUNK_CHANCE: f64 = 0.7;
/// Probability of one health pickup in a rewarded chunk.
pub const HEALTH_PICKUP_CHANCE: f64 = 0.15;
/// Balloons per rewarded chunk: `MIN_BALLOONS` plus up to `BALLOON_SPREAD - 1` more.
pub const MIN_BALLOONS: u32 = 5;
pub const BALLOON_SPREAD: u32 = 10;
/// Lateral spread across the road, as a fraction of road width.
pub const ROAD_SPREAD: f32 = 0.7;
/// Height rewards float at.
pub const REWARD_HEIGHT: f32 = 1.5;

const SALT_REWARDS: u64 = 0x7265_7761;
const SALT_HEALTH: u64 = 0x6865_616c;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalloonColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl BalloonColor {
    pub const ALL: [BalloonColor; 6] = [
        BalloonColor::Red,
        BalloonColor::Blue,
        BalloonColor::Green,
        BalloonColor::Yellow,
        BalloonColor::Purple,
        BalloonColor::Orange,
    ];

    /// Display colour (linear RGB).
    pub fn rgb(self) -> Vec3 {
        match self {
            BalloonColor::Red => Vec3::new(1.0, 0.2, 0.2),
            BalloonColor::Blue => Vec3::new(0.2, 0.4, 1.0),
            BalloonColor::Green => Vec3::new(0.2, 0.9, 0.3),
            BalloonColor::Yellow => Vec3::new(1.0, 0.9, 0.2),
            BalloonColor::Purple => Vec3::new(0.6, 0.2, 0.9),
            BalloonColor::Orange => Vec3::new(1.0, 0.55, 0.1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewardKind {
    /// Restores health.
    Health,
    /// One point, drawn as a balloon.
    Points(BalloonColor),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardPlacement {
    pub kind: RewardKind,
    pub position: Vec3,
}

/// Rewards for a chunk. Only road chunks (`x == 0`) get any; the health
/// pickup is only considered when `include_health` is set.
pub fn place_rewards(coord: ChunkCoord, config: &GenConfig, include_health: bool) -> Vec<RewardPlacement> {
    if !coord.has_road() {
        return Vec::new();
    }
    // The health pickup has its own stream; balloons never depend on
    // `include_health`.
    let mut rng = chunk_rng(coord.x, coord.z, SALT_REWARDS);
    if !rng.gen_bool(REWARD_CHUNK_CHANCE) {
        return Vec::new();
    }

    let origin = coord.origin(config.chunk_size);
    let on_road = |along: f32, across: f32| {
        Vec3::new(
            origin.x + (across - 0.5) * config.road_width * ROAD_SPREAD,
            REWARD_HEIGHT,
            origin.z + along * config.chunk_size - config.chunk_size / 2.0,
        )
    };

    let mut rewards = Vec::new();
    if include_health {
        let mut health = chunk_rng(coord.x, coord.z, SALT_HEALTH);
        if health.gen_bool(HEALTH_PICKUP_CHANCE) {
            rewards.push(RewardPlacement {
                kind: RewardKind::Health,
                position: on_road(health.gen(), health.gen()),
            });
        }
    }

    let balloons = MIN_BALLOONS + rng.gen_range(0..BALLOON_SPREAD);
    for _ in 0..balloons {
        let position = on_road(rng.gen(), rng.gen());
        let color = BalloonColor::ALL[rng.gen_range(0..BalloonColor::ALL.len())];
        rewards.push(RewardPlacement {
            kind: RewardKind::Points(color),
            position,
        });
    }
    rewards
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_road_chunks_have_no_rewards() {
        let cfg = GenConfig::default();
        for cx in [-2, -1, 1, 2] {
            for cz in -10..10 {
                assert!(place_rewards(ChunkCoord::new(cx, cz), &cfg, true).is_empty());
            }
        }
    }

    #[test]
    fn rewards_sit_on_the_road() {
        let cfg = GenConfig::default();
        let half_spread = cfg.road_width * ROAD_SPREAD / 2.0;
        let mut seen_any = false;
        for cz in -20..20 {
            let coord = ChunkCoord::new(0, cz);
            let origin = coord.origin(cfg.chunk_size);
            let rewards = place_rewards(coord, &cfg, true);
            let balloons = rewards
                .iter()
                .filter(|r| matches!(r.kind, RewardKind::Points(_)))
                .count() as u32;
            if !rewards.is_empty() {
                seen_any = true;
                assert!((MIN_BALLOONS..MIN_BALLOONS + BALLOON_SPREAD).contains(&balloons));
            }
            for r in rewards {
                assert!((r.position.x - origin.x).abs() <= half_spread);
                assert!((r.position.z - origin.z).abs() <= cfg.chunk_size / 2.0);
                assert_eq!(r.position.y, REWARD_HEIGHT);
            }
        }
        assert!(seen_any);
    }

    #[test]
    fn health_pickups_need_missing_health() {
        let cfg = GenConfig::default();
        for cz in -50..50 {
            let rewards = place_rewards(ChunkCoord::new(0, cz), &cfg, false);
            assert!(rewards.iter().all(|r| r.kind != RewardKind::Health));
        }
    }

    #[test]
    fn some_chunks_offer_health_when_needed() {
        let cfg = GenConfig::default();
        let offered = (-200..200)
            .filter(|&cz| {
                place_rewards(ChunkCoord::new(0, cz), &cfg, true)
                    .iter()
                    .any(|r| r.kind == RewardKind::Health)
            })
            .count();
        assert!(offered > 0);
    }

    #[test]
    fn balloons_are_identical_with_or_without_health() {
        let cfg = GenConfig::default();
        for cz in -20..20 {
            let coord = ChunkCoord::new(0, cz);
            let with: Vec<_> = place_rewards(coord, &cfg, true)
                .into_iter()
                .filter(|r| r.kind != RewardKind::Health)
                .collect();
            assert_eq!(with, place_rewards(coord, &cfg, false));
        }
    }
}
