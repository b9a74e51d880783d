//! Game configuration (world layout, hazard pacing). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use procgen::GenConfig;

/// Errors from reading or checking a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("chunk_size must be positive, got {0}")]
    NonPositiveChunkSize(f32),

    #[error("road_width must be positive and narrower than a chunk, got {0}")]
    BadRoadWidth(f32),

    #[error("rock spawn floor ({floor_ms} ms) is above the initial interval ({interval_ms} ms)")]
    SpawnFloorAboveInterval { floor_ms: u64, interval_ms: u64 },

    #[error("max_health must be positive, got {0}")]
    NonPositiveMaxHealth(f32),
}

/// Tunable game settings. Every field falls back to its default when
/// missing from `config.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Edge length of a terrain chunk in world units.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: f32,
    /// Chunks kept loaded on each side of the player's chunk.
    #[serde(default = "default_render_distance")]
    pub render_distance: u32,
    /// Road width; the road runs along the `x == 0` chunk column.
    #[serde(default = "default_road_width")]
    pub road_width: f32,
    /// Minimum gap between two damage applications.
    #[serde(default = "default_damage_cooldown_ms")]
    pub damage_cooldown_ms: u64,
    /// Initial gap between rock spawns.
    #[serde(default = "default_rock_spawn_interval_ms")]
    pub rock_spawn_interval_ms: u64,
    /// How much the spawn gap shrinks after each rock.
    #[serde(default = "default_rock_spawn_step_ms")]
    pub rock_spawn_step_ms: u64,
    /// The spawn gap never drops below this.
    #[serde(default = "default_rock_spawn_floor_ms")]
    pub rock_spawn_floor_ms: u64,
    /// Delay between collecting a reward and removing it from the world.
    #[serde(default = "default_reward_removal_ms")]
    pub reward_removal_ms: u64,
    #[serde(default = "default_max_health")]
    pub max_health: f32,
    /// Fixed seed for hazard randomness (replays). Random when absent.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_chunk_size() -> f32 {
    200.0
}
fn default_render_distance() -> u32 {
    3
}
fn default_road_width() -> f32 {
    80.0
}
fn default_damage_cooldown_ms() -> u64 {
    500
}
fn default_rock_spawn_interval_ms() -> u64 {
    3000
}
fn default_rock_spawn_step_ms() -> u64 {
    100
}
fn default_rock_spawn_floor_ms() -> u64 {
    2000
}
fn default_reward_removal_ms() -> u64 {
    1000
}
fn default_max_health() -> f32 {
    100.0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            render_distance: default_render_distance(),
            road_width: default_road_width(),
            damage_cooldown_ms: default_damage_cooldown_ms(),
            rock_spawn_interval_ms: default_rock_spawn_interval_ms(),
            rock_spawn_step_ms: default_rock_spawn_step_ms(),
            rock_spawn_floor_ms: default_rock_spawn_floor_ms(),
            reward_removal_ms: default_reward_removal_ms(),
            max_health: default_max_health(),
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Strict load from an explicit path: read, parse and validate.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_ron(&data)
    }

    pub fn from_ron(data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the world can't be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.chunk_size) {
            return Err(ConfigError::NonPositiveChunkSize(self.chunk_size));
        }
        if !positive(self.road_width) || self.road_width >= self.chunk_size {
            return Err(ConfigError::BadRoadWidth(self.road_width));
        }
        if self.rock_spawn_floor_ms > self.rock_spawn_interval_ms {
            return Err(ConfigError::SpawnFloorAboveInterval {
                floor_ms: self.rock_spawn_floor_ms,
                interval_ms: self.rock_spawn_interval_ms,
            });
        }
        if !positive(self.max_health) {
            return Err(ConfigError::NonPositiveMaxHealth(self.max_health));
        }
        Ok(())
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }

    pub fn gen_config(&self) -> GenConfig {
        GenConfig {
            chunk_size: self.chunk_size,
            road_width: self.road_width,
        }
    }

    pub fn damage_cooldown(&self) -> Duration {
        Duration::from_millis(self.damage_cooldown_ms)
    }

    pub fn reward_removal_delay(&self) -> Duration {
        Duration::from_millis(self.reward_removal_ms)
    }

    /// Rocks farther than this from the player are dropped.
    pub fn rock_despawn_distance(&self) -> f32 {
        self.chunk_size * 1.5
    }
}

/// Finite and above zero.
fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = GameConfig::from_ron("()").expect("empty struct parses");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_file_overrides_named_fields() {
        let config = GameConfig::from_ron("(render_distance: 1, rng_seed: Some(7))").expect("parses");
        assert_eq!(config.render_distance, 1);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.chunk_size, 200.0);
    }

    #[test]
    fn floor_above_interval_is_rejected() {
        let config = GameConfig {
            rock_spawn_floor_ms: 5000,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnFloorAboveInterval { floor_ms: 5000, .. })
        ));
    }

    #[test]
    fn nan_chunk_size_is_rejected() {
        let config = GameConfig {
            chunk_size: f32::NAN,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NonPositiveChunkSize(_))));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(GameConfig::from_ron("(chunk_size: \"big\")"), Err(ConfigError::Parse(_))));
    }
}
