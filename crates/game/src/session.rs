//! The game session: owns the world and the collaborators, and moves
//! between phases.

use audio::AudioCues;
use engine_core::Time;

use crate::camera::CameraRig;
use crate::collision::CollisionEngine;
use crate::config::GameConfig;
use crate::effects::RewardAnimator;
use crate::hud::{FpsCounter, HudSink};
use crate::scene::Scene;
use crate::state::{SessionPhase, WorldState};

/// One play-through. Generic over its collaborators so tests and the
/// headless binary can plug in recording or silent implementations.
pub struct Session<S: Scene, A: AudioCues, H: HudSink> {
    pub config: GameConfig,
    pub world: WorldState,
    pub phase: SessionPhase,
    pub time: Time,
    pub collisions: CollisionEngine,
    pub camera: CameraRig,
    pub fps: FpsCounter,
    pub(crate) animator: RewardAnimator,
    pub scene: S,
    pub audio: A,
    pub hud: H,
}

impl<S: Scene, A: AudioCues, H: HudSink> Session<S, A, H> {
    pub fn new(config: GameConfig, mut scene: S, audio: A, hud: H) -> Self {
        let world = WorldState::new(&config, &mut scene);
        Self {
            collisions: CollisionEngine::new(config.damage_cooldown(), config.reward_removal_delay()),
            world,
            phase: SessionPhase::NotStarted,
            time: Time::new(),
            camera: CameraRig::new(),
            fps: FpsCounter::default(),
            animator: RewardAnimator::new(),
            config,
            scene,
            audio,
            hud,
        }
    }

    /// Leave the title screen. Returns false if already started.
    pub fn start(&mut self) -> bool {
        if self.phase != SessionPhase::NotStarted {
            return false;
        }
        log::info!("Session started");
        self.phase = SessionPhase::Running;
        self.time = Time::new();
        self.stream_world();
        self.audio.ambient_start();
        true
    }

    /// Throw the whole world away and begin again, running.
    pub fn restart(&mut self) {
        log::info!("Restarting session");
        self.world.teardown(&mut self.scene);
        self.world = WorldState::new(&self.config, &mut self.scene);
        self.collisions = CollisionEngine::new(self.config.damage_cooldown(), self.config.reward_removal_delay());
        self.camera = CameraRig::new();
        self.fps = FpsCounter::default();
        self.animator = RewardAnimator::new();
        self.hud.hide_game_over();
        self.phase = SessionPhase::NotStarted;
        self.start();
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// Running -> GameOver. Only the first call has any effect.
    pub(crate) fn enter_game_over(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }
        self.phase = SessionPhase::GameOver;
        self.world.player.halt();
        self.audio.ambient_stop();
        self.hud.show_game_over(self.world.player.score);
        log::info!("Game over, score {}", self.world.player.score);
    }

    pub(crate) fn stream_world(&mut self) {
        let include_health = !self.world.player.health.is_full();
        let position = self.world.player.position();
        let world = &mut self.world;
        world
            .chunks
            .update_streaming(position, include_health, &mut world.registry, &mut self.scene);
    }
}
