//! HUD (Heads-Up Display) data and the sink that presents it.
//! Speed, health bar, score, FPS, popups and full-screen flashes.

use std::collections::VecDeque;

use glam::Vec3;

/// All HUD data for a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudData {
    /// Absolute speed.
    pub speed: f32,
    /// Health as a percentage (0–100).
    pub health_percent: f32,
    pub score: u32,
    pub fps: f32,
}

impl HudData {
    pub fn health_band(&self) -> HealthBand {
        HealthBand::from_percent(self.health_percent)
    }
}

/// Colour band for the health bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthBand {
    Good,
    Warning,
    Critical,
}

impl HealthBand {
    pub fn from_percent(percent: f32) -> Self {
        if percent > 60.0 {
            HealthBand::Good
        } else if percent > 30.0 {
            HealthBand::Warning
        } else {
            HealthBand::Critical
        }
    }

    pub fn color(&self) -> [f32; 4] {
        match self {
            HealthBand::Good => [0.0, 1.0, 0.0, 1.0],     // green
            HealthBand::Warning => [1.0, 1.0, 0.0, 1.0],  // yellow
            HealthBand::Critical => [1.0, 0.0, 0.0, 1.0], // red
        }
    }
}

/// Full-screen tint flashed on gameplay events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Damage,
    Health,
    Points,
}

/// UI collaborator. Receives values; owns all presentation.
pub trait HudSink {
    fn update(&mut self, data: &HudData);
    fn popup(&mut self, text: &str, color: Vec3);
    fn flash(&mut self, kind: FlashKind);
    fn show_game_over(&mut self, score: u32);
    fn hide_game_over(&mut self);
}

/// Moving-average FPS over the last few frames.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(20)
    }
}

impl FpsCounter {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record a frame duration in seconds. Zero or invalid durations are skipped.
    pub fn record(&mut self, frame_seconds: f32) {
        if !(frame_seconds.is_finite() && frame_seconds > 0.0) {
            return;
        }
        self.record_fps(1.0 / frame_seconds);
    }

    /// Record an instantaneous FPS reading.
    pub fn record_fps(&mut self, fps: f32) {
        if !(fps.is_finite() && fps > 0.0) {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(fps);
    }

    pub fn average(&self) -> f32 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.samples.iter().sum::<f32>() / self.samples.len() as f32
        }
    }
}

/// One recorded HUD call.
#[derive(Debug, Clone, PartialEq)]
pub enum HudCall {
    Popup(String),
    Flash(FlashKind),
    GameOver(u32),
    HideGameOver,
}

/// HUD that remembers what it was told (headless runs, tests).
#[derive(Debug, Default)]
pub struct RecordingHud {
    pub last: Option<HudData>,
    pub calls: Vec<HudCall>,
}

impl RecordingHud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, call: &HudCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn game_over_shown(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, HudCall::GameOver(_))).count()
    }
}

impl HudSink for RecordingHud {
    fn update(&mut self, data: &HudData) {
        self.last = Some(*data);
    }

    fn popup(&mut self, text: &str, _color: Vec3) {
        self.calls.push(HudCall::Popup(text.to_string()));
    }

    fn flash(&mut self, kind: FlashKind) {
        self.calls.push(HudCall::Flash(kind));
    }

    fn show_game_over(&mut self, score: u32) {
        self.calls.push(HudCall::GameOver(score));
    }

    fn hide_game_over(&mut self) {
        self.calls.push(HudCall::HideGameOver);
    }
}

/// HUD that writes to the log, throttled to one status line per `every` updates.
#[derive(Debug)]
pub struct LogHud {
    every: u64,
    updates: u64,
}

impl LogHud {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            updates: 0,
        }
    }
}

impl HudSink for LogHud {
    fn update(&mut self, data: &HudData) {
        self.updates += 1;
        if self.updates % self.every == 0 {
            log::info!(
                "speed {:>3.0} | health {:>3.0}% ({:?}) | score {} | {:.0} fps",
                data.speed,
                data.health_percent,
                data.health_band(),
                data.score,
                data.fps
            );
        }
    }

    fn popup(&mut self, text: &str, _color: Vec3) {
        log::info!("{}", text);
    }

    fn flash(&mut self, kind: FlashKind) {
        log::debug!("flash {:?}", kind);
    }

    fn show_game_over(&mut self, score: u32) {
        log::info!("GAME OVER - score {}", score);
    }

    fn hide_game_over(&mut self) {}
}
