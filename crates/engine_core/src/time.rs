//! Time management for the game loop.
//!
//! Every gameplay timestamp (spawn timers, damage cooldowns, deferred
//! removals) is read from [`Time::now`], which is sampled once per frame.
//! The clock can follow the wall clock ([`Time::update`]) or be stepped by
//! hand ([`Time::advance`]) for headless runs and tests.

use std::time::{Duration, Instant};

/// Largest delta handed to gameplay in one frame. Longer stalls (window
/// dragged, debugger break) are clamped so objects don't teleport.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Manages frame timing and delta time calculation.
#[derive(Debug)]
pub struct Time {
    /// Wall-clock instant of the last `update`.
    last_frame: Instant,
    /// Unclamped duration of the last frame (used for FPS).
    raw_delta: Duration,
    /// Duration of the last frame, clamped to `max_delta`.
    delta: Duration,
    /// Session time: sum of clamped deltas since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    max_delta: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new clock at session time zero.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            raw_delta: Duration::ZERO,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            max_delta: MAX_FRAME_DELTA,
        }
    }

    /// Sample the wall clock at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        let raw = now - self.last_frame;
        self.last_frame = now;
        self.step(raw);
    }

    /// Advance the clock by a fixed amount instead of reading the wall clock.
    pub fn advance(&mut self, dt: Duration) {
        self.last_frame = Instant::now();
        self.step(dt);
    }

    fn step(&mut self, raw: Duration) {
        self.raw_delta = raw;
        self.delta = raw.min(self.max_delta);
        self.elapsed += self.delta;
        self.frame_count += 1;
    }

    /// Get the (clamped) delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get the (clamped) delta time as a Duration.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Session timestamp for this frame.
    pub fn now(&self) -> Duration {
        self.elapsed
    }

    /// Get total elapsed session time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Instantaneous FPS from the unclamped frame delta.
    pub fn fps(&self) -> f32 {
        let secs = self.raw_delta.as_secs_f32();
        if secs > 0.0 {
            1.0 / secs
        } else {
            0.0
        }
    }

    /// Override the per-frame delta clamp.
    pub fn set_max_delta(&mut self, max_delta: Duration) {
        self.max_delta = max_delta;
    }
}
