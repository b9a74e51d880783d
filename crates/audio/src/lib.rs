//! Game audio: fire-and-forget cues backed by Kira.
//!
//! Gameplay only talks to [`AudioCues`]. [`AudioSystem`] plays synthesized
//! tones through a Kira manager when a device is available and silently
//! does nothing otherwise; [`SilentAudio`] never touches a device at all.

pub mod synth;

use std::sync::Arc;

use anyhow::Result;
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    sound::PlaybackState,
    tween::Tween,
    Frame,
};

pub use kira;

/// Cues the game fires at defined trigger points. None of them can fail.
pub trait AudioCues {
    /// Something hit the car; `force` is the impact strength.
    fn collision_impact(&mut self, force: f32);
    fn tire_screech(&mut self);
    fn item_collect(&mut self);
    fn ambient_start(&mut self);
    fn ambient_stop(&mut self);
    /// Flip mute; returns the new muted state.
    fn toggle_mute(&mut self) -> bool;
    /// Engine drone follows speed (units/s) and throttle.
    fn engine(&mut self, speed: f32, acceleration: f32);
}

/// Cue sink that plays nothing but keeps the mute flag honest.
#[derive(Debug, Default, Clone)]
pub struct SilentAudio {
    muted: bool,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl AudioCues for SilentAudio {
    fn collision_impact(&mut self, _force: f32) {}
    fn tire_screech(&mut self) {}
    fn item_collect(&mut self) {}
    fn ambient_start(&mut self) {}
    fn ambient_stop(&mut self) {}

    fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    fn engine(&mut self, _speed: f32, _acceleration: f32) {}
}

/// Rendered cue sounds, kept so each play is just a cheap clone.
struct SoundBank {
    impact: StaticSoundData,
    screech: StaticSoundData,
    collect: StaticSoundData,
    engine: StaticSoundData,
}

impl SoundBank {
    fn render() -> Self {
        Self {
            impact: sound_from_samples(&synth::thud(0.35, 11)),
            screech: sound_from_samples(&synth::squeal(0.6, 23)),
            collect: sound_from_samples(&synth::arpeggio(659.3, 987.8, 0.08)),
            engine: sound_from_samples(&synth::engine_loop(55.0, 1.0)),
        }
    }
}

/// Wrap mono samples as a Kira sound.
fn sound_from_samples(samples: &[f32]) -> StaticSoundData {
    let frames: Arc<[Frame]> = samples.iter().map(|&s| Frame::from_mono(s)).collect();
    StaticSoundData {
        sample_rate: synth::SAMPLE_RATE,
        frames,
        settings: StaticSoundSettings::default(),
        slice: None,
    }
}

struct Backend {
    manager: AudioManager,
    bank: SoundBank,
    engine: Option<StaticSoundHandle>,
    active_sounds: Vec<StaticSoundHandle>,
}

impl Backend {
    fn new() -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;
        let bank = SoundBank::render();
        Ok(Self {
            manager,
            bank,
            engine: None,
            active_sounds: Vec::new(),
        })
    }

    fn play(&mut self, data: StaticSoundData, volume: f64) {
        let settings = StaticSoundSettings::new().volume(volume);
        match self.manager.play(data.with_settings(settings)) {
            Ok(handle) => self.active_sounds.push(handle),
            Err(e) => log::warn!("Failed to play sound: {}", e),
        }
    }

    fn cleanup(&mut self) {
        self.active_sounds
            .retain(|handle| handle.state() != PlaybackState::Stopped);
    }
}

/// Kira-backed cue player. Every cue is a no-op when no output device
/// could be opened.
pub struct AudioSystem {
    backend: Option<Backend>,
    muted: bool,
    /// Master volume restored on unmute.
    volume: f64,
}

impl AudioSystem {
    /// Open the default output device; falls back to silence on failure.
    pub fn new() -> Self {
        let backend = match Backend::new() {
            Ok(backend) => {
                log::info!("Audio backend ready");
                Some(backend)
            }
            Err(e) => {
                log::warn!("Audio unavailable, continuing silently: {:#}", e);
                None
            }
        };
        Self {
            backend,
            muted: false,
            volume: 1.0,
        }
    }

    /// System that never opens a device.
    pub fn disabled() -> Self {
        Self {
            backend: None,
            muted: false,
            volume: 1.0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Configured master volume, independent of mute.
    pub fn master_volume(&self) -> f64 {
        self.volume
    }

    /// Set master volume (0.0 to 1.0). Takes effect on unmute when muted.
    pub fn set_master_volume(&mut self, volume: f64) {
        self.volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 1.0 };
        self.apply_volume();
    }

    /// Volume the main track should play at right now.
    fn effective_volume(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    fn apply_volume(&mut self) {
        let volume = self.effective_volume();
        if let Some(backend) = &mut self.backend {
            let _ = backend.manager.main_track().set_volume(volume, Tween::default());
        }
    }

    /// Stop all sounds.
    pub fn stop_all(&mut self) {
        if let Some(backend) = &mut self.backend {
            for handle in &mut backend.active_sounds {
                let _ = handle.stop(Tween::default());
            }
            backend.active_sounds.clear();
        }
        self.ambient_stop();
    }
}

impl Default for AudioSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioCues for AudioSystem {
    fn collision_impact(&mut self, force: f32) {
        if let Some(backend) = &mut self.backend {
            backend.cleanup();
            let volume = (force / 40.0).clamp(0.2, 1.0) as f64;
            let data = backend.bank.impact.clone();
            backend.play(data, volume);
        }
    }

    fn tire_screech(&mut self) {
        if let Some(backend) = &mut self.backend {
            backend.cleanup();
            let data = backend.bank.screech.clone();
            backend.play(data, 0.5);
        }
    }

    fn item_collect(&mut self) {
        if let Some(backend) = &mut self.backend {
            backend.cleanup();
            let data = backend.bank.collect.clone();
            backend.play(data, 0.6);
        }
    }

    fn ambient_start(&mut self) {
        let Some(backend) = &mut self.backend else {
            return;
        };
        if backend.engine.is_some() {
            return;
        }
        let settings = StaticSoundSettings::new().volume(0.25).loop_region(..);
        let data = backend.bank.engine.clone().with_settings(settings);
        match backend.manager.play(data) {
            Ok(handle) => backend.engine = Some(handle),
            Err(e) => log::warn!("Failed to start engine loop: {}", e),
        }
    }

    fn ambient_stop(&mut self) {
        if let Some(backend) = &mut self.backend {
            if let Some(mut handle) = backend.engine.take() {
                let _ = handle.stop(Tween::default());
            }
        }
    }

    fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.apply_volume();
        log::debug!("Audio muted: {}", self.muted);
        self.muted
    }

    fn engine(&mut self, speed: f32, acceleration: f32) {
        let Some(backend) = &mut self.backend else {
            return;
        };
        let Some(handle) = &mut backend.engine else {
            return;
        };
        let speed = if speed.is_finite() { speed.abs() } else { 0.0 };
        let acceleration = if acceleration.is_finite() { acceleration } else { 0.0 };
        // Idle at 1x, roughly 3x at top speed; throttle adds a little bite.
        let rate = 1.0 + (speed / 90.0).min(2.0) + (acceleration.max(0.0) / 200.0).min(0.2);
        let _ = handle.set_playback_rate(rate as f64, Tween::default());
    }
}
