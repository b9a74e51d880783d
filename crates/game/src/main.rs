//! Vibecar - endless-road driving game core, run headless on an autopilot.

mod camera;
mod chunks;
mod collision;
mod config;
mod effects;
mod hud;
mod player;
mod scene;
mod session;
mod spawner;
mod state;
mod update;
mod world;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use audio::{AudioCues, AudioSystem, SilentAudio};
use clap::Parser;
use input::{Control, ControlSet};

use config::GameConfig;
use hud::LogHud;
use scene::RecordingScene;
use session::Session;
use state::SessionPhase;

/// Fixed step of the headless loop.
const STEP: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(name = "vibecar", about = "Endless-road driving game, headless autopilot run")]
struct Args {
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    /// Seed for the hazard spawner (overrides the config file).
    #[arg(long)]
    seed: Option<u64>,

    /// Config file to load; defaults to `config.ron` if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Don't open an audio device.
    #[arg(long)]
    no_audio: bool,

    /// Write the effective config to `config.ron` before running.
    #[arg(long)]
    write_config: bool,

    /// Log the HUD every N frames.
    #[arg(long, default_value_t = 60)]
    hud_every: u64,
}

/// Steer back toward the road centre line and keep the throttle down.
fn autopilot<S: scene::Scene, A: AudioCues, H: hud::HudSink>(session: &Session<S, A, H>) -> ControlSet {
    let player = &session.world.player;
    let target = (-player.position().x * 0.005).clamp(-0.3, 0.3);
    let mut controls = ControlSet::new().holding(Control::Accelerate);
    if player.heading < target - 0.01 {
        controls.hold(Control::SteerLeft);
    } else if player.heading > target + 0.01 {
        controls.hold(Control::SteerRight);
    }
    controls
}

fn run<A: AudioCues>(config: GameConfig, audio: A, args: &Args) -> SessionPhase {
    let mut session = Session::new(config, RecordingScene::new(), audio, LogHud::new(args.hud_every));
    session.start();

    let mut phase = session.phase;
    for _ in 0..args.frames {
        let controls = autopilot(&session);
        phase = session.step(&controls, STEP);
        if phase == SessionPhase::GameOver {
            break;
        }
    }

    let player = &session.world.player;
    log::info!(
        "Finished after {:.1}s: phase {:?}, score {}, health {:.0}, distance {:.0}, rocks {}, chunks {}",
        session.time.elapsed_seconds(),
        phase,
        player.score,
        player.health.current(),
        player.position().z,
        session.world.spawner.spawned_total(),
        session.world.chunks.loaded_count(),
    );
    phase
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::load(),
    };
    if args.seed.is_some() {
        config.rng_seed = args.seed;
    }

    if args.write_config {
        config.save();
    }

    log::info!("Starting vibecar ({} frames)", args.frames);

    if args.no_audio {
        run(config, SilentAudio::new(), &args);
    } else {
        let mut audio = AudioSystem::new();
        audio.set_master_volume(0.8);
        run(config, audio, &args);
    }

    Ok(())
}
