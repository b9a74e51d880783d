//! Procedural sound effects, rendered once at startup as mono sample buffers.

use rand::prelude::*;

pub const SAMPLE_RATE: u32 = 44_100;

/// Mono sample buffer in `[-1, 1]`.
pub type Samples = Vec<f32>;

fn sample_count(seconds: f32) -> usize {
    (seconds * SAMPLE_RATE as f32) as usize
}

/// Exponentially decaying sine blend (`freqs` are played together).
pub fn chime(freqs: &[f32], seconds: f32, decay: f32) -> Samples {
    let n = sample_count(seconds);
    let norm = 1.0 / freqs.len().max(1) as f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = (-decay * t).exp();
            let sum: f32 = freqs
                .iter()
                .map(|f| (t * f * std::f32::consts::TAU).sin())
                .sum();
            sum * norm * env
        })
        .collect()
}

/// Two notes back to back, the second an upward step (pickup jingle).
pub fn arpeggio(first: f32, second: f32, note_seconds: f32) -> Samples {
    let mut out = chime(&[first], note_seconds, 8.0);
    out.extend(chime(&[second, second * 2.0], note_seconds * 1.5, 6.0));
    out
}

/// Low-passed noise burst with a fast attack (impacts).
pub fn thud(seconds: f32, seed: u64) -> Samples {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = sample_count(seconds);
    let mut prev = 0.0f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = (-18.0 * t).exp();
            let white: f32 = rng.gen_range(-1.0..1.0);
            // One-pole low-pass keeps the body of the hit, drops the hiss.
            prev += 0.08 * (white - prev);
            let body = (t * 70.0 * std::f32::consts::TAU).sin() * 0.6;
            (prev * 2.5 + body) * env
        })
        .collect()
}

/// Warbling high-band noise (tyre squeal).
pub fn squeal(seconds: f32, seed: u64) -> Samples {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = sample_count(seconds);
    (0..n)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let fade = (1.0 - t / seconds).max(0.0);
            let wobble = (t * 9.0 * std::f32::consts::TAU).sin() * 120.0;
            let tone = (t * (1800.0 + wobble) * std::f32::consts::TAU).sin();
            let grit: f32 = rng.gen_range(-0.3..0.3);
            (tone * 0.5 + grit) * fade
        })
        .collect()
}

/// Seamless sawtooth-ish loop for the engine drone.
pub fn engine_loop(base_freq: f32, seconds: f32) -> Samples {
    let n = sample_count(seconds);
    (0..n)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let phase = (t * base_freq).fract();
            let saw = phase * 2.0 - 1.0;
            let sub = (t * base_freq * 0.5 * std::f32::consts::TAU).sin();
            saw * 0.35 + sub * 0.4
        })
        .collect()
}
