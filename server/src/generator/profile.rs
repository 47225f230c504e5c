use anyhow::ensure;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Configuration for a synthetic reference/delayed signal pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub length: usize,
    pub sampling_rate: f64,
    pub frequency: f64,
    pub noise: f64,
    /// Samples by which the second signal trails the first.
    pub delay: isize,
    pub seed: u64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            length: 1000,
            sampling_rate: 100.0,
            frequency: 1.5,
            noise: 0.05,
            delay: 12,
            seed: 0,
        }
    }
}

impl SignalConfig {
    /// Lag the aligner should report: a trailing second signal is trimmed
    /// from its head, which is a negative lag.
    pub fn expected_lag(&self) -> isize {
        -self.delay
    }
}

pub struct SignalPair {
    pub reference: Vec<f64>,
    pub delayed: Vec<f64>,
}

/// Decaying tone with a slower companion so that no shift other than the
/// true delay lines the waveform up with itself.
fn waveform(config: &SignalConfig, t: f64) -> f64 {
    let span = config.length as f64;
    let envelope = 0.2 + 0.8 * (1.0 - t / span);
    let phase = 2.0 * PI * config.frequency * t / config.sampling_rate;
    envelope * phase.sin() + 0.5 * (0.37 * phase).sin()
}

pub fn build_signal_pair(config: &SignalConfig) -> anyhow::Result<SignalPair> {
    ensure!(config.length > 0, "signal length must be positive");
    ensure!(
        config.sampling_rate > 0.0,
        "sampling rate must be positive, got {}",
        config.sampling_rate
    );
    ensure!(config.noise >= 0.0, "noise amplitude must be non-negative");

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = config.noise;
    let mut jitter = move || {
        if noise > 0.0 {
            rng.gen_range(-noise..noise)
        } else {
            0.0
        }
    };

    let mut reference = Vec::with_capacity(config.length);
    let mut delayed = Vec::with_capacity(config.length);
    for index in 0..config.length {
        let t = index as f64;
        reference.push(waveform(config, t) + jitter());
        delayed.push(waveform(config, t - config.delay as f64) + jitter());
    }

    Ok(SignalPair { reference, delayed })
}
