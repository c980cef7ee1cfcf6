// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Continuous perturbation of the shared tuning parameters.

use crate::worker::Worker;
use calibra_core::{CancellationToken, SharedTuning, TuningDelta, TuningParams};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Configuration for the [`Tuner`].
#[derive(Debug, Clone)]
pub struct TunerConfig {
    /// Sleep between adjustments.
    pub cadence: Duration,
    /// Half-width of the uniform delta applied to `sensitivity`.
    pub sensitivity_jitter: f64,
    /// Half-width of the uniform delta applied to `smoothness`.
    pub smoothness_jitter: f64,
    /// Half-width of the uniform delta applied to `strength`.
    pub strength_jitter: f64,
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            cadence: Duration::from_secs(2),
            sensitivity_jitter: 0.01,
            smoothness_jitter: 0.01,
            strength_jitter: 0.02,
        }
    }
}

/// Summary returned when the tuner stops.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TunerReport {
    /// Number of adjustments applied.
    pub cycles: u64,
    /// Parameters produced by the last adjustment, if any.
    pub last: Option<TuningParams>,
}

/// Nudges every parameter by a small random amount at a fixed cadence.
#[derive(Debug)]
pub struct Tuner<R: Rng + Send + 'static = SmallRng> {
    config: TunerConfig,
    state: SharedTuning,
    rng: R,
    report: TunerReport,
}

impl Tuner<SmallRng> {
    /// Creates a tuner seeded from the operating system.
    pub fn new(config: TunerConfig, state: SharedTuning) -> Self {
        Self::with_rng(config, state, SmallRng::from_entropy())
    }

    /// Creates a deterministic tuner.
    pub fn seeded(config: TunerConfig, state: SharedTuning, seed: u64) -> Self {
        Self::with_rng(config, state, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send + 'static> Tuner<R> {
    /// Creates a tuner drawing deltas from `rng`.
    pub fn with_rng(config: TunerConfig, state: SharedTuning, rng: R) -> Self {
        Self {
            config,
            state,
            rng,
            report: TunerReport::default(),
        }
    }

    /// Zero, negative and non-finite half-widths disable jitter for the field.
    fn jitter(&mut self, half_width: f64) -> f64 {
        if half_width.is_finite() && half_width > 0.0 {
            self.rng.gen_range(-half_width..=half_width)
        } else {
            0.0
        }
    }

    /// Draws one set of deltas.
    pub fn draw(&mut self) -> TuningDelta {
        TuningDelta {
            sensitivity: self.jitter(self.config.sensitivity_jitter),
            smoothness: self.jitter(self.config.smoothness_jitter),
            strength: self.jitter(self.config.strength_jitter),
        }
    }

    /// Applies one adjustment to the shared state and returns the result.
    pub fn cycle(&mut self) -> TuningParams {
        let delta = self.draw();
        let params = self.state.adjust(delta);
        self.report.cycles += 1;
        self.report.last = Some(params);
        params
    }
}

impl<R: Rng + Send + 'static> Worker for Tuner<R> {
    type Output = TunerReport;

    fn name(&self) -> &'static str {
        "tuner"
    }

    fn run(mut self, token: CancellationToken) -> TunerReport {
        log::info!("[TUNER] Starting parameter adjustments...");

        while !token.is_cancelled() {
            let p = self.cycle();
            log::info!(
                "[TUNER] Adjusted settings: Sensitivity: {:.2}, Smoothness: {:.2}, Strength: {:.2}",
                p.sensitivity,
                p.smoothness,
                p.strength
            );
            if token.sleep(self.config.cadence) {
                break;
            }
        }

        log::info!("[TUNER] Stopped after {} adjustments.", self.report.cycles);
        self.report
    }
}
