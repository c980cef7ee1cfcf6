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

//! A cosmetic startup sequence with random synthetic failures.

use calibra_core::{BootReport, BootSequence};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::thread;
use std::time::Duration;

/// Components announced by the default boot sequence, in load order.
pub const DEFAULT_COMPONENTS: [&str; 7] = [
    "Initializing Assist Engine",
    "Loading Input Profile",
    "Calibrating Pointer Sensitivity",
    "Detecting Display Surface",
    "Preparing Visual Overlay",
    "Optimizing Frame Rate",
    "Configuring Assist Algorithms",
];

/// Timing and failure knobs for [`SimulatedBootSequence`].
#[derive(Debug, Clone)]
pub struct BootConfig {
    /// Shortest per-component load delay.
    pub min_delay: Duration,
    /// Longest per-component load delay.
    pub max_delay: Duration,
    /// Time spent on a recovery attempt.
    pub recovery_delay: Duration,
    /// Probability that a component fails its first load.
    pub failure_chance: f64,
    /// Probability that a failed component recovers.
    pub recovery_chance: f64,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(1500),
            recovery_delay: Duration::from_secs(1),
            failure_chance: 0.2,
            recovery_chance: 0.5,
        }
    }
}

impl BootConfig {
    /// A configuration with no delays, for tests and headless runs.
    pub fn instant() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            recovery_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Walks a list of components, randomly failing and recovering some of them.
///
/// The sequence stops at the first component that fails and does not recover.
#[derive(Debug)]
pub struct SimulatedBootSequence {
    config: BootConfig,
    components: Vec<String>,
    rng: SmallRng,
}

impl SimulatedBootSequence {
    /// Creates the default sequence seeded from the operating system.
    pub fn new(config: BootConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Creates the default sequence with a deterministic seed.
    pub fn seeded(config: BootConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: BootConfig, rng: SmallRng) -> Self {
        Self {
            config,
            components: DEFAULT_COMPONENTS.iter().map(|c| c.to_string()).collect(),
            rng,
        }
    }

    /// Replaces the component list.
    pub fn with_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components = components.into_iter().map(Into::into).collect();
        self
    }

    fn load_delay(&mut self) -> Duration {
        let (min, max) = (self.config.min_delay, self.config.max_delay);
        if max <= min {
            return min;
        }
        Duration::from_secs_f64(self.rng.gen_range(min.as_secs_f64()..=max.as_secs_f64()))
    }

    fn roll(&mut self, chance: f64) -> bool {
        !chance.is_nan() && self.rng.gen_bool(chance.clamp(0.0, 1.0))
    }
}

impl BootSequence for SimulatedBootSequence {
    fn run(&mut self) -> BootReport {
        let mut report = BootReport::default();
        let total = self.components.len();
        log::info!("[BOOT] Loading {} components...", total);

        for (index, component) in self.components.clone().into_iter().enumerate() {
            let delay = self.load_delay();
            thread::sleep(delay);
            let step = format!("[{}/{}]", index + 1, total);

            if !self.roll(self.config.failure_chance) {
                log::info!("[BOOT] {step} {component} loaded");
                report.loaded.push(component);
                continue;
            }

            log::error!("[BOOT] {step} Failed to load {component}, attempting to resolve...");
            thread::sleep(self.config.recovery_delay);
            if self.roll(self.config.recovery_chance) {
                log::info!("[BOOT] {step} {component} recovered");
                report.recovered.push(component);
            } else {
                log::error!("[BOOT] {step} Critical failure in {component}");
                report.critical = Some(component);
                break;
            }
        }

        report
    }
}
