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

//! Bounded random walk over the simulated pointer position.

use crate::worker::Worker;
use calibra_core::{CancellationToken, Position, ScreenBounds, Trajectory, TrajectorySample};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Source of per-tick position deltas.
pub trait StepSource: Send + 'static {
    /// Returns the next `(dx, dy)`, each expected in `[-max_step, max_step]`.
    fn next_step(&mut self, max_step: i32) -> (i32, i32);
}

/// Independent, uniformly random deltas on both axes.
#[derive(Debug)]
pub struct RandomSteps {
    rng: SmallRng,
}

impl RandomSteps {
    /// Creates a source seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Creates a deterministic source.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Draws a position uniformly within `bounds`.
    pub fn random_position(&mut self, bounds: &ScreenBounds) -> Position {
        Position::new(
            self.rng.gen_range(0..=bounds.max_x.max(0)),
            self.rng.gen_range(0..=bounds.max_y.max(0)),
        )
    }
}

impl Default for RandomSteps {
    fn default() -> Self {
        Self::new()
    }
}

impl StepSource for RandomSteps {
    fn next_step(&mut self, max_step: i32) -> (i32, i32) {
        let m = max_step.saturating_abs();
        (self.rng.gen_range(-m..=m), self.rng.gen_range(-m..=m))
    }
}

/// Replays a fixed list of deltas, then stands still.
#[derive(Debug, Default)]
pub struct ScriptedSteps {
    steps: VecDeque<(i32, i32)>,
}

impl ScriptedSteps {
    /// Creates a source that yields `steps` in order.
    pub fn new(steps: impl IntoIterator<Item = (i32, i32)>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }
}

impl StepSource for ScriptedSteps {
    fn next_step(&mut self, _max_step: i32) -> (i32, i32) {
        self.steps.pop_front().unwrap_or((0, 0))
    }
}

/// Configuration for the [`Tracker`].
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Screen extent the position is clamped to.
    pub bounds: ScreenBounds,
    /// Sleep between ticks.
    pub cadence: Duration,
    /// Largest absolute delta per axis per tick.
    pub max_step: i32,
    /// Optional wall-clock limit on the run.
    pub max_duration: Option<Duration>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            bounds: ScreenBounds::default(),
            cadence: Duration::from_millis(100),
            max_step: 10,
            max_duration: None,
        }
    }
}

/// Simulates pointer motion and records every tick.
///
/// The position is owned exclusively by the tracker; the only thing that
/// leaves the worker is the final [`Trajectory`].
#[derive(Debug)]
pub struct Tracker<S: StepSource = RandomSteps> {
    config: TrackerConfig,
    position: Position,
    steps: S,
    trajectory: Trajectory,
    started: Instant,
}

impl Tracker<RandomSteps> {
    /// Creates a tracker starting at a random on-screen position.
    pub fn new(config: TrackerConfig) -> Self {
        let mut steps = RandomSteps::new();
        let start = steps.random_position(&config.bounds);
        Self::with_source(config, start, steps)
    }
}

impl<S: StepSource> Tracker<S> {
    /// Creates a tracker with an explicit start position and delta source.
    pub fn with_source(config: TrackerConfig, start: Position, steps: S) -> Self {
        let position = config.bounds.clamp(start);
        Self {
            config,
            position,
            steps,
            trajectory: Trajectory::new(),
            started: Instant::now(),
        }
    }

    /// Returns the current position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the samples recorded so far.
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Advances one step, records it, and returns the new sample.
    pub fn tick(&mut self) -> TrajectorySample {
        let (dx, dy) = self.steps.next_step(self.config.max_step);
        self.position = self.position.step(dx, dy, &self.config.bounds);
        let sample = TrajectorySample {
            tick: self.trajectory.len() as u64,
            elapsed: self.started.elapsed(),
            x: self.position.x,
            y: self.position.y,
        };
        self.trajectory.push(sample);
        sample
    }
}

impl<S: StepSource> Worker for Tracker<S> {
    type Output = Trajectory;

    fn name(&self) -> &'static str {
        "tracker"
    }

    fn run(mut self, token: CancellationToken) -> Trajectory {
        log::info!("[TRACKER] Tracking pointer coordinates...");
        self.started = Instant::now();
        let deadline = self.config.max_duration.map(|d| self.started + d);

        while !token.is_cancelled() {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                log::info!("[TRACKER] Run duration elapsed.");
                break;
            }

            let sample = self.tick();
            log::info!("[TRACKER] Current X: {}, Y: {}", sample.x, sample.y);

            let nap = match deadline {
                Some(d) => self
                    .config
                    .cadence
                    .min(d.saturating_duration_since(Instant::now())),
                None => self.config.cadence,
            };
            if token.sleep(nap) {
                break;
            }
        }

        log::info!("[TRACKER] Stopped after {} ticks.", self.trajectory.len());
        self.trajectory
    }
}
