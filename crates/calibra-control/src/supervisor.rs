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

//! The supervisor owning the shared state and the worker lifecycle.

use crate::interactive::{apply_override, OverrideOutcome};
use calibra_core::{
    BootReport, BootSequence, CancellationToken, ConfigError, ConfigStore, SharedTuning,
    TelemetrySample, Trajectory, TrajectorySink, TuningParams, UtilizationProvider,
};
use calibra_workers::{
    spawn_worker, Monitor, MonitorConfig, MonitorReport, RandomSteps, Tracker, TrackerConfig,
    Tuner, TunerConfig, TunerReport, WorkerError, WorkerHandle,
};
use std::io::{BufRead, Write};
use std::time::Duration;
use thiserror::Error;

/// What to do when the boot sequence reports a critical failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootFailurePolicy {
    /// Log the failure and keep going.
    #[default]
    Advisory,
    /// Stop before any worker starts.
    Abort,
}

/// Configuration for the [`Supervisor`].
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Wall-clock limit handed to the tracker.
    pub run_duration: Duration,
    /// Reaction to a critical boot failure.
    pub boot_policy: BootFailurePolicy,
    /// Tracker settings. `max_duration` is overwritten with `run_duration`.
    pub tracker: TrackerConfig,
    /// Tuner settings.
    pub tuner: TunerConfig,
    /// Monitor settings.
    pub monitor: MonitorConfig,
    /// Maximum number of telemetry samples to buffer.
    /// The buffer is only drained after shutdown, so it keeps the earliest
    /// samples of the run. Once full, later samples are dropped and counted
    /// in [`MonitorReport::dropped`].
    pub telemetry_buffer_size: usize,
    /// Seed for every random source, for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            run_duration: Duration::from_secs(10),
            boot_policy: BootFailurePolicy::default(),
            tracker: TrackerConfig::default(),
            tuner: TunerConfig::default(),
            monitor: MonitorConfig::default(),
            telemetry_buffer_size: 256,
            seed: None,
        }
    }
}

/// The external collaborators a run is wired to.
pub struct Collaborators {
    /// Where the parameters are loaded from and saved to.
    pub store: Box<dyn ConfigStore>,
    /// The startup loading sequence.
    pub boot: Box<dyn BootSequence>,
    /// CPU utilization source for the monitor.
    pub cpu: Box<dyn UtilizationProvider>,
    /// GPU utilization source for the monitor.
    pub gpu: Box<dyn UtilizationProvider>,
    /// Consumer of the recorded trajectory.
    pub sink: Box<dyn TrajectorySink>,
}

/// An error that stops a run.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The boot sequence failed critically under [`BootFailurePolicy::Abort`].
    #[error("boot sequence aborted: critical failure in {0}")]
    BootAborted(String),
    /// A worker thread could not be started.
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

/// Everything observed during one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Parameters at startup, after loading or defaulting.
    pub initial: TuningParams,
    /// Parameters at shutdown, as persisted.
    pub final_params: TuningParams,
    /// Outcome of the boot sequence.
    pub boot: BootReport,
    /// Outcome of the interactive override.
    pub override_outcome: OverrideOutcome,
    /// Samples recorded by the tracker.
    pub trajectory: Trajectory,
    /// Tuner summary.
    pub tuner: TunerReport,
    /// Monitor summary.
    pub monitor: MonitorReport,
    /// Telemetry samples drained from the buffer after shutdown: the first
    /// `telemetry_buffer_size` samples of the run, in cycle order.
    pub telemetry: Vec<TelemetrySample>,
    /// Workers that panicked instead of stopping cleanly.
    pub failed_workers: Vec<&'static str>,
    /// Whether the final parameters were saved.
    pub persisted: bool,
    /// Whether the trajectory sink accepted the trajectory.
    pub visualized: bool,
}

struct RunningWorkers {
    tracker: WorkerHandle<Trajectory>,
    tuner: WorkerHandle<TunerReport>,
    monitor: WorkerHandle<MonitorReport>,
}

/// Owns the shared tuning state and the cancellation token, and sequences
/// the whole run.
pub struct Supervisor {
    config: SupervisorConfig,
    parts: Collaborators,
}

impl Supervisor {
    /// Creates a supervisor over the given collaborators.
    pub fn new(config: SupervisorConfig, parts: Collaborators) -> Self {
        Self { config, parts }
    }

    /// Executes the full lifecycle.
    ///
    /// `input` and `output` carry the interactive override. Recoverable
    /// failures (missing config, rejected input, failed save or sink) are
    /// logged and recorded in the report; only a boot abort or a thread that
    /// cannot be spawned ends the run early.
    pub fn run<R, W>(self, input: &mut R, output: &mut W) -> Result<RunReport, SupervisorError>
    where
        R: BufRead + ?Sized,
        W: Write + ?Sized,
    {
        let Supervisor { config, parts } = self;
        let Collaborators {
            store,
            mut boot,
            cpu,
            gpu,
            mut sink,
        } = parts;

        // 1. Load
        let initial = load_or_default(store.as_ref());

        // 2. Boot
        let boot_report = boot.run();
        if let Some(component) = &boot_report.critical {
            match config.boot_policy {
                BootFailurePolicy::Advisory => log::warn!(
                    "[BOOT] Critical failure in {component}, continuing (advisory policy)."
                ),
                BootFailurePolicy::Abort => {
                    log::error!("[BOOT] Critical failure in {component}, aborting startup.");
                    return Err(SupervisorError::BootAborted(component.clone()));
                }
            }
        }

        // 3. Start workers
        let state = SharedTuning::new(initial);
        let token = CancellationToken::new();
        let (event_tx, event_rx) = crossbeam_channel::bounded(config.telemetry_buffer_size.max(1));
        let tracker = build_tracker(&config);
        let tuner = match config.seed {
            Some(seed) => Tuner::seeded(config.tuner.clone(), state.clone(), seed.wrapping_add(1)),
            None => Tuner::new(config.tuner.clone(), state.clone()),
        };
        let monitor = Monitor::new(config.monitor.clone(), cpu, gpu).with_event_sender(event_tx);
        let workers = start_workers(tracker, tuner, monitor, &token)?;
        log::info!(
            "Started tracker, tuner and monitor (run duration {:.1}s).",
            config.run_duration.as_secs_f64()
        );

        // 4. Interactive override, while the workers keep running
        let override_outcome = apply_override(&state, input, output);

        // 5. Stop
        token.cancel();
        log::info!("Stop requested, waiting for workers...");

        // 6. Join
        let mut failed_workers = Vec::new();
        let trajectory = join_or_default(workers.tracker, &mut failed_workers);
        let tuner_report = join_or_default(workers.tuner, &mut failed_workers);
        let monitor_report = join_or_default(workers.monitor, &mut failed_workers);
        let telemetry: Vec<TelemetrySample> = event_rx.try_iter().collect();
        log::info!("All workers stopped.");

        // 7. Persist
        let final_params = state.get();
        let persisted = match store.save(&final_params) {
            Ok(()) => {
                log::info!(
                    "[CONFIG] Saved settings to '{}': {:?}",
                    store.location(),
                    final_params
                );
                true
            }
            Err(e) => {
                log::error!("[CONFIG] Failed to save settings to '{}': {e}", store.location());
                false
            }
        };

        // 8. Visualize
        let visualized = match sink.consume(&trajectory) {
            Ok(()) => true,
            Err(e) => {
                log::error!("[TRACKER] Failed to hand off trajectory: {e}");
                false
            }
        };

        Ok(RunReport {
            initial,
            final_params,
            boot: boot_report,
            override_outcome,
            trajectory,
            tuner: tuner_report,
            monitor: monitor_report,
            telemetry,
            failed_workers,
            persisted,
            visualized,
        })
    }
}

/// Loads the persisted parameters, falling back to the defaults on any error.
pub fn load_or_default(store: &dyn ConfigStore) -> TuningParams {
    match store.load() {
        Ok(params) => {
            log::info!("[CONFIG] Loaded settings from '{}': {:?}", store.location(), params);
            params
        }
        Err(ConfigError::NotFound(path)) => {
            log::warn!(
                "[CONFIG] Config file '{}' not found. Using default settings.",
                path.display()
            );
            TuningParams::default()
        }
        Err(e) => {
            log::warn!(
                "[CONFIG] Could not load '{}' ({e}). Using default settings.",
                store.location()
            );
            TuningParams::default()
        }
    }
}

fn build_tracker(config: &SupervisorConfig) -> Tracker<RandomSteps> {
    let tracker_config = TrackerConfig {
        max_duration: Some(config.run_duration),
        ..config.tracker.clone()
    };
    match config.seed {
        Some(seed) => {
            let mut steps = RandomSteps::seeded(seed);
            let start = steps.random_position(&tracker_config.bounds);
            Tracker::with_source(tracker_config, start, steps)
        }
        None => Tracker::new(tracker_config),
    }
}

/// Spawns the three workers, unwinding the ones already started on failure.
fn start_workers(
    tracker: Tracker<RandomSteps>,
    tuner: Tuner,
    monitor: Monitor,
    token: &CancellationToken,
) -> Result<RunningWorkers, WorkerError> {
    let tracker = spawn_worker(tracker, token.clone())?;

    let tuner = match spawn_worker(tuner, token.clone()) {
        Ok(handle) => handle,
        Err(e) => {
            token.cancel();
            let _ = tracker.join();
            return Err(e);
        }
    };

    let monitor = match spawn_worker(monitor, token.clone()) {
        Ok(handle) => handle,
        Err(e) => {
            token.cancel();
            let _ = tracker.join();
            let _ = tuner.join();
            return Err(e);
        }
    };

    Ok(RunningWorkers {
        tracker,
        tuner,
        monitor,
    })
}

fn join_or_default<T: Default>(handle: WorkerHandle<T>, failed: &mut Vec<&'static str>) -> T {
    let name = handle.name();
    match handle.join() {
        Ok(output) => output,
        Err(e) => {
            log::error!("{e}");
            failed.push(name);
            T::default()
        }
    }
}
