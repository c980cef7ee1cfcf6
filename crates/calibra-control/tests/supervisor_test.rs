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

use calibra_control::{
    BootFailurePolicy, Collaborators, OverrideOutcome, Supervisor, SupervisorConfig,
    SupervisorError,
};
use calibra_core::{
    BootReport, BootSequence, ConfigError, ConfigStore, MemoryConfigStore, SinkError, SkipBoot,
    Trajectory, TrajectorySink, TuningParams, UtilizationProvider,
};
use calibra_workers::{MonitorConfig, TrackerConfig, TunerConfig};
use std::borrow::Cow;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// --- STUB COLLABORATORS FOR THESE TESTS ---
#[derive(Debug)]
struct Constant(f32);

impl UtilizationProvider for Constant {
    fn provider_id(&self) -> Cow<'static, str> {
        Cow::Borrowed("constant")
    }

    fn sample(&mut self) -> f32 {
        self.0
    }
}

#[derive(Default, Clone)]
struct RecordingSink {
    received: Arc<Mutex<Option<Trajectory>>>,
}

impl TrajectorySink for RecordingSink {
    fn consume(&mut self, trajectory: &Trajectory) -> Result<(), SinkError> {
        *self.received.lock().unwrap() = Some(trajectory.clone());
        Ok(())
    }
}

struct BrokenSink;

impl TrajectorySink for BrokenSink {
    fn consume(&mut self, _trajectory: &Trajectory) -> Result<(), SinkError> {
        Err(SinkError::Io(std::io::Error::other("display unavailable")))
    }
}

struct FailingBoot(&'static str);

impl BootSequence for FailingBoot {
    fn run(&mut self) -> BootReport {
        BootReport {
            loaded: vec!["Input Layer".to_string()],
            recovered: Vec::new(),
            critical: Some(self.0.to_string()),
        }
    }
}

struct ReadOnlyStore;

impl ConfigStore for ReadOnlyStore {
    fn location(&self) -> String {
        "<read-only>".to_string()
    }

    fn load(&self) -> Result<TuningParams, ConfigError> {
        Ok(TuningParams::new(0.4, 0.4, 0.4))
    }

    fn save(&self, _params: &TuningParams) -> Result<(), ConfigError> {
        Err(ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }
}

/// Short cadences and zero jitter, so the tuner never moves the values.
fn quiet_config() -> SupervisorConfig {
    SupervisorConfig {
        run_duration: Duration::from_secs(5),
        tracker: TrackerConfig {
            cadence: Duration::from_millis(10),
            ..TrackerConfig::default()
        },
        tuner: TunerConfig {
            cadence: Duration::from_millis(20),
            sensitivity_jitter: 0.0,
            smoothness_jitter: 0.0,
            strength_jitter: 0.0,
        },
        monitor: MonitorConfig {
            cadence: Duration::from_millis(20),
        },
        seed: Some(7),
        ..SupervisorConfig::default()
    }
}

fn collaborators(store: Box<dyn ConfigStore>, sink: Box<dyn TrajectorySink>) -> Collaborators {
    Collaborators {
        store,
        boot: Box::new(SkipBoot),
        cpu: Box::new(Constant(30.0)),
        gpu: Box::new(Constant(55.0)),
        sink,
    }
}

#[test]
fn test_full_lifecycle_persists_the_override() {
    // --- 1. ARRANGE ---
    let store = Arc::new(MemoryConfigStore::new());
    let sink = RecordingSink::default();
    let parts = collaborators(Box::new(store.clone()), Box::new(sink.clone()));
    let supervisor = Supervisor::new(quiet_config(), parts);

    // --- 2. ACT ---
    let mut output = Vec::new();
    let report = supervisor
        .run(&mut Cursor::new("0.1\n0.2\n0.3\n"), &mut output)
        .unwrap();

    // --- 3. ASSERT ---
    let expected = TuningParams::new(0.1, 0.2, 0.3);
    assert_eq!(report.initial, TuningParams::default());
    assert_eq!(report.override_outcome, OverrideOutcome::Applied(expected));
    assert_eq!(report.final_params, expected);
    assert!(report.persisted);
    assert_eq!(store.snapshot(), Some(expected));

    assert!(report.visualized);
    let received = sink.received.lock().unwrap().clone();
    assert_eq!(received, Some(report.trajectory.clone()));
    assert!(report.failed_workers.is_empty());
    assert!(report.boot.is_complete());

    let prompts = String::from_utf8(output).unwrap();
    assert!(prompts.contains("New Sensitivity (current: 0.50): "));
}

#[test]
fn test_saved_values_are_loaded_on_next_run() {
    // --- 1. ARRANGE ---
    let store = Arc::new(MemoryConfigStore::new());
    let first = Supervisor::new(
        quiet_config(),
        collaborators(Box::new(store.clone()), Box::new(RecordingSink::default())),
    );
    first
        .run(&mut Cursor::new("0.7\n0.6\n0.5\n"), &mut Vec::new())
        .unwrap();

    // --- 2. ACT ---
    let second = Supervisor::new(
        quiet_config(),
        collaborators(Box::new(store.clone()), Box::new(RecordingSink::default())),
    );
    let report = second.run(&mut Cursor::new(""), &mut Vec::new()).unwrap();

    // --- 3. ASSERT ---
    assert_eq!(report.initial, TuningParams::new(0.7, 0.6, 0.5));
    assert!(matches!(report.override_outcome, OverrideOutcome::Rejected { .. }));
    assert_eq!(report.final_params, TuningParams::new(0.7, 0.6, 0.5));
}

#[test]
fn test_rejected_override_keeps_loaded_values() {
    let store = Arc::new(MemoryConfigStore::with_params(TuningParams::new(
        0.25, 0.75, 0.5,
    )));
    let supervisor = Supervisor::new(
        quiet_config(),
        collaborators(Box::new(store.clone()), Box::new(RecordingSink::default())),
    );

    let report = supervisor
        .run(&mut Cursor::new("0.9\nabc\n0.9\n"), &mut Vec::new())
        .unwrap();

    assert!(matches!(report.override_outcome, OverrideOutcome::Rejected { .. }));
    assert_eq!(report.final_params, TuningParams::new(0.25, 0.75, 0.5));
    assert_eq!(store.snapshot(), Some(TuningParams::new(0.25, 0.75, 0.5)));
}

#[test]
fn test_abort_policy_stops_before_workers_and_saves_nothing() {
    // --- 1. ARRANGE ---
    let store = Arc::new(MemoryConfigStore::new());
    let sink = RecordingSink::default();
    let mut parts = collaborators(Box::new(store.clone()), Box::new(sink.clone()));
    parts.boot = Box::new(FailingBoot("Shader Cache"));
    let config = SupervisorConfig {
        boot_policy: BootFailurePolicy::Abort,
        ..quiet_config()
    };

    // --- 2. ACT ---
    let result =
        Supervisor::new(config, parts).run(&mut Cursor::new("0.1\n0.1\n0.1\n"), &mut Vec::new());

    // --- 3. ASSERT ---
    assert!(matches!(result, Err(SupervisorError::BootAborted(ref c)) if c == "Shader Cache"));
    assert_eq!(store.snapshot(), None);
    assert!(sink.received.lock().unwrap().is_none());
}

#[test]
fn test_advisory_policy_continues_after_critical_boot_failure() {
    let store = Arc::new(MemoryConfigStore::new());
    let mut parts = collaborators(Box::new(store.clone()), Box::new(RecordingSink::default()));
    parts.boot = Box::new(FailingBoot("Shader Cache"));

    let report = Supervisor::new(quiet_config(), parts)
        .run(&mut Cursor::new("0.1\n0.1\n0.1\n"), &mut Vec::new())
        .unwrap();

    assert_eq!(report.boot.critical.as_deref(), Some("Shader Cache"));
    assert!(report.persisted);
    assert_eq!(store.snapshot(), Some(TuningParams::new(0.1, 0.1, 0.1)));
}

#[test]
fn test_save_and_sink_failures_are_not_fatal() {
    let parts = collaborators(Box::new(ReadOnlyStore), Box::new(BrokenSink));

    let report = Supervisor::new(quiet_config(), parts)
        .run(&mut Cursor::new(""), &mut Vec::new())
        .unwrap();

    assert_eq!(report.initial, TuningParams::new(0.4, 0.4, 0.4));
    assert!(!report.persisted);
    assert!(!report.visualized);
}

#[test]
fn test_telemetry_samples_are_bounded_by_buffer_size() {
    let config = SupervisorConfig {
        telemetry_buffer_size: 2,
        monitor: MonitorConfig {
            cadence: Duration::from_millis(1),
        },
        ..quiet_config()
    };
    let parts = collaborators(
        Box::new(MemoryConfigStore::new()),
        Box::new(RecordingSink::default()),
    );

    let report = Supervisor::new(config, parts)
        .run(&mut Cursor::new(""), &mut Vec::new())
        .unwrap();

    assert!(report.telemetry.len() <= 2);
    // The buffer keeps the earliest samples; everything after it filled is counted as dropped.
    let cycles: Vec<u64> = report.telemetry.iter().map(|s| s.cycle).collect();
    assert_eq!(cycles, (0..report.telemetry.len() as u64).collect::<Vec<_>>());
    assert_eq!(
        report.monitor.dropped,
        report.monitor.cycles - report.telemetry.len() as u64
    );
    for sample in &report.telemetry {
        assert_eq!(sample.cpu_percent, 30.0);
        assert_eq!(sample.gpu_percent, 55.0);
    }
}
