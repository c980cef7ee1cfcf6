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

//! Periodic sampling of CPU and GPU utilization.

use crate::worker::Worker;
use calibra_core::{CancellationToken, TelemetrySample, UtilizationProvider};
use crossbeam_channel::{Sender, TrySendError};
use std::time::Duration;

/// Configuration for the [`Monitor`].
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Sleep between samples, on top of the providers' own sampling time.
    pub cadence: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            cadence: Duration::from_secs(1),
        }
    }
}

/// Summary returned when the monitor stops.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonitorReport {
    /// Number of samples taken.
    pub cycles: u64,
    /// The most recent sample.
    pub last: Option<TelemetrySample>,
    /// Highest CPU reading seen.
    pub peak_cpu: f32,
    /// Samples that could not be published because the buffer was full.
    pub dropped: u64,
}

/// Samples two utilization providers and logs the readings.
///
/// Samples may also be published on a bounded channel. When the channel is
/// full, new samples are dropped rather than blocking the loop.
#[derive(Debug)]
pub struct Monitor {
    config: MonitorConfig,
    cpu: Box<dyn UtilizationProvider>,
    gpu: Box<dyn UtilizationProvider>,
    events: Option<Sender<TelemetrySample>>,
    report: MonitorReport,
}

impl Monitor {
    /// Creates a monitor over the given providers.
    pub fn new(
        config: MonitorConfig,
        cpu: Box<dyn UtilizationProvider>,
        gpu: Box<dyn UtilizationProvider>,
    ) -> Self {
        Self {
            config,
            cpu,
            gpu,
            events: None,
            report: MonitorReport::default(),
        }
    }

    /// Publishes every sample on `sender` as well as logging it.
    pub fn with_event_sender(mut self, sender: Sender<TelemetrySample>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Takes one sample from both providers.
    pub fn cycle(&mut self) -> TelemetrySample {
        let sample = TelemetrySample {
            cycle: self.report.cycles,
            cpu_percent: self.cpu.sample(),
            gpu_percent: self.gpu.sample(),
        };
        self.report.cycles += 1;
        self.report.peak_cpu = self.report.peak_cpu.max(sample.cpu_percent);
        self.report.last = Some(sample);
        self.publish(sample);
        sample
    }

    fn publish(&mut self, sample: TelemetrySample) {
        let Some(tx) = &self.events else {
            return;
        };
        match tx.try_send(sample) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.report.dropped += 1;
                log::trace!("[MONITOR] Telemetry buffer full, sample dropped.");
            }
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("[MONITOR] Telemetry receiver gone, publishing disabled.");
                self.events = None;
            }
        }
    }
}

impl Worker for Monitor {
    type Output = MonitorReport;

    fn name(&self) -> &'static str {
        "monitor"
    }

    fn run(mut self, token: CancellationToken) -> MonitorReport {
        log::info!(
            "[MONITOR] Starting resource monitor ({} / {})...",
            self.cpu.provider_id(),
            self.gpu.provider_id()
        );

        while !token.is_cancelled() {
            let s = self.cycle();
            log::info!(
                "[MONITOR] CPU Usage: {:.1}%, GPU Usage: {:.0}%",
                s.cpu_percent,
                s.gpu_percent
            );
            if token.sleep(self.config.cadence) {
                break;
            }
        }

        log::info!("[MONITOR] Stopped after {} samples.", self.report.cycles);
        self.report
    }
}
