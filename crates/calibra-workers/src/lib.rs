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

//! Background worker loops.
//!
//! Each worker runs on its own OS thread, polls the shared
//! [`CancellationToken`](calibra_core::CancellationToken) at every cadence
//! boundary, and hands its output back through [`WorkerHandle::join`].

pub mod monitor;
pub mod tracker;
pub mod tuner;
pub mod worker;

pub use monitor::{Monitor, MonitorConfig, MonitorReport};
pub use tracker::{RandomSteps, ScriptedSteps, StepSource, Tracker, TrackerConfig};
pub use tuner::{Tuner, TunerConfig, TunerReport};
pub use worker::{spawn_worker, Worker, WorkerError, WorkerHandle, WorkerState};
