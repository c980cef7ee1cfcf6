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

//! # Calibra Core
//!
//! Foundational crate containing the shared tuning state, the cancellation
//! primitive observed by every worker, and the contracts implemented by the
//! external collaborators (persistence, telemetry, boot, visualization).

#![warn(missing_docs)]

pub mod boot;
pub mod cancel;
pub mod motion;
pub mod persistence;
pub mod telemetry;
pub mod tuning;
pub mod visual;

pub use boot::{BootReport, BootSequence, SkipBoot};
pub use cancel::CancellationToken;
pub use motion::{Position, ScreenBounds, Trajectory, TrajectorySample, TrajectoryStats};
pub use persistence::{ConfigError, ConfigStore, MemoryConfigStore};
pub use telemetry::{TelemetrySample, UtilizationProvider};
pub use tuning::{SharedTuning, TuningDelta, TuningParams};
pub use visual::{SinkError, TrajectorySink};
