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

//! Provides the contract for utilization telemetry sampled by the monitor.
//!
//! The monitor treats every provider as opaque: it asks for a percentage and
//! logs whatever comes back. Concrete providers live in `calibra-infra`.

use std::borrow::Cow;
use std::fmt::Debug;

/// A source of utilization readings, expressed as a percentage in `[0, 100]`.
pub trait UtilizationProvider: Send + Debug + 'static {
    /// Returns a unique, human-readable identifier for this provider.
    fn provider_id(&self) -> Cow<'static, str>;

    /// Takes one reading.
    ///
    /// May block for up to the provider's own sampling window.
    fn sample(&mut self) -> f32;
}

/// One monitor cycle worth of readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    /// Zero-based monitor cycle index.
    pub cycle: u64,
    /// CPU utilization percentage.
    pub cpu_percent: f32,
    /// GPU utilization percentage.
    pub gpu_percent: f32,
}
