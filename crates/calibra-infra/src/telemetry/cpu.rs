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

//! sysinfo-based CPU utilization provider.

use calibra_core::UtilizationProvider;
use std::borrow::Cow;
use std::fmt;
use std::thread;
use std::time::Duration;
use sysinfo::{System, MINIMUM_CPU_UPDATE_INTERVAL};

/// Reports global CPU usage measured over a fixed sampling window.
///
/// Each call blocks for the sampling window, since sysinfo derives usage from
/// the difference between two refreshes.
pub struct SysinfoCpuProvider {
    system: System,
    window: Duration,
}

impl SysinfoCpuProvider {
    /// Creates a provider with a one second sampling window.
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    /// Creates a provider with the given sampling window.
    ///
    /// The window is raised to sysinfo's minimum update interval if shorter.
    pub fn with_window(window: Duration) -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        Self {
            system,
            window: window.max(MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }

    /// Returns the effective sampling window.
    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for SysinfoCpuProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SysinfoCpuProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SysinfoCpuProvider")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl UtilizationProvider for SysinfoCpuProvider {
    fn provider_id(&self) -> Cow<'static, str> {
        Cow::Borrowed("cpu.sysinfo")
    }

    fn sample(&mut self) -> f32 {
        self.system.refresh_cpu_usage();
        thread::sleep(self.window);
        self.system.refresh_cpu_usage();
        self.system.global_cpu_usage().clamp(0.0, 100.0)
    }
}
