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

//! Contract for the startup loading sequence that runs before the workers.

/// Outcome of a boot sequence run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootReport {
    /// Components that loaded on the first attempt.
    pub loaded: Vec<String>,
    /// Components that failed once and then recovered.
    pub recovered: Vec<String>,
    /// The component whose failure stopped the sequence, if any.
    pub critical: Option<String>,
}

impl BootReport {
    /// Returns `true` if no component failed critically.
    pub fn is_complete(&self) -> bool {
        self.critical.is_none()
    }
}

/// A startup sequence that prepares components before the workers start.
pub trait BootSequence: Send {
    /// Runs the sequence to completion or to its first critical failure.
    fn run(&mut self) -> BootReport;
}

/// A boot sequence that loads nothing and always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipBoot;

impl BootSequence for SkipBoot {
    fn run(&mut self) -> BootReport {
        log::info!("[BOOT] Loading sequence skipped.");
        BootReport::default()
    }
}
