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

//! Lifecycle coordination: load, boot, run workers, interactive override,
//! shutdown, persistence and hand-off of the recorded trajectory.

pub mod interactive;
pub mod supervisor;

pub use interactive::{apply_override, prompt_override, OverrideError, OverrideOutcome};
pub use supervisor::{
    load_or_default, BootFailurePolicy, Collaborators, RunReport, Supervisor, SupervisorConfig,
    SupervisorError,
};
