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

//! Contract for the consumer of the tracker's recorded trajectory.

use crate::motion::Trajectory;
use thiserror::Error;

/// An error raised by a [`TrajectorySink`].
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing the output failed.
    #[error("trajectory output failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Consumes the trajectory once, at the end of a run.
pub trait TrajectorySink: Send {
    /// Renders or stores `trajectory`.
    fn consume(&mut self, trajectory: &Trajectory) -> Result<(), SinkError>;
}
