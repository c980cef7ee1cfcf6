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

//! The worker contract and the handle used to observe and join a running worker.

use calibra_core::CancellationToken;
use std::thread;
use thiserror::Error;

/// An independently scheduled loop.
pub trait Worker: Send + 'static {
    /// Value handed back to the supervisor when the loop ends.
    type Output: Send + 'static;

    /// Returns the worker name, also used as the thread name.
    fn name(&self) -> &'static str;

    /// Runs the loop until `token` is cancelled or the worker's own exit
    /// condition is met.
    fn run(self, token: CancellationToken) -> Self::Output;
}

/// Lifecycle state of a spawned worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// The loop is still executing.
    Running,
    /// The loop has returned.
    Stopped,
}

/// An error raised while starting or joining a worker.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The OS refused to create the thread.
    #[error("failed to spawn worker '{name}': {source}")]
    Spawn {
        /// Worker name.
        name: &'static str,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// The worker thread panicked.
    #[error("worker '{name}' panicked")]
    Panicked {
        /// Worker name.
        name: &'static str,
    },
}

/// Handle to a worker running on its own thread.
#[derive(Debug)]
pub struct WorkerHandle<T> {
    name: &'static str,
    handle: thread::JoinHandle<T>,
}

impl<T> WorkerHandle<T> {
    /// Returns the worker name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns whether the worker loop has returned.
    pub fn state(&self) -> WorkerState {
        if self.handle.is_finished() {
            WorkerState::Stopped
        } else {
            WorkerState::Running
        }
    }

    /// Blocks until the worker returns and yields its output.
    pub fn join(self) -> Result<T, WorkerError> {
        let name = self.name;
        self.handle
            .join()
            .map_err(|_| WorkerError::Panicked { name })
    }
}

/// Starts `worker` on a dedicated, named thread.
pub fn spawn_worker<W: Worker>(
    worker: W,
    token: CancellationToken,
) -> Result<WorkerHandle<W::Output>, WorkerError> {
    let name = worker.name();
    let handle = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            log::debug!("Worker '{}' thread started.", name);
            let output = worker.run(token);
            log::debug!("Worker '{}' thread stopped.", name);
            output
        })
        .map_err(|source| WorkerError::Spawn { name, source })?;
    Ok(WorkerHandle { name, handle })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct Countdown(u32);

    impl Worker for Countdown {
        type Output = u32;

        fn name(&self) -> &'static str {
            "countdown"
        }

        fn run(mut self, token: CancellationToken) -> u32 {
            let mut ticks = 0;
            while self.0 > 0 && !token.is_cancelled() {
                self.0 -= 1;
                ticks += 1;
                token.sleep(Duration::from_millis(1));
            }
            ticks
        }
    }

    struct Panicky;

    impl Worker for Panicky {
        type Output = ();

        fn name(&self) -> &'static str {
            "panicky"
        }

        fn run(self, _token: CancellationToken) {
            panic!("boom");
        }
    }

    struct UntilCancelled;

    impl Worker for UntilCancelled {
        type Output = bool;

        fn name(&self) -> &'static str {
            "until-cancelled"
        }

        fn run(self, token: CancellationToken) -> bool {
            while !token.sleep(Duration::from_secs(10)) {}
            true
        }
    }

    #[test]
    fn test_worker_output_is_returned_on_join() {
        let handle = spawn_worker(Countdown(5), CancellationToken::new()).unwrap();
        assert_eq!(handle.name(), "countdown");
        assert_eq!(handle.join().unwrap(), 5);
    }

    #[test]
    fn test_state_transitions_to_stopped_after_cancel() {
        let token = CancellationToken::new();
        let handle = spawn_worker(UntilCancelled, token.clone()).unwrap();
        assert_eq!(handle.state(), WorkerState::Running);

        token.cancel();
        let start = std::time::Instant::now();
        while handle.state() == WorkerState::Running {
            assert!(start.elapsed() < Duration::from_secs(2), "worker did not stop");
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_panic_is_reported_as_error() {
        let handle = spawn_worker(Panicky, CancellationToken::new()).unwrap();
        assert!(matches!(
            handle.join(),
            Err(WorkerError::Panicked { name: "panicky" })
        ));
    }
}
