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

//! Trajectory consumers.

use calibra_core::{SinkError, Trajectory, TrajectorySink};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the trajectory as `tick,elapsed_ms,x,y` rows.
#[derive(Debug)]
pub struct CsvTrajectorySink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> CsvTrajectorySink<W> {
    /// Wraps an arbitrary writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> TrajectorySink for CsvTrajectorySink<W> {
    fn consume(&mut self, trajectory: &Trajectory) -> Result<(), SinkError> {
        writeln!(self.writer, "tick,elapsed_ms,x,y")?;
        for s in trajectory.samples() {
            writeln!(
                self.writer,
                "{},{},{},{}",
                s.tick,
                s.elapsed.as_millis(),
                s.x,
                s.y
            )?;
        }
        self.writer.flush()?;
        log::info!("[TRACKER] Wrote {} trajectory samples", trajectory.len());
        Ok(())
    }
}

/// Writes the trajectory as CSV to a file.
///
/// The file is only created (or truncated) when a trajectory is consumed, so
/// a run that ends before the hand-off leaves any previous output intact.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    /// Creates a sink targeting `path`. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the target file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TrajectorySink for CsvFileSink {
    fn consume(&mut self, trajectory: &Trajectory) -> Result<(), SinkError> {
        let file = File::create(&self.path)?;
        CsvTrajectorySink::new(BufWriter::new(file)).consume(trajectory)?;
        log::debug!("[TRACKER] Trajectory written to '{}'", self.path.display());
        Ok(())
    }
}

/// Logs a per-axis summary of the trajectory.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrajectorySink;

impl TrajectorySink for LogTrajectorySink {
    fn consume(&mut self, trajectory: &Trajectory) -> Result<(), SinkError> {
        match trajectory.stats() {
            Some(stats) => log::info!(
                "[TRACKER] {} samples, X {}..{} (mean {:.1}), Y {}..{} (mean {:.1})",
                stats.samples,
                stats.min_x,
                stats.max_x,
                stats.mean_x,
                stats.min_y,
                stats.max_y,
                stats.mean_y
            ),
            None => log::warn!("[TRACKER] No trajectory samples were recorded"),
        }
        Ok(())
    }
}
