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

//! Simulated 2D pointer position and the trajectory recorded from it.

use std::time::Duration;

/// The inclusive screen extent a [`Position`] is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenBounds {
    /// Largest allowed x coordinate.
    pub max_x: i32,
    /// Largest allowed y coordinate.
    pub max_y: i32,
}

impl Default for ScreenBounds {
    fn default() -> Self {
        Self {
            max_x: 1920,
            max_y: 1080,
        }
    }
}

impl ScreenBounds {
    /// Returns the center point of the screen.
    pub fn center(&self) -> Position {
        Position {
            x: self.max_x / 2,
            y: self.max_y / 2,
        }
    }

    /// Returns `true` if `position` lies within `[0, max_x] x [0, max_y]`.
    pub fn contains(&self, position: Position) -> bool {
        (0..=self.max_x).contains(&position.x) && (0..=self.max_y).contains(&position.y)
    }

    /// Clamps `position` into the screen.
    pub fn clamp(&self, position: Position) -> Position {
        Position {
            x: position.x.clamp(0, self.max_x.max(0)),
            y: position.y.clamp(0, self.max_y.max(0)),
        }
    }
}

/// An integer screen coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Moves by `(dx, dy)` and re-clamps into `bounds`.
    pub fn step(self, dx: i32, dy: i32, bounds: &ScreenBounds) -> Self {
        bounds.clamp(Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        })
    }
}

/// One recorded tracker sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrajectorySample {
    /// Zero-based tick index.
    pub tick: u64,
    /// Time since the tracker started.
    pub elapsed: Duration,
    /// Horizontal coordinate after the tick.
    pub x: i32,
    /// Vertical coordinate after the tick.
    pub y: i32,
}

/// Per-axis summary of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryStats {
    /// Number of samples.
    pub samples: usize,
    /// Smallest x seen.
    pub min_x: i32,
    /// Largest x seen.
    pub max_x: i32,
    /// Smallest y seen.
    pub min_y: i32,
    /// Largest y seen.
    pub max_y: i32,
    /// Arithmetic mean of x.
    pub mean_x: f64,
    /// Arithmetic mean of y.
    pub mean_y: f64,
}

/// The ordered list of samples produced by one tracker run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    /// Creates an empty trajectory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample.
    pub fn push(&mut self, sample: TrajectorySample) {
        self.samples.push(sample);
    }

    /// Returns the recorded samples in tick order.
    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the last recorded sample, if any.
    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    /// Computes per-axis statistics, or `None` for an empty trajectory.
    pub fn stats(&self) -> Option<TrajectoryStats> {
        let first = self.samples.first()?;
        let mut stats = TrajectoryStats {
            samples: self.samples.len(),
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
            mean_x: 0.0,
            mean_y: 0.0,
        };
        let (mut sum_x, mut sum_y) = (0i64, 0i64);
        for s in &self.samples {
            stats.min_x = stats.min_x.min(s.x);
            stats.max_x = stats.max_x.max(s.x);
            stats.min_y = stats.min_y.min(s.y);
            stats.max_y = stats.max_y.max(s.y);
            sum_x += i64::from(s.x);
            sum_y += i64::from(s.y);
        }
        stats.mean_x = sum_x as f64 / stats.samples as f64;
        stats.mean_y = sum_y as f64 / stats.samples as f64;
        Some(stats)
    }
}

impl FromIterator<TrajectorySample> for Trajectory {
    fn from_iter<I: IntoIterator<Item = TrajectorySample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(tick: u64, x: i32, y: i32) -> TrajectorySample {
        TrajectorySample {
            tick,
            elapsed: Duration::from_millis(tick * 100),
            x,
            y,
        }
    }

    #[test]
    fn test_step_moves_and_clamps() {
        let bounds = ScreenBounds::default();
        assert_eq!(
            Position::new(960, 540).step(5, -3, &bounds),
            Position::new(965, 537)
        );
        assert_eq!(Position::new(3, 1078).step(-10, 10, &bounds), Position::new(0, 1080));
        assert_eq!(
            Position::new(1915, 2).step(i32::MAX, i32::MIN, &bounds),
            Position::new(1920, 0)
        );
    }

    #[test]
    fn test_center_is_inside_bounds() {
        let bounds = ScreenBounds::default();
        assert_eq!(bounds.center(), Position::new(960, 540));
        assert!(bounds.contains(bounds.center()));
        assert!(!bounds.contains(Position::new(-1, 0)));
        assert!(!bounds.contains(Position::new(0, 1081)));
    }

    #[test]
    fn test_stats_over_samples() {
        let trajectory: Trajectory = vec![sample(0, 10, 20), sample(1, 30, 0), sample(2, 20, 40)]
            .into_iter()
            .collect();
        assert_eq!(trajectory.last(), Some(&sample(2, 20, 40)));
        let stats = trajectory.stats().unwrap();
        assert_eq!(stats.samples, 3);
        assert_eq!((stats.min_x, stats.max_x), (10, 30));
        assert_eq!((stats.min_y, stats.max_y), (0, 40));
        assert!((stats.mean_x - 20.0).abs() < 1e-9);
        assert!((stats.mean_y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_stats_empty_trajectory() {
        assert!(Trajectory::new().stats().is_none());
        assert!(Trajectory::new().last().is_none());
    }
}
