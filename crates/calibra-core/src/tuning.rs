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

//! The shared set of tunable parameters.
//!
//! Every field lives in the closed interval `[0, 1]`. The invariant is enforced
//! on each mutation, and all access goes through a single lock so that readers
//! only ever see whole snapshots.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

const DEFAULT_SENSITIVITY: f64 = 0.5;
const DEFAULT_SMOOTHNESS: f64 = 0.3;
const DEFAULT_STRENGTH: f64 = 1.0;

/// Clamps `value` into `[0, 1]`, keeping `fallback` when `value` is NaN.
fn clamp_unit(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// A snapshot of the three tunable parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningParams {
    /// Pointer sensitivity.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    /// Smoothing applied to pointer motion.
    #[serde(rename = "aim_smoothness", default = "default_smoothness")]
    pub smoothness: f64,
    /// Strength of the assist effect.
    #[serde(rename = "aim_assist_strength", default = "default_strength")]
    pub strength: f64,
}

fn default_sensitivity() -> f64 {
    DEFAULT_SENSITIVITY
}

fn default_smoothness() -> f64 {
    DEFAULT_SMOOTHNESS
}

fn default_strength() -> f64 {
    DEFAULT_STRENGTH
}

impl Default for TuningParams {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            smoothness: DEFAULT_SMOOTHNESS,
            strength: DEFAULT_STRENGTH,
        }
    }
}

impl TuningParams {
    /// Creates a new set of parameters, clamped into `[0, 1]`.
    ///
    /// NaN inputs fall back to the documented defaults.
    pub fn new(sensitivity: f64, smoothness: f64, strength: f64) -> Self {
        Self {
            sensitivity,
            smoothness,
            strength,
        }
        .clamped_over(&Self::default())
    }

    /// Returns a copy with every field clamped into `[0, 1]`.
    pub fn clamped(&self) -> Self {
        self.clamped_over(&Self::default())
    }

    /// Returns `true` if every field lies in `[0, 1]`.
    pub fn is_within_bounds(&self) -> bool {
        [self.sensitivity, self.smoothness, self.strength]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }

    /// Clamps every field, using the matching field of `previous` for NaN.
    fn clamped_over(&self, previous: &Self) -> Self {
        Self {
            sensitivity: clamp_unit(self.sensitivity, previous.sensitivity),
            smoothness: clamp_unit(self.smoothness, previous.smoothness),
            strength: clamp_unit(self.strength, previous.strength),
        }
    }

    fn apply(&self, delta: &TuningDelta) -> Self {
        Self {
            sensitivity: self.sensitivity + delta.sensitivity,
            smoothness: self.smoothness + delta.smoothness,
            strength: self.strength + delta.strength,
        }
        .clamped_over(self)
    }
}

/// Per-field deltas applied by [`SharedTuning::adjust`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TuningDelta {
    /// Change applied to `sensitivity`.
    pub sensitivity: f64,
    /// Change applied to `smoothness`.
    pub smoothness: f64,
    /// Change applied to `strength`.
    pub strength: f64,
}

/// The shared, thread-safe tuning state.
///
/// Cloning the handle shares the underlying state. Each operation takes the
/// lock once and replaces the whole snapshot, so concurrent `adjust` and
/// `set_all` calls are serialized and never interleave field updates.
#[derive(Debug, Clone)]
pub struct SharedTuning {
    inner: Arc<RwLock<TuningParams>>,
}

impl SharedTuning {
    /// Creates the shared state from an initial snapshot, clamping it first.
    pub fn new(initial: TuningParams) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial.clamped())),
        }
    }

    /// Returns the current snapshot.
    pub fn get(&self) -> TuningParams {
        // The lock only ever guards a complete, clamped snapshot, so a poisoned
        // guard still holds valid data.
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies per-field deltas, clamps, and returns the resulting snapshot.
    pub fn adjust(&self, delta: TuningDelta) -> TuningParams {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let next = guard.apply(&delta);
        *guard = next;
        next
    }

    /// Replaces every field at once, clamps, and returns the resulting snapshot.
    pub fn set_all(&self, values: TuningParams) -> TuningParams {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let next = values.clamped_over(&guard);
        *guard = next;
        next
    }
}

impl Default for SharedTuning {
    fn default() -> Self {
        Self::new(TuningParams::default())
    }
}
