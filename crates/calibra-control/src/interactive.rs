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

//! Interactive override of the tuning parameters.
//!
//! The prompt runs on the supervising thread while the workers keep going, so
//! the tuner may still be adjusting the shared state while the user types. The
//! override is committed with a single `set_all`, never field by field.

use calibra_core::{SharedTuning, TuningParams};
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// An error that aborts the whole override.
#[derive(Debug, Error)]
pub enum OverrideError {
    /// The entry was not a finite number.
    #[error("invalid value for {field}: '{input}'")]
    Invalid {
        /// The parameter being prompted for.
        field: &'static str,
        /// The raw entry, trimmed.
        input: String,
    },
    /// Input ended before every value was entered.
    #[error("no value entered for {field}")]
    Missing {
        /// The parameter being prompted for.
        field: &'static str,
    },
    /// Reading input or writing the prompt failed.
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// What happened to an override attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideOutcome {
    /// The new values were clamped and committed.
    Applied(TuningParams),
    /// The input was rejected and the previous values kept.
    Rejected {
        /// Why the input was rejected.
        reason: String,
    },
}

fn read_value<R, W>(
    input: &mut R,
    output: &mut W,
    field: &'static str,
    current: f64,
) -> Result<f64, OverrideError>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    write!(output, "New {field} (current: {current:.2}): ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(OverrideError::Missing { field });
    }
    let entry = line.trim();
    match entry.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(OverrideError::Invalid {
            field,
            input: entry.to_string(),
        }),
    }
}

/// Prompts for three new values, showing `current` for each.
///
/// Returns the clamped parameters, or the first error encountered. Values
/// entered before the error are discarded.
pub fn prompt_override<R, W>(
    input: &mut R,
    output: &mut W,
    current: &TuningParams,
) -> Result<TuningParams, OverrideError>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let sensitivity = read_value(input, output, "Sensitivity", current.sensitivity)?;
    let smoothness = read_value(input, output, "Aim Smoothness", current.smoothness)?;
    let strength = read_value(input, output, "Aim Assist Strength", current.strength)?;
    Ok(TuningParams::new(sensitivity, smoothness, strength))
}

/// Runs the prompt against the shared state and commits the result.
///
/// A rejected override logs exactly one error line and leaves `state` as the
/// workers left it.
pub fn apply_override<R, W>(state: &SharedTuning, input: &mut R, output: &mut W) -> OverrideOutcome
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    log::info!("[CONFIG] Enter new parameters (values between 0.0 and 1.0)");
    match prompt_override(input, output, &state.get()) {
        Ok(values) => {
            let committed = state.set_all(values);
            log::info!("[CONFIG] New settings successfully applied: {:?}", committed);
            OverrideOutcome::Applied(committed)
        }
        Err(e) => {
            log::error!("[CONFIG] {e}. Keeping previous settings.");
            OverrideOutcome::Rejected {
                reason: e.to_string(),
            }
        }
    }
}
