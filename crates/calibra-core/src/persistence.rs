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

//! Contract for loading and saving the tuning parameters between runs.

use crate::tuning::TuningParams;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// An error raised while loading or saving persisted parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No persisted document exists yet.
    #[error("config file '{0}' not found")]
    NotFound(PathBuf),
    /// The document exists but could not be read or written.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not a valid parameter set.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Storage for [`TuningParams`] across runs.
///
/// Implementations must honour the round-trip contract: parameters written by
/// `save` are read back identically by the next `load`.
pub trait ConfigStore: Send {
    /// Human-readable location of the store, used in log lines.
    fn location(&self) -> String;

    /// Loads the persisted parameters.
    fn load(&self) -> Result<TuningParams, ConfigError>;

    /// Persists `params`, replacing any previous document.
    fn save(&self, params: &TuningParams) -> Result<(), ConfigError>;
}

impl<S: ConfigStore + Sync + ?Sized> ConfigStore for Arc<S> {
    fn location(&self) -> String {
        (**self).location()
    }

    fn load(&self) -> Result<TuningParams, ConfigError> {
        (**self).load()
    }

    fn save(&self, params: &TuningParams) -> Result<(), ConfigError> {
        (**self).save(params)
    }
}

/// A volatile store that keeps the parameters in memory.
///
/// Starts empty, so the first `load` reports [`ConfigError::NotFound`].
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    slot: Mutex<Option<TuningParams>>,
}

impl MemoryConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `params`.
    pub fn with_params(params: TuningParams) -> Self {
        Self {
            slot: Mutex::new(Some(params)),
        }
    }

    /// Returns the stored parameters without going through `load`.
    pub fn snapshot(&self) -> Option<TuningParams> {
        *self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ConfigStore for MemoryConfigStore {
    fn location(&self) -> String {
        "<memory>".to_string()
    }

    fn load(&self) -> Result<TuningParams, ConfigError> {
        self.snapshot()
            .map(|p| p.clamped())
            .ok_or_else(|| ConfigError::NotFound(PathBuf::from(self.location())))
    }

    fn save(&self, params: &TuningParams) -> Result<(), ConfigError> {
        *self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = Some(*params);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_memory_store_reports_not_found() {
        let store = MemoryConfigStore::new();
        assert!(matches!(store.load(), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryConfigStore::new();
        let params = TuningParams::new(0.125, 0.7, 0.33);
        store.save(&params).unwrap();
        assert_eq!(store.load().unwrap(), params);
    }
}
