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

//! JSON file persistence for the tuning parameters.

use calibra_core::{ConfigError, ConfigStore, TuningParams};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default file name used by the runtime.
pub const DEFAULT_CONFIG_FILE: &str = "aim_assist_config.json";

/// Stores the parameters as a pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

impl ConfigStore for JsonConfigStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<TuningParams, ConfigError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(self.path.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        let params: TuningParams = serde_json::from_str(&content)?;
        Ok(params.clamped())
    }

    fn save(&self, params: &TuningParams) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(params)?;
        std::fs::write(&self.path, json)?;
        log::debug!("[CONFIG] Saved settings to '{}'", self.path.display());
        Ok(())
    }
}
