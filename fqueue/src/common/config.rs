/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use lazy_static::lazy_static;
use tracing::{error, info};

/// Configuration for FQueue pipelines.
///
/// Loaded from TOML in the XDG config directory; every field has a default, so a
/// partial file only overrides what it names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FQueueConfig {
    /// Channel capacities
    pub limits: LimitsConfig,
    /// Producer and shutdown timeouts
    pub timeouts: TimeoutConfig,
    /// Naming defaults
    pub defaults: DefaultsConfig,
}

/// Limits and capacity configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Capacity of every actor mailbox (dispatcher and workers)
    pub mailbox_capacity: usize,
}

/// Timeout-related configuration values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// How long `send_broadcast` waits on a full mailbox before dropping the element
    pub broadcast_send_timeout_ms: u64,
    /// Budget used by `FQueueRegistry::shutdown`
    pub shutdown_timeout_ms: u64,
}

/// Default values configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Name given to pipelines built without `named`
    pub pipeline_name: String,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 1024,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            broadcast_send_timeout_ms: 1_000,
            shutdown_timeout_ms: 30_000,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            pipeline_name: "fqueue".to_string(),
        }
    }
}

impl FQueueConfig {
    /// Convert the broadcast send timeout to a Duration
    pub const fn broadcast_send_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.broadcast_send_timeout_ms)
    }

    /// Convert the shutdown timeout to a Duration
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.shutdown_timeout_ms)
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the text is not valid TOML or a field has the
    /// wrong type.
    pub fn from_toml_str(config_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(config_str)
    }

    /// Loads a configuration from an explicit file, falling back to defaults.
    ///
    /// A missing or malformed file is logged and the default configuration is
    /// returned.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(config_str) => match Self::from_toml_str(&config_str) {
                Ok(config) => {
                    info!("Loaded FQueue configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    error!("Failed to parse configuration file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read configuration file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load configuration from XDG-compliant locations
    ///
    /// Looks for `fqueue/config.toml` under `$XDG_CONFIG_HOME` (usually
    /// `~/.config`) and the XDG config dirs. Without a file the defaults are used.
    pub fn load() -> Self {
        let xdg_dirs = match xdg::BaseDirectories::with_prefix("fqueue") {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        if let Some(path) = xdg_dirs.find_config_file("config.toml") {
            Self::load_from(&path)
        } else {
            info!("No FQueue configuration file found, using defaults");
            Self::default()
        }
    }
}

lazy_static! {
    /// Global configuration instance loaded from XDG-compliant locations
    pub static ref CONFIG: FQueueConfig = FQueueConfig::load();
}
