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
use std::fs;
use std::time::Duration;

use fqueue::config::{DefaultsConfig, FQueueConfig, LimitsConfig, TimeoutConfig};
use tempfile::TempDir;

/// A full file overrides every default.
#[test]
fn load_from_reads_every_section() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
        [limits]
        mailbox_capacity = 64

        [timeouts]
        broadcast_send_timeout_ms = 250
        shutdown_timeout_ms = 5000

        [defaults]
        pipeline_name = "ingest"
        "#,
    )
    .unwrap();

    let config = FQueueConfig::load_from(&path);
    assert_eq!(
        config,
        FQueueConfig {
            limits: LimitsConfig {
                mailbox_capacity: 64
            },
            timeouts: TimeoutConfig {
                broadcast_send_timeout_ms: 250,
                shutdown_timeout_ms: 5000,
            },
            defaults: DefaultsConfig {
                pipeline_name: "ingest".to_string()
            },
        }
    );
    assert_eq!(config.broadcast_send_timeout(), Duration::from_millis(250));
    assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = FQueueConfig::load_from(&temp_dir.path().join("absent.toml"));
    assert_eq!(config, FQueueConfig::default());
}

#[test]
fn malformed_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[limits\nmailbox_capacity = ").unwrap();

    assert_eq!(FQueueConfig::load_from(&path), FQueueConfig::default());
}

/// `load` looks for `fqueue/config.toml` under `$XDG_CONFIG_HOME`.
#[test]
fn load_resolves_the_xdg_config_home() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join("fqueue");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        r#"
        [timeouts]
        broadcast_send_timeout_ms = 10
        "#,
    )
    .unwrap();
    std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());

    let config = FQueueConfig::load();
    assert_eq!(config.timeouts.broadcast_send_timeout_ms, 10);
    assert_eq!(config.limits, LimitsConfig::default());
}
