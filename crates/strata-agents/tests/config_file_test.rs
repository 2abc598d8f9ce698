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

use std::io::Write;

use strata_agents::{ConfigError, DisassemblyConfig};
use strata_lanes::animation_lane::Easing;

#[test]
fn test_load_config_from_file() {
    // --- 1. ARRANGE ---
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"(
    explosion_distance: 0.8,
    reassemble_duration_ms: 400,
    easing: SmoothStep,
    key_bindings: (reset: "Backspace"),
)"#
    )
    .expect("write config");

    // --- 2. ACT ---
    let config = DisassemblyConfig::load(file.path()).expect("config should load");

    // --- 3. ASSERT ---
    assert_eq!(config.explosion_distance, 0.8);
    assert_eq!(config.reassemble_duration_ms, 400);
    assert_eq!(config.disassemble_duration_ms, 1200);
    assert_eq!(config.easing, Easing::SmoothStep);
    assert_eq!(config.key_bindings.reset, "Backspace");
    assert_eq!(config.key_bindings.disassemble, "KeyE");
}

#[test]
fn test_saved_config_loads_back() {
    let config = DisassemblyConfig {
        auto_continue: true,
        easing: Easing::Linear,
        ..DisassemblyConfig::default()
    };
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(config.to_ron_string().unwrap().as_bytes())
        .expect("write config");

    let loaded = DisassemblyConfig::load(file.path()).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.ron");

    let err = DisassemblyConfig::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.ron"));
}

#[test]
fn test_file_with_conflicting_keys_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"(key_bindings: (reassemble: "KeyE"))"#).expect("write config");

    let err = DisassemblyConfig::load(file.path()).unwrap_err();

    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            field: "key_bindings",
            ..
        }
    ));
}
