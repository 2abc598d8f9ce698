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

//! RON-backed configuration for the disassembly agent.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strata_lanes::animation_lane::Easing;

use crate::error::ConfigError;
use crate::input::KeyBindings;

/// Default outward displacement per layer, in scene units.
pub const DEFAULT_EXPLOSION_DISTANCE: f32 = 0.3;
/// Default duration of a disassemble step.
pub const DEFAULT_DISASSEMBLE_DURATION_MS: u64 = 1200;
/// Default duration of a reassemble step.
pub const DEFAULT_REASSEMBLE_DURATION_MS: u64 = 1000;
/// Default duration of an assemble-all move.
pub const DEFAULT_ASSEMBLE_DURATION_MS: u64 = 1500;
/// Default pause between chained steps.
pub const DEFAULT_CHAIN_DELAY_MS: u64 = 300;

/// Tunables of a [`DisassemblyAgent`](crate::DisassemblyAgent).
///
/// Every field has a default, so a RON file only needs the fields it changes:
///
/// ```
/// use strata_agents::DisassemblyConfig;
///
/// let config = DisassemblyConfig::from_ron_str("(explosion_distance: 1.5)").unwrap();
/// assert_eq!(config.explosion_distance, 1.5);
/// assert_eq!(config.disassemble_duration_ms, 1200);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisassemblyConfig {
    /// How far each layer moves outward, in its parent's units.
    pub explosion_distance: f32,
    /// Duration of a disassemble step, in milliseconds.
    pub disassemble_duration_ms: u64,
    /// Duration of a reassemble step, in milliseconds.
    pub reassemble_duration_ms: u64,
    /// Duration of an assemble-all move, in milliseconds.
    pub assemble_duration_ms: u64,
    /// Curve applied to animation progress.
    pub easing: Easing,
    /// Keep stepping in the same direction after each step completes.
    pub auto_continue: bool,
    /// Pause before a chained step, in milliseconds.
    pub chain_delay_ms: u64,
    /// Keyboard policy.
    pub key_bindings: KeyBindings,
}

impl Default for DisassemblyConfig {
    fn default() -> Self {
        Self {
            explosion_distance: DEFAULT_EXPLOSION_DISTANCE,
            disassemble_duration_ms: DEFAULT_DISASSEMBLE_DURATION_MS,
            reassemble_duration_ms: DEFAULT_REASSEMBLE_DURATION_MS,
            assemble_duration_ms: DEFAULT_ASSEMBLE_DURATION_MS,
            easing: Easing::default(),
            auto_continue: false,
            chain_delay_ms: DEFAULT_CHAIN_DELAY_MS,
            key_bindings: KeyBindings::default(),
        }
    }
}

impl DisassemblyConfig {
    /// Parses and validates a config from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a RON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&text)?;
        log::info!("DisassemblyConfig: loaded {}", path.display());
        Ok(config)
    }

    /// Pretty-prints the config as RON.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Checks ranges and key uniqueness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_explosion_distance(self.explosion_distance)?;
        self.key_bindings.validate()
    }

    /// [`Self::disassemble_duration_ms`] as a [`Duration`].
    pub fn disassemble_duration(&self) -> Duration {
        Duration::from_millis(self.disassemble_duration_ms)
    }

    /// [`Self::reassemble_duration_ms`] as a [`Duration`].
    pub fn reassemble_duration(&self) -> Duration {
        Duration::from_millis(self.reassemble_duration_ms)
    }

    /// [`Self::assemble_duration_ms`] as a [`Duration`].
    pub fn assemble_duration(&self) -> Duration {
        Duration::from_millis(self.assemble_duration_ms)
    }

    /// [`Self::chain_delay_ms`] as a [`Duration`].
    pub fn chain_delay(&self) -> Duration {
        Duration::from_millis(self.chain_delay_ms)
    }
}

/// An explosion distance must be finite and non-negative.
pub fn validate_explosion_distance(distance: f32) -> Result<(), ConfigError> {
    if distance.is_finite() && distance >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: "explosion_distance",
            reason: format!("expected a finite value >= 0, got {distance}"),
        })
    }
}
