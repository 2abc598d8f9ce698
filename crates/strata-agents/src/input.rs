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

//! Keyboard policy for the disassembly commands.
//!
//! Key codes are the strings the windowing layer produces with
//! `format!("{keycode:?}")`, e.g. `"KeyE"` or `"Space"`. No device access
//! happens here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A user-level command understood by the disassembly agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisassemblyCommand {
    /// Explode the next layer.
    DisassembleNext,
    /// Bring the last exploded layer back.
    ReassemblePrevious,
    /// Snap everything back to the analyzed transforms.
    Reset,
    /// Animate every node home at once.
    AssembleAll,
}

impl fmt::Display for DisassemblyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisassemblyCommand::DisassembleNext => write!(f, "disassemble-next"),
            DisassemblyCommand::ReassemblePrevious => write!(f, "reassemble-previous"),
            DisassemblyCommand::Reset => write!(f, "reset"),
            DisassemblyCommand::AssembleAll => write!(f, "assemble-all"),
        }
    }
}

/// Maps key codes to commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Key for [`DisassemblyCommand::DisassembleNext`].
    pub disassemble: String,
    /// Key for [`DisassemblyCommand::ReassemblePrevious`].
    pub reassemble: String,
    /// Key for [`DisassemblyCommand::Reset`].
    pub reset: String,
    /// Key for [`DisassemblyCommand::AssembleAll`].
    pub assemble_all: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            disassemble: "KeyE".to_owned(),
            reassemble: "KeyQ".to_owned(),
            reset: "KeyR".to_owned(),
            assemble_all: "KeyA".to_owned(),
        }
    }
}

impl KeyBindings {
    fn entries(&self) -> [(&str, DisassemblyCommand); 4] {
        [
            (self.disassemble.as_str(), DisassemblyCommand::DisassembleNext),
            (self.reassemble.as_str(), DisassemblyCommand::ReassemblePrevious),
            (self.reset.as_str(), DisassemblyCommand::Reset),
            (self.assemble_all.as_str(), DisassemblyCommand::AssembleAll),
        ]
    }

    /// The command bound to `key_code`, if any.
    pub fn command_for(&self, key_code: &str) -> Option<DisassemblyCommand> {
        self.entries()
            .into_iter()
            .find(|(key, _)| *key == key_code)
            .map(|(_, command)| command)
    }

    /// The key bound to `command`.
    pub fn key_for(&self, command: DisassemblyCommand) -> &str {
        match command {
            DisassemblyCommand::DisassembleNext => &self.disassemble,
            DisassemblyCommand::ReassemblePrevious => &self.reassemble,
            DisassemblyCommand::Reset => &self.reset,
            DisassemblyCommand::AssembleAll => &self.assemble_all,
        }
    }

    /// Every binding must be non-empty and bound to a single command.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entries = self.entries();
        for (i, (key, command)) in entries.iter().enumerate() {
            if key.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "key_bindings",
                    reason: format!("no key bound to {command}"),
                });
            }
            if let Some((_, other)) = entries[..i].iter().find(|(k, _)| k == key) {
                return Err(ConfigError::InvalidValue {
                    field: "key_bindings",
                    reason: format!("{key} is bound to both {other} and {command}"),
                });
            }
        }
        Ok(())
    }
}
