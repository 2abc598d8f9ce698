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

use std::fmt;

/// A read-only view of an agent's progress, for UIs and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisassemblyStatus {
    /// Number of layers currently exploded.
    pub current_layer: usize,
    /// Number of layers in the loaded model.
    pub total_layers: usize,
    /// An animation is in flight.
    pub is_animating: bool,
    /// `disassemble_next` would start an animation.
    pub can_disassemble: bool,
    /// `reassemble_previous` would start an animation.
    pub can_reassemble: bool,
    /// No layer is exploded.
    pub is_fully_assembled: bool,
    /// Every layer of a non-empty model is exploded.
    pub is_fully_disassembled: bool,
}

impl DisassemblyStatus {
    pub(crate) fn new(current_layer: usize, total_layers: usize, is_animating: bool) -> Self {
        Self {
            current_layer,
            total_layers,
            is_animating,
            can_disassemble: !is_animating && current_layer < total_layers,
            can_reassemble: !is_animating && current_layer > 0,
            is_fully_assembled: current_layer == 0,
            is_fully_disassembled: total_layers > 0 && current_layer == total_layers,
        }
    }
}

impl fmt::Display for DisassemblyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {}/{}", self.current_layer, self.total_layers)?;
        if self.is_animating {
            write!(f, " (animating)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_model_is_assembled_not_disassembled() {
        let status = DisassemblyStatus::new(0, 0, false);
        assert!(status.is_fully_assembled);
        assert!(!status.is_fully_disassembled);
        assert!(!status.can_disassemble);
        assert!(!status.can_reassemble);
    }

    #[test]
    fn test_animation_blocks_commands() {
        let status = DisassemblyStatus::new(1, 3, true);
        assert!(!status.can_disassemble);
        assert!(!status.can_reassemble);
        assert_eq!(status.to_string(), "layer 1/3 (animating)");
    }
}
