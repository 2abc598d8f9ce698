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

//! The layer-by-layer disassembly state machine.
//!
//! The agent analyzes a model once, plans explosion targets once, then moves
//! one layer at a time in response to commands. The host render loop calls
//! [`DisassemblyAgent::tick`] every frame to advance the running animation.

mod agent;
mod animation;
mod status;
mod undo;

pub use agent::DisassemblyAgent;
pub use animation::{AnimationKind, AnimationRecord};
pub use status::DisassemblyStatus;
pub use undo::{LayerSnapshot, UndoStack};
