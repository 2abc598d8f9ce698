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

//! The in-process scene graph the disassembly core operates on.
//!
//! A model-loading collaborator fills a [`SceneGraph`] and hands over the id of
//! the model root. Lanes read it; agents write local translations back into it.

mod graph;
mod node;
mod transform;

pub use graph::{SceneError, SceneGraph};
pub use node::{NodeId, NodeKind, SceneNode};
pub use transform::Transform;
