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

use std::collections::HashMap;

use strata_core::scene::{NodeId, Transform};

/// Local transforms captured at analysis time, in traversal order.
///
/// Lookups go through an index map; iteration keeps the depth-first order so
/// that restoring a model is deterministic.
#[derive(Debug, Clone, Default)]
pub struct OriginalTransforms {
    entries: Vec<(NodeId, Transform)>,
    index: HashMap<NodeId, usize>,
}

impl OriginalTransforms {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, id: NodeId, transform: Transform) {
        match self.index.get(&id) {
            Some(&slot) => self.entries[slot].1 = transform,
            None => {
                self.index.insert(id, self.entries.len());
                self.entries.push((id, transform));
            }
        }
    }

    /// The transform a node had when the model was analyzed.
    pub fn get(&self, id: NodeId) -> Option<&Transform> {
        self.index.get(&id).map(|&slot| &self.entries[slot].1)
    }

    /// Returns `true` if the node was part of the analyzed model.
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Iterates in depth-first order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Transform)> {
        self.entries.iter().map(|(id, t)| (*id, t))
    }

    /// Number of recorded nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no model was analyzed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
