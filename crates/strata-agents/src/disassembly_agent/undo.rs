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

use strata_core::math::Vec3;
use strata_core::scene::NodeId;

/// Local positions of one layer's nodes just before it was disassembled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerSnapshot {
    positions: Vec<(NodeId, Vec3)>,
}

impl LayerSnapshot {
    pub(crate) fn new(positions: Vec<(NodeId, Vec3)>) -> Self {
        Self { positions }
    }

    /// The saved `(node, position)` pairs in layer order.
    pub fn positions(&self) -> &[(NodeId, Vec3)] {
        &self.positions
    }

    /// The saved position of one node.
    pub fn get(&self, node: NodeId) -> Option<Vec3> {
        self.positions
            .iter()
            .find(|(id, _)| *id == node)
            .map(|(_, p)| *p)
    }
}

/// One snapshot per disassembled layer. Its depth always equals the agent's
/// current layer.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    snapshots: Vec<LayerSnapshot>,
}

impl UndoStack {
    pub(crate) fn push(&mut self, snapshot: LayerSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub(crate) fn pop(&mut self) -> Option<LayerSnapshot> {
        self.snapshots.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// The most recent snapshot.
    pub fn peek(&self) -> Option<&LayerSnapshot> {
        self.snapshots.last()
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// `true` when the model is fully assembled.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
