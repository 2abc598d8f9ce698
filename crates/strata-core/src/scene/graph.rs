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

use std::collections::{HashMap, VecDeque};
use std::fmt;

use super::{NodeId, NodeKind, SceneNode, Transform};
use crate::math::{Aabb, Mat4, Vec3};

/// Error type for scene graph construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The parent handle passed to [`SceneGraph::spawn_child`] is not live.
    UnknownParent(NodeId),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::UnknownParent(id) => write!(f, "Unknown parent node {id}"),
        }
    }
}

impl std::error::Error for SceneError {}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    node: Option<SceneNode>,
}

/// An arena-backed tree of [`SceneNode`]s addressed by generational [`NodeId`]s.
///
/// The graph may hold several independent roots. Structure (parent/children)
/// is fixed once spawned; only local transforms are mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    live: usize,
}

impl SceneGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Construction ---

    fn allocate(&mut self, node: SceneNode) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Spawns a parentless node.
    pub fn spawn_root(
        &mut self,
        name: impl Into<String>,
        kind: NodeKind,
        transform: Transform,
    ) -> NodeId {
        self.allocate(SceneNode {
            name: name.into(),
            kind,
            transform,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Spawns a node as the last child of `parent`.
    pub fn spawn_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        kind: NodeKind,
        transform: Transform,
    ) -> Result<NodeId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownParent(parent));
        }
        let id = self.allocate(SceneNode {
            name: name.into(),
            kind,
            transform,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.push(id);
        }
        Ok(id)
    }

    /// Removes `id` and its whole subtree. Returns the number of nodes removed.
    pub fn despawn(&mut self, id: NodeId) -> usize {
        let Some(parent) = self.get(id).map(|n| n.parent) else {
            return 0;
        };
        if let Some(parent_node) = parent.and_then(|p| self.get_mut(p)) {
            parent_node.children.retain(|&c| c != id);
        }

        let doomed: Vec<NodeId> = self.depth_first(id).into_iter().map(|(n, _)| n).collect();
        for node in &doomed {
            let slot = &mut self.slots[node.index as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free_list.push(node.index);
        }
        self.live -= doomed.len();
        log::trace!("SceneGraph: despawned {} node(s) under {id}", doomed.len());
        doomed.len()
    }

    // --- Access ---

    /// Returns `true` if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Looks up a live node.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// The local transform of a live node.
    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.get(id).map(|n| &n.transform)
    }

    /// Mutable access to the local transform of a live node.
    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.get_mut(id).map(|n| &mut n.transform)
    }

    /// Overwrites the local translation. Returns `false` if the node is gone.
    pub fn set_translation(&mut self, id: NodeId, translation: Vec3) -> bool {
        match self.transform_mut(id) {
            Some(t) => {
                t.translation = translation;
                true
            }
            None => false,
        }
    }

    /// The parent of a live node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// The children of a live node, empty if the node is gone.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if the graph holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    // --- Traversal ---

    /// Pre-order depth-first walk of the subtree under `root`, children in
    /// insertion order. Each entry carries its depth relative to `root` (root = 0).
    ///
    /// Returns an empty list if `root` is not live.
    pub fn depth_first(&self, root: NodeId) -> Vec<(NodeId, usize)> {
        let mut out = Vec::new();
        if !self.contains(root) {
            return out;
        }
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            stack.extend(self.children(id).iter().rev().map(|&c| (c, depth + 1)));
        }
        out
    }

    // --- Spatial queries ---

    /// The world matrix of a node, composed from the root down as `parent * local`.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.get(id)?;
        let mut matrix = node.transform.to_mat4();
        while let Some(parent) = node.parent.and_then(|p| self.get(p)) {
            matrix = parent.transform.to_mat4() * matrix;
            node = parent;
        }
        Some(matrix)
    }

    /// The world-space position of a node's origin.
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.translation())
    }

    /// Computes world matrices for every node under `root` in a single
    /// breadth-first pass, parents before children.
    pub fn propagate_world_matrices(&self, root: NodeId) -> HashMap<NodeId, Mat4> {
        let mut out = HashMap::new();
        let Some(root_matrix) = self.world_matrix(root) else {
            return out;
        };
        out.insert(root, root_matrix);

        let mut queue = VecDeque::from([(root, root_matrix)]);
        while let Some((parent, parent_matrix)) = queue.pop_front() {
            for &child in self.children(parent) {
                if let Some(local) = self.transform(child) {
                    let child_matrix = parent_matrix * local.to_mat4();
                    out.insert(child, child_matrix);
                    queue.push_back((child, child_matrix));
                }
            }
        }
        out
    }

    /// The world-space bounds of all leaf geometry in the subtree under `id`
    /// (including `id` itself). `None` if the subtree has no geometry.
    pub fn subtree_bounds(&self, id: NodeId) -> Option<Aabb> {
        let start = self.world_matrix(id)?;
        let mut bounds = Aabb::INVALID;
        let mut stack = vec![(id, start)];
        while let Some((node_id, matrix)) = stack.pop() {
            let Some(node) = self.get(node_id) else {
                continue;
            };
            if let Some(local) = node.kind.bounds() {
                let world = local.transform(&matrix);
                if world.is_valid() {
                    bounds = bounds.merge(&world);
                }
            }
            for &child in &node.children {
                if let Some(t) = self.transform(child) {
                    stack.push((child, matrix * t.to_mat4()));
                }
            }
        }
        bounds.is_valid().then_some(bounds)
    }
}
