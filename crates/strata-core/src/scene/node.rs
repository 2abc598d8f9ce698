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

use super::Transform;
use crate::math::Aabb;

/// A handle to a node in a [`SceneGraph`](super::SceneGraph).
///
/// It combines an index with a generation count. When a node is despawned its
/// slot may be recycled, but the generation is incremented so stale handles
/// fail lookup instead of aliasing the new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    /// The slot index in the graph's arena.
    pub index: u32,
    /// A generation counter incremented each time the slot is recycled.
    pub generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// What a node represents, fixed when it is spawned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// A renderable piece of geometry with its local-space bounds.
    Leaf {
        /// Bounds of the geometry in the node's local space.
        bounds: Aabb,
    },
    /// An explicit grouping node (an assembly or sub-assembly).
    Group,
    /// Any other node: locators, bones, cameras and similar helpers.
    PassThrough,
}

impl NodeKind {
    /// Convenience constructor for a leaf.
    pub fn leaf(bounds: Aabb) -> Self {
        NodeKind::Leaf { bounds }
    }

    /// Returns the local bounds if this is a leaf.
    pub fn bounds(&self) -> Option<&Aabb> {
        match self {
            NodeKind::Leaf { bounds } => Some(bounds),
            _ => None,
        }
    }

    /// Returns `true` for [`NodeKind::Leaf`].
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeKind::Leaf { .. })
    }

    /// Returns `true` for [`NodeKind::Group`].
    pub fn is_group(&self) -> bool {
        matches!(self, NodeKind::Group)
    }
}

/// A node stored in the scene graph.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) transform: Transform,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SceneNode {
    /// Diagnostic label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind tag decided at spawn time.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The local transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// The parent handle, `None` for graph roots.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
