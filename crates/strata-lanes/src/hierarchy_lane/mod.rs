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

//! Partitions a loaded model into depth layers and snapshots its transforms.

mod originals;

pub use originals::OriginalTransforms;

use strata_core::lane::{Lane, LaneKind};
use strata_core::scene::{NodeId, SceneGraph, SceneNode};

/// The nodes found at one hierarchy depth, in depth-first order.
///
/// Never empty: depths without qualifying nodes are dropped during analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    nodes: Vec<NodeId>,
}

impl Layer {
    /// The member nodes.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Number of member nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false` for layers produced by [`HierarchyLane`].
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over member nodes.
    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter()
    }
}

impl From<Vec<NodeId>> for Layer {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }
}

/// The result of analyzing one model: its layers and its original transforms.
#[derive(Debug, Clone)]
pub struct HierarchyAnalysis {
    root: NodeId,
    layers: Vec<Layer>,
    originals: OriginalTransforms,
}

impl HierarchyAnalysis {
    /// Analyzes the subtree under `root` with the default [`HierarchyLane`].
    pub fn analyze(graph: &SceneGraph, root: NodeId) -> Self {
        HierarchyLane.analyze(graph, root)
    }

    /// The model root this analysis was taken from.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Layers ordered from shallowest (index 0, depth 1) to deepest.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The layer at `index`, if any.
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Transforms of every node in the model (root included) at analysis time.
    pub fn originals(&self) -> &OriginalTransforms {
        &self.originals
    }

    /// `true` when there is nothing to disassemble.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Walks a model once and groups its nodes by depth.
///
/// A node at depth >= 1 joins a layer if it is a leaf, an explicit group, or
/// has at least one child. Pass-through nodes with no children (locators,
/// bones, cameras) are recorded in the originals but never moved.
#[derive(Debug, Default, Clone, Copy)]
pub struct HierarchyLane;

impl HierarchyLane {
    /// Runs the analysis. A root that is not live yields an empty analysis.
    pub fn analyze(&self, graph: &SceneGraph, root: NodeId) -> HierarchyAnalysis {
        let walk = graph.depth_first(root);
        if walk.is_empty() {
            log::debug!("HierarchyLane: root {root} is not in the graph, nothing to analyze");
        }

        let mut buckets: Vec<Vec<NodeId>> = Vec::new();
        let mut originals = OriginalTransforms::with_capacity(walk.len());

        for &(id, depth) in &walk {
            let Some(node) = graph.get(id) else {
                continue;
            };
            originals.insert(id, *node.transform());

            if depth == 0 || !Self::qualifies(node) {
                continue;
            }
            if buckets.len() < depth {
                buckets.resize_with(depth, Vec::new);
            }
            buckets[depth - 1].push(id);
        }

        let layers: Vec<Layer> = buckets
            .into_iter()
            .filter(|bucket| !bucket.is_empty())
            .map(Layer::from)
            .collect();

        log::debug!(
            "HierarchyLane: {} node(s) under {root}, layer sizes {:?}",
            originals.len(),
            layers.iter().map(Layer::len).collect::<Vec<_>>()
        );

        HierarchyAnalysis {
            root,
            layers,
            originals,
        }
    }

    fn qualifies(node: &SceneNode) -> bool {
        node.kind().is_leaf() || node.kind().is_group() || !node.children().is_empty()
    }
}

impl Lane for HierarchyLane {
    fn strategy_name(&self) -> &'static str {
        "DepthBuckets"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Hierarchy
    }
}
