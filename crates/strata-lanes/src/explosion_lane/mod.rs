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

//! Explosion planning: where each node of a layer moves when it is disassembled.
//!
//! Planning is split in two. An [`ExplosionLane`] computes, once per model, a
//! unit direction in each node's parent space. The resulting [`ExplosionPlan`]
//! then turns those directions into target positions for any distance, so
//! changing the explosion distance never re-walks the graph.

mod parent_center_lane;

pub use parent_center_lane::{radial_direction, ParentCenterLane};

use std::collections::HashMap;

use strata_core::lane::Lane;
use strata_core::math::{Mat4, Vec3};
use strata_core::scene::{NodeId, SceneGraph};

use crate::hierarchy_lane::Layer;

/// How one node moves: its analysis-time local position and a unit direction
/// in its parent's space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeDisplacement {
    /// The node being displaced.
    pub node: NodeId,
    /// Local translation when the model was analyzed.
    pub origin: Vec3,
    /// Unit direction in the parent's local space.
    pub direction: Vec3,
}

impl NodeDisplacement {
    /// The local target position at `distance`.
    #[inline]
    pub fn target(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Displacements for every node of one layer, in layer order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerPlan {
    displacements: Vec<NodeDisplacement>,
}

impl LayerPlan {
    /// Wraps precomputed displacements.
    pub fn new(displacements: Vec<NodeDisplacement>) -> Self {
        Self { displacements }
    }

    /// The displacements, one per layer member.
    pub fn displacements(&self) -> &[NodeDisplacement] {
        &self.displacements
    }

    /// `(node, target)` pairs at `distance`.
    pub fn targets(&self, distance: f32) -> Vec<(NodeId, Vec3)> {
        self.displacements
            .iter()
            .map(|d| (d.node, d.target(distance)))
            .collect()
    }
}

/// Direction plans for every layer of one model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplosionPlan {
    layers: Vec<LayerPlan>,
}

impl ExplosionPlan {
    /// Wraps per-layer plans.
    pub fn new(layers: Vec<LayerPlan>) -> Self {
        Self { layers }
    }

    /// Number of planned layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// The plan of one layer.
    pub fn layer(&self, index: usize) -> Option<&LayerPlan> {
        self.layers.get(index)
    }

    /// Target positions for one layer at `distance`. Empty if out of range.
    pub fn layer_targets(&self, index: usize, distance: f32) -> Vec<(NodeId, Vec3)> {
        self.layers
            .get(index)
            .map(|layer| layer.targets(distance))
            .unwrap_or_default()
    }

    /// Target positions for every planned node at `distance`.
    pub fn targets(&self, distance: f32) -> DisassemblyTargets {
        let positions = self
            .layers
            .iter()
            .flat_map(|layer| layer.displacements.iter())
            .map(|d| (d.node, d.target(distance)))
            .collect();
        DisassemblyTargets {
            distance,
            positions,
        }
    }
}

/// Local target positions of every layered node for one explosion distance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisassemblyTargets {
    distance: f32,
    positions: HashMap<NodeId, Vec3>,
}

impl DisassemblyTargets {
    /// The distance these targets were derived for.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// The target of one node.
    pub fn get(&self, node: NodeId) -> Option<Vec3> {
        self.positions.get(&node).copied()
    }

    /// Number of targeted nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// `true` if nothing is targeted.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterates over `(node, target)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Vec3)> + '_ {
        self.positions.iter().map(|(id, p)| (*id, *p))
    }
}

/// A strategy that decides in which direction each node of a layer moves.
pub trait ExplosionLane: Lane {
    /// Plans one layer.
    ///
    /// `world` holds the analysis-time world matrix of every node under `root`.
    fn plan_layer(
        &self,
        graph: &SceneGraph,
        root: NodeId,
        layer: &Layer,
        world: &HashMap<NodeId, Mat4>,
    ) -> LayerPlan;

    /// Plans every layer of a model.
    fn plan(&self, graph: &SceneGraph, root: NodeId, layers: &[Layer]) -> ExplosionPlan {
        let world = graph.propagate_world_matrices(root);
        let plans: Vec<LayerPlan> = layers
            .iter()
            .enumerate()
            .map(|(index, layer)| {
                let plan = self.plan_layer(graph, root, layer, &world);
                log::debug!(
                    "{}: planned layer {index} ({} node(s))",
                    self.strategy_name(),
                    plan.displacements().len()
                );
                plan
            })
            .collect();
        ExplosionPlan::new(plans)
    }
}
