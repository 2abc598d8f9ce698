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

use strata_core::lane::{Lane, LaneKind};
use strata_core::math::{Mat4, Vec3, TAU};
use strata_core::scene::{NodeId, SceneGraph};

use super::{ExplosionLane, LayerPlan, NodeDisplacement};
use crate::hierarchy_lane::Layer;

/// Pushes every node away from the center of its parent's geometry.
///
/// Nodes of a layer are grouped by immediate parent. For a regular parent the
/// center is the world-space bounds center of the parent's whole subtree; for
/// the root-level group (children of the model root) it is the centroid of the
/// members' world positions.
///
/// When a node sits exactly on that center, the direction falls back to its
/// local position, then to an even angular spread in the XZ plane.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParentCenterLane;

enum Pivot {
    RootLevel,
    Parent(NodeId),
}

struct Group {
    pivot: Pivot,
    members: Vec<NodeId>,
}

impl ParentCenterLane {
    fn group_by_parent(graph: &SceneGraph, root: NodeId, layer: &Layer) -> Vec<Group> {
        let mut groups: Vec<Group> = Vec::new();
        let mut slot_of: HashMap<NodeId, usize> = HashMap::new();
        let mut root_level = Vec::new();

        for &node in layer.iter() {
            match graph.parent(node) {
                Some(parent) if parent != root => {
                    let slot = *slot_of.entry(parent).or_insert_with(|| {
                        groups.push(Group {
                            pivot: Pivot::Parent(parent),
                            members: Vec::new(),
                        });
                        groups.len() - 1
                    });
                    groups[slot].members.push(node);
                }
                _ => root_level.push(node),
            }
        }

        if !root_level.is_empty() {
            groups.push(Group {
                pivot: Pivot::RootLevel,
                members: root_level,
            });
        }
        groups
    }

    fn center(
        graph: &SceneGraph,
        group: &Group,
        world: &HashMap<NodeId, Mat4>,
    ) -> Vec3 {
        match group.pivot {
            Pivot::Parent(parent) => graph
                .subtree_bounds(parent)
                .map(|b| b.center())
                .or_else(|| world.get(&parent).map(Mat4::translation))
                .unwrap_or(Vec3::ZERO),
            Pivot::RootLevel => {
                let positions: Vec<Vec3> = group
                    .members
                    .iter()
                    .filter_map(|m| world.get(m).map(Mat4::translation))
                    .collect();
                if positions.is_empty() {
                    Vec3::ZERO
                } else {
                    let sum = positions.iter().fold(Vec3::ZERO, |acc, &p| acc + p);
                    sum / positions.len() as f32
                }
            }
        }
    }
}

impl ExplosionLane for ParentCenterLane {
    fn plan_layer(
        &self,
        graph: &SceneGraph,
        root: NodeId,
        layer: &Layer,
        world: &HashMap<NodeId, Mat4>,
    ) -> LayerPlan {
        let mut displacements = Vec::with_capacity(layer.len());

        for group in Self::group_by_parent(graph, root, layer) {
            let center = Self::center(graph, &group, world);
            let parent = match group.pivot {
                Pivot::Parent(parent) => Some(parent),
                Pivot::RootLevel => graph.parent(group.members[0]),
            };
            let parent_inverse = parent.and_then(|p| world.get(&p)).map(Mat4::affine_inverse);

            for (index, &node) in group.members.iter().enumerate() {
                let Some(local) = graph.transform(node) else {
                    continue;
                };
                let world_position = world
                    .get(&node)
                    .map(Mat4::translation)
                    .unwrap_or(local.translation);

                let world_direction = resolve_direction(
                    world_position - center,
                    local.translation,
                    index,
                    group.members.len(),
                );

                let direction = match parent_inverse {
                    None => world_direction,
                    Some(Some(inverse)) => {
                        unit_direction(inverse.transform_vector3(world_direction))
                            .unwrap_or(world_direction)
                    }
                    Some(None) => {
                        log::warn!(
                            "ParentCenterLane: parent of {node} has a singular world matrix, using world direction"
                        );
                        world_direction
                    }
                };

                displacements.push(NodeDisplacement {
                    node,
                    origin: local.translation,
                    direction,
                });
            }
        }

        LayerPlan::new(displacements)
    }
}

impl Lane for ParentCenterLane {
    fn strategy_name(&self) -> &'static str {
        "ParentCenter"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Explosion
    }
}

/// Picks a unit direction: `offset` if it has one, else `local_position`,
/// else the radial spread for `index` among `count` siblings.
///
/// Only an exactly zero vector falls through, so offsets in models scaled
/// far below one unit keep their direction.
pub fn resolve_direction(offset: Vec3, local_position: Vec3, index: usize, count: usize) -> Vec3 {
    unit_direction(offset)
        .or_else(|| unit_direction(local_position))
        .unwrap_or_else(|| radial_direction(index, count))
}

/// Normalizes any non-zero finite vector. Dividing by the largest component
/// first keeps tiny vectors from underflowing to a zero length.
fn unit_direction(v: Vec3) -> Option<Vec3> {
    if !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()) {
        return None;
    }
    let largest = v.x.abs().max(v.y.abs()).max(v.z.abs());
    if largest == 0.0 {
        return None;
    }
    let scaled = v / largest;
    Some(scaled / scaled.length())
}

/// An evenly spaced unit direction in the XZ plane: `(cos a, 0, sin a)` with
/// `a = 2*pi*index/count`.
pub fn radial_direction(index: usize, count: usize) -> Vec3 {
    let angle = TAU * index as f32 / count.max(1) as f32;
    let (s, c) = angle.sin_cos();
    Vec3::new(c, 0.0, s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_resolve_prefers_offset() {
        let d = resolve_direction(Vec3::new(0.0, 3.0, 0.0), Vec3::X, 0, 1);
        assert_abs_diff_eq!(d, Vec3::Y);
    }

    #[test]
    fn test_resolve_falls_back_to_local_position() {
        let d = resolve_direction(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0), 0, 1);
        assert_abs_diff_eq!(d, -Vec3::Z);
    }

    #[test]
    fn test_resolve_keeps_tiny_offsets() {
        let d = resolve_direction(Vec3::new(-4e-6, 0.0, 0.0), Vec3::X, 0, 2);
        assert_abs_diff_eq!(d, -Vec3::X);

        let d = resolve_direction(Vec3::new(0.0, 1e-30, 0.0), Vec3::X, 0, 1);
        assert_abs_diff_eq!(d, Vec3::Y);
    }

    #[test]
    fn test_unit_direction_rejects_zero_and_non_finite() {
        assert_eq!(unit_direction(Vec3::ZERO), None);
        assert_eq!(unit_direction(Vec3::new(f32::NAN, 0.0, 0.0)), None);
        assert_eq!(unit_direction(Vec3::new(f32::INFINITY, 1.0, 0.0)), None);
        assert_eq!(unit_direction(Vec3::new(1.0, f32::NAN, 0.0)), None);
    }

    #[test]
    fn test_resolve_falls_back_to_radial() {
        let d = resolve_direction(Vec3::ZERO, Vec3::ZERO, 1, 4);
        assert_abs_diff_eq!(d, Vec3::Z, epsilon = 1e-6);
    }

    #[test]
    fn test_radial_directions_are_even() {
        assert_abs_diff_eq!(radial_direction(0, 2), Vec3::X, epsilon = 1e-6);
        assert_abs_diff_eq!(radial_direction(1, 2), -Vec3::X, epsilon = 1e-6);
        assert_abs_diff_eq!(radial_direction(3, 4), -Vec3::Z, epsilon = 1e-6);
        assert_abs_diff_eq!(radial_direction(0, 0), Vec3::X, epsilon = 1e-6);
    }

    #[test]
    fn test_lane_identity() {
        assert_eq!(ParentCenterLane.strategy_name(), "ParentCenter");
        assert_eq!(ParentCenterLane.lane_kind(), LaneKind::Explosion);
    }
}
