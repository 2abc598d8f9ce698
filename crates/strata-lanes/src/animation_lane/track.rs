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
use strata_core::scene::{NodeId, SceneGraph};

/// A straight-line move of one node's local translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionTrack {
    /// The animated node.
    pub node: NodeId,
    /// Local translation when the animation started.
    pub start: Vec3,
    /// Local translation when the animation ends.
    pub target: Vec3,
}

impl PositionTrack {
    /// Creates a track.
    pub fn new(node: NodeId, start: Vec3, target: Vec3) -> Self {
        Self {
            node,
            start,
            target,
        }
    }

    /// The position at eased progress `eased`. Returns `target` exactly once
    /// `eased >= 1`.
    #[inline]
    pub fn sample(&self, eased: f32) -> Vec3 {
        if eased >= 1.0 {
            self.target
        } else {
            Vec3::lerp(self.start, self.target, eased)
        }
    }
}

/// Writes every track's sample into the graph. Tracks whose node no longer
/// exists are skipped. Returns the number of nodes written.
pub fn apply_tracks(graph: &mut SceneGraph, tracks: &[PositionTrack], eased: f32) -> usize {
    tracks
        .iter()
        .filter(|track| graph.set_translation(track.node, track.sample(eased)))
        .count()
}
