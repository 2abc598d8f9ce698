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
use std::time::{Duration, Instant};

use strata_core::math::saturate;
use strata_lanes::animation_lane::PositionTrack;

use crate::input::DisassemblyCommand;

/// What the running animation is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// Moving one layer outward.
    Disassemble,
    /// Moving one layer back to its snapshot.
    Reassemble,
    /// Moving every node back to its original position.
    Assemble,
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationKind::Disassemble => write!(f, "disassemble"),
            AnimationKind::Reassemble => write!(f, "reassemble"),
            AnimationKind::Assemble => write!(f, "assemble"),
        }
    }
}

/// The single in-flight animation of an agent.
#[derive(Debug, Clone)]
pub struct AnimationRecord {
    pub(crate) kind: AnimationKind,
    pub(crate) started: Instant,
    pub(crate) duration: Duration,
    pub(crate) tracks: Vec<PositionTrack>,
}

impl AnimationRecord {
    /// What the animation is doing.
    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    /// The animated tracks.
    pub fn tracks(&self) -> &[PositionTrack] {
        &self.tracks
    }

    /// Linear progress in `[0, 1]`. A zero duration is complete immediately;
    /// a clock reading before the start counts as no progress.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        saturate(elapsed.as_secs_f32() / self.duration.as_secs_f32())
    }
}

/// A chained step waiting for its delay to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingChain {
    pub(crate) command: DisassemblyCommand,
    pub(crate) due: Instant,
}
