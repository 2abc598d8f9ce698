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

//! # Lane Abstraction
//!
//! A **Lane** is a stateless processing strategy that an agent delegates its
//! hot-path work to. Lanes read the scene graph and return plain data; agents
//! own all mutable state and decide when to call them.
//!
//! The system follows a two-level trait hierarchy:
//!
//! 1. **`Lane`** (this trait) carries identity and classification shared by all lanes.
//! 2. Domain traits extend it with execution methods, e.g. `ExplosionLane: Lane`
//!    in `strata-lanes`.

use std::fmt;

/// Classification of lane types, used for logging and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    /// Scene hierarchy analysis (layer partitioning, transform snapshots).
    Hierarchy,
    /// Explosion target planning.
    Explosion,
}

impl fmt::Display for LaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneKind::Hierarchy => write!(f, "Hierarchy"),
            LaneKind::Explosion => write!(f, "Explosion"),
        }
    }
}

/// The base trait shared by every lane.
pub trait Lane: Send + Sync {
    /// Human-readable name identifying this lane's strategy, e.g. `"ParentCenter"`.
    ///
    /// Should be unique within a lane kind.
    fn strategy_name(&self) -> &'static str;

    /// The kind of processing this lane performs.
    fn lane_kind(&self) -> LaneKind;
}
