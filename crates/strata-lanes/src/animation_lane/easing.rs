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

use serde::{Deserialize, Serialize};
use strata_core::math::saturate;

/// The curve mapping linear progress to eased progress.
///
/// Every curve maps `0 -> 0` and `1 -> 1`; input is clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// `t`
    Linear,
    /// Cubic smoothstep, `t^2 (3 - 2t)`.
    SmoothStep,
    /// Quintic smootherstep, `t^3 (t (6t - 15) + 10)`. Zero velocity and
    /// acceleration at both ends.
    #[default]
    SmootherStep,
}

impl Easing {
    /// Evaluates the curve at `t`.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = saturate(t);
        match self {
            Easing::Linear => t,
            Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
            Easing::SmootherStep => t * t * t * (t * (t * 6.0 - 15.0) + 10.0),
        }
    }
}
