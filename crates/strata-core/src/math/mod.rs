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

//! Provides the 3D mathematics primitives used by the scene graph and the
//! disassembly lanes.
//!
//! Only what the layered disassembly needs lives here: vectors, a rotation
//! quaternion, an affine 4x4 matrix and an axis-aligned bounding box.
//!
//! All angular functions in this module operate in **radians**.

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{FRAC_PI_2, PI, TAU};

// --- Declare Sub-Modules ---

pub mod geometry;
pub mod matrix;
pub mod quaternion;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::geometry::Aabb;
pub use self::matrix::Mat4;
pub use self::quaternion::Quaternion;
pub use self::vector::{Vec3, Vec4};

// --- Utility Functions ---

/// Clamps a floating-point value to the `[0.0, 1.0]` range.
///
/// `NaN` maps to `0.0`, so a corrupted progress value never overshoots.
///
/// # Examples
///
/// ```
/// use strata_core::math::saturate;
/// assert_eq!(saturate(1.5), 1.0);
/// assert_eq!(saturate(-0.5), 0.0);
/// assert_eq!(saturate(f32::NAN), 0.0);
/// ```
#[inline]
pub fn saturate(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Performs an approximate equality comparison between two floats with a custom tolerance.
#[inline]
pub fn approx_eq_eps(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Performs an approximate equality comparison using the module's default [`EPSILON`].
///
/// # Examples
///
/// ```
/// use strata_core::math::{approx_eq, EPSILON};
/// assert!(approx_eq(1.0, 1.0 + EPSILON / 2.0));
/// assert!(!approx_eq(1.0, 1.0 + EPSILON * 2.0));
/// ```
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    approx_eq_eps(a, b, EPSILON)
}
