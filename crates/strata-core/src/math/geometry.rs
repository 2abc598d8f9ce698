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

//! Axis-aligned bounding boxes.

use serde::{Deserialize, Serialize};

use super::{Mat4, Vec3};

/// An Axis-Aligned Bounding Box, defined by minimum and maximum corner points.
///
/// Leaf nodes carry one in their local space; the explosion lane merges them
/// in world space to find the center of a parent's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// The corner of the box with the smallest coordinates on all axes.
    pub min: Vec3,
    /// The corner of the box with the largest coordinates on all axes.
    pub max: Vec3,
}

impl Aabb {
    /// An empty box. Merging any valid box or point into it yields that box or point.
    pub const INVALID: Self = Self {
        min: Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        max: Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    /// Creates a box from two corners, reordering components so `min <= max`.
    #[inline]
    pub fn from_min_max(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a zero-volume box around a single point.
    #[inline]
    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Creates a box from its center and half extents.
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self::from_min_max(center - half_extents, center + half_extents)
    }

    /// Returns `true` when `min <= max` on every axis.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// The center point of the box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half the size of the box along each axis.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Returns the smallest box containing both `self` and `other`.
    #[inline]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns the smallest box containing `self` and `point`.
    #[inline]
    pub fn merged_with_point(&self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Transforms the box by an affine matrix and returns the axis-aligned box
    /// enclosing the result.
    ///
    /// Invalid boxes stay invalid.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        if !self.is_valid() {
            return Self::INVALID;
        }

        let center = matrix.transform_point3(self.center());
        let half = self.half_extents();
        let abs_col = |i: usize| {
            let c = matrix.cols[i];
            Vec3::new(c.x.abs(), c.y.abs(), c.z.abs())
        };
        let new_half = abs_col(0) * half.x + abs_col(1) * half.y + abs_col(2) * half.z;

        Self::from_center_half_extents(center, new_half)
    }
}

impl Default for Aabb {
    /// Returns [`Aabb::INVALID`].
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}
