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

//! Column-major 4x4 affine matrices.

use super::{Quaternion, Vec3, Vec4};
use std::ops::Mul;

/// Determinants with a smaller magnitude are treated as singular.
///
/// Kept far below [`EPSILON`](super::EPSILON) so that models authored in
/// centimetres (uniform scale 0.01, determinant 1e-6) remain invertible.
const SINGULAR_DETERMINANT: f32 = 1e-12;

/// A 4x4 column-major matrix.
///
/// World matrices in the scene graph are composed as `parent_world * local`,
/// where `local` is `T * R * S`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[3]` holds the translation.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// Creates a matrix from four column vectors.
    #[inline]
    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Returns the row at `index` (0 to 3).
    #[inline]
    pub fn row(&self, index: usize) -> Vec4 {
        let pick = |c: &Vec4| match index {
            0 => c.x,
            1 => c.y,
            2 => c.z,
            _ => c.w,
        };
        Vec4::new(
            pick(&self.cols[0]),
            pick(&self.cols[1]),
            pick(&self.cols[2]),
            pick(&self.cols[3]),
        )
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self::from_cols(Vec4::X, Vec4::Y, Vec4::Z, Vec4::from_vec3(v, 1.0))
    }

    /// Creates a non-uniform scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_cols(
            Vec4::new(scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, scale.z, 0.0),
            Vec4::W,
        )
    }

    /// Creates a rotation matrix from a unit quaternion.
    pub fn from_quat(q: Quaternion) -> Self {
        let q = q.normalize();
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);
        let (x2, y2, z2) = (x + x, y + y, z + z);
        let (xx, xy, xz) = (x * x2, x * y2, x * z2);
        let (yy, yz, zz) = (y * y2, y * z2, z * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);

        Self::from_cols(
            Vec4::new(1.0 - (yy + zz), xy + wz, xz - wy, 0.0),
            Vec4::new(xy - wz, 1.0 - (xx + zz), yz + wx, 0.0),
            Vec4::new(xz + wy, yz - wx, 1.0 - (xx + yy), 0.0),
            Vec4::W,
        )
    }

    /// Creates a rotation of `angle` radians around the Y-axis.
    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(c, 0.0, -s, 0.0),
            Vec4::Y,
            Vec4::new(s, 0.0, c, 0.0),
            Vec4::W,
        )
    }

    /// Composes translation, rotation and scale as `T * R * S`.
    #[inline]
    pub fn from_trs(translation: Vec3, rotation: Quaternion, scale: Vec3) -> Self {
        Self::from_translation(translation) * Self::from_quat(rotation) * Self::from_scale(scale)
    }

    /// Returns the translation stored in the last column.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.cols[3].truncate()
    }

    /// Transforms a point (`w = 1`).
    #[inline]
    pub fn transform_point3(&self, p: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(p, 1.0)).truncate()
    }

    /// Transforms a direction (`w = 0`), ignoring translation. The result is not normalized.
    #[inline]
    pub fn transform_vector3(&self, v: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(v, 0.0)).truncate()
    }

    /// Computes the inverse of an affine matrix (no projective row).
    ///
    /// Returns `None` when the upper 3x3 block is singular, e.g. when a node is
    /// scaled to zero along an axis.
    pub fn affine_inverse(&self) -> Option<Self> {
        let c0 = self.cols[0].truncate();
        let c1 = self.cols[1].truncate();
        let c2 = self.cols[2].truncate();
        let translation = self.translation();

        // Rows of the inverse 3x3 are the cross products of the columns over the determinant.
        let r0 = c1.cross(c2);
        let r1 = c2.cross(c0);
        let r2 = c0.cross(c1);
        let det = c0.dot(r0);

        if !det.is_finite() || det.abs() < SINGULAR_DETERMINANT {
            return None;
        }

        let inv_det = 1.0 / det;
        let (r0, r1, r2) = (r0 * inv_det, r1 * inv_det, r2 * inv_det);

        Some(Self::from_cols(
            Vec4::new(r0.x, r1.x, r2.x, 0.0),
            Vec4::new(r0.y, r1.y, r2.y, 0.0),
            Vec4::new(r0.z, r1.z, r2.z, 0.0),
            Vec4::new(
                -r0.dot(translation),
                -r1.dot(translation),
                -r2.dot(translation),
                1.0,
            ),
        ))
    }
}

impl Default for Mat4 {
    /// Returns the 4x4 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn mul(self, rhs: Vec4) -> Self::Output {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    /// Matrix product. `a * b` applies `b` first.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        Self::from_cols(
            self * rhs.cols[0],
            self * rhs.cols[1],
            self * rhs.cols[2],
            self * rhs.cols[3],
        )
    }
}
