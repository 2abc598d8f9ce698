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

use crate::math::{Mat4, Quaternion, Vec3};

/// A node's position, rotation, and scale relative to its parent. If the node
/// has no parent, this is relative to the world origin.
///
/// The disassembly core only ever animates `translation`; rotation and scale
/// are restored verbatim on reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// The translation (position) of the node.
    pub translation: Vec3,
    /// The rotation of the node, represented as a quaternion.
    pub rotation: Quaternion,
    /// The scale of the node.
    pub scale: Vec3,
}

impl Transform {
    /// Creates a new `Transform` with a given translation, rotation, and scale.
    pub fn new(translation: Vec3, rotation: Quaternion, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Creates a new `Transform` with a given translation, and identity rotation/scale.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// The identity transform: no translation, rotation, or scaling.
    pub fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quaternion::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Returns a copy with the given rotation.
    pub fn with_rotation(mut self, rotation: Quaternion) -> Self {
        self.rotation = rotation;
        self
    }

    /// Returns a copy with the given scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// The local matrix, in `Scale -> Rotate -> Translate` order.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_trs(self.translation, self.rotation, self.scale)
    }
}

impl Default for Transform {
    /// Returns the identity `Transform`.
    fn default() -> Self {
        Self::identity()
    }
}
