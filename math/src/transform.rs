use serde_derive::{Deserialize, Serialize};

use crate::{Mat4, Vec3};

/// Position, Euler rotation (radians) and scale of an object.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn new() -> Self {
        Self::IDENTITY
    }

    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    pub fn translate_by(&mut self, delta: Vec3) {
        self.position += delta;
    }

    pub fn rotate_by(&mut self, delta: Vec3) {
        self.rotation += delta;
    }

    /// T * Ry * Rx * Rz * S
    pub fn matrix(&self) -> Mat4 {
        let Vec3 { x, y, z } = self.position;
        Mat4::translation(x, y, z)
            .y_rotate(self.rotation.y)
            .x_rotate(self.rotation.x)
            .z_rotate(self.rotation.z)
            .scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
