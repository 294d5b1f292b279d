use serde_derive::{Deserialize, Serialize};

use crate::{radians, Mat4, Result, Vec3};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,

    // Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub const MIN_DISTANCE: f32 = 0.1;
    pub const MAX_DISTANCE: f32 = 5000.0;

    // Keep clear of the poles, where up is parallel to the view direction.
    const MAX_PITCH: f32 = 89.0;

    pub fn new(position: Vec3, target: Vec3) -> Self {
        Camera {
            position,
            target,
            ..Default::default()
        }
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn view_matrix(&self) -> Result<Mat4> {
        Mat4::view(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Result<Mat4> {
        Mat4::perspective(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Result<Mat4> {
        Ok(self.projection_matrix(aspect)? * self.view_matrix()?)
    }

    /// Swing the camera around its target. Angles in radians.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }

        let limit = radians(Self::MAX_PITCH);
        let current_yaw = offset.x.atan2(offset.z);
        let current_pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();

        let yaw = current_yaw + yaw;
        let pitch = (current_pitch + pitch).clamp(-limit, limit);

        let (sy, cy) = yaw.sin_cos();
        let (sp, cp) = pitch.sin_cos();
        self.position = self.target + Vec3::new(cp * sy, sp, cp * cy) * radius;
    }

    /// Scale the distance to the target by `factor`.
    pub fn zoom(&mut self, factor: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON || factor <= 0.0 {
            return;
        }

        let distance = (radius * factor).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
        self.position = self.target + offset.normalize() * distance;
    }

    /// Slide both the camera and its target in the plane of the screen.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = (self.target - self.position).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward);
        let delta = right * dx + up * dy;

        self.position += delta;
        self.target += delta;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: radians(60.0),
            near: 1.0,
            far: 2000.0,
        }
    }
}
