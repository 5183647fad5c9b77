//! Viewer camera model used for focus placement and picking

use glam::{Quat, Vec2, Vec3};
use serde::Serialize;

/// Half-line in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Perspective camera orbiting a target point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraView {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub aspect: f32,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 45.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 60.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl CameraView {
    /// Unit view direction
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Ray through a pointer in normalized device coordinates
    /// (x right, y up, both in [-1, 1]).
    pub fn ray(&self, ndc: Vec2) -> Ray {
        let forward = self.forward();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        let half_height = (self.fov_y.to_radians() / 2.0).tan();
        let half_width = half_height * self.aspect;

        let direction =
            (forward + right * ndc.x * half_width + up * ndc.y * half_height).normalize();
        Ray {
            origin: self.position,
            direction,
        }
    }

    /// Normalized device coordinates of a world point, `None` behind the camera
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let forward = self.forward();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        let offset = point - self.position;
        let depth = offset.dot(forward);
        if depth <= f32::EPSILON {
            return None;
        }
        let half_height = (self.fov_y.to_radians() / 2.0).tan();
        Some(Vec2::new(
            offset.dot(right) / (depth * half_height * self.aspect),
            offset.dot(up) / (depth * half_height),
        ))
    }

    /// Rotate the camera around its target about the world Y axis
    pub fn orbit_y(&mut self, angle: f32) {
        let offset = self.position - self.target;
        self.position = self.target + Quat::from_rotation_y(angle) * offset;
    }
}
