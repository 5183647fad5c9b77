//! Photo records

use glam::{Quat, Vec3};
use serde::Serialize;
use std::path::PathBuf;

use super::camera::Ray;

/// Opaque reference to the renderer's object for a photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RenderHandle(pub u64);

/// Where a photo's image comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum PhotoSource {
    File(PathBuf),
    Placeholder,
}

/// Position, orientation and uniform scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 0.0,
        }
    }
}

/// A gallery photo and its live transform
#[derive(Debug, Clone)]
pub struct Photo {
    pub id: u32,
    pub gallery_position: Vec3,
    /// Faces the sphere center
    pub gallery_rotation: Quat,
    pub transform: Transform,
    pub handle: RenderHandle,
    pub source: PhotoSource,
    pub(super) focused: bool,
}

impl Photo {
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Distance along `ray` to this photo's quad, if hit.
    /// The quad is `width` by `height` in local units and double-sided.
    pub fn intersect(&self, ray: &Ray, width: f32, height: f32) -> Option<f32> {
        let t = &self.transform;
        if t.scale <= f32::EPSILON {
            return None;
        }

        let normal = t.rotation * Vec3::Z;
        let denom = ray.direction.dot(normal);
        if denom.abs() < 1e-6 {
            return None;
        }

        let distance = (t.position - ray.origin).dot(normal) / denom;
        if distance <= 0.0 {
            return None;
        }

        let local = ray.at(distance) - t.position;
        let x = local.dot(t.rotation * Vec3::X);
        let y = local.dot(t.rotation * Vec3::Y);
        let within = x.abs() <= width * t.scale / 2.0 && y.abs() <= height * t.scale / 2.0;
        within.then_some(distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo_at(position: Vec3, scale: f32) -> Photo {
        Photo {
            id: 0,
            gallery_position: position,
            gallery_rotation: Quat::IDENTITY,
            transform: Transform {
                position,
                rotation: Quat::IDENTITY,
                scale,
            },
            handle: RenderHandle(0),
            source: PhotoSource::Placeholder,
            focused: false,
        }
    }

    fn ray_down_z(x: f32, y: f32) -> Ray {
        Ray {
            origin: Vec3::new(x, y, 45.0),
            direction: Vec3::NEG_Z,
        }
    }

    #[test]
    fn test_hit_and_miss() {
        let photo = photo_at(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let hit = photo.intersect(&ray_down_z(1.0, 2.0), 3.3, 5.0).unwrap();
        assert!((hit - 40.0).abs() < 1e-4);

        assert!(photo.intersect(&ray_down_z(1.7, 0.0), 3.3, 5.0).is_none());
        assert!(photo.intersect(&ray_down_z(0.0, 2.6), 3.3, 5.0).is_none());
    }

    #[test]
    fn test_scale_grows_quad() {
        let photo = photo_at(Vec3::ZERO, 2.0);
        assert!(photo.intersect(&ray_down_z(3.0, 4.5), 3.3, 5.0).is_some());
    }

    #[test]
    fn test_back_face_hit() {
        let mut photo = photo_at(Vec3::ZERO, 1.0);
        photo.transform.rotation = Quat::from_rotation_y(std::f32::consts::PI);
        assert!(photo.intersect(&ray_down_z(0.0, 0.0), 3.3, 5.0).is_some());
    }

    #[test]
    fn test_collapsed_and_behind_are_ignored() {
        let collapsed = photo_at(Vec3::ZERO, 0.0);
        assert!(collapsed.intersect(&ray_down_z(0.0, 0.0), 3.3, 5.0).is_none());

        let behind = photo_at(Vec3::new(0.0, 0.0, 50.0), 1.0);
        assert!(behind.intersect(&ray_down_z(0.0, 0.0), 3.3, 5.0).is_none());
    }
}
