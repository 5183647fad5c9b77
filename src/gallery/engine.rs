//! Per-frame photo transforms, focus and picking

use glam::Vec3;
use tracing::{debug, info};

use super::camera::{CameraView, Ray};
use super::layout::{look_at, sphere_positions};
use super::photo::{Photo, PhotoSource, RenderHandle, Transform};
use crate::config::GalleryConfig;
use crate::state::AppState;
use steedfield_fx::ease;

const EASE_POSITION: f32 = 0.08;
const EASE_ROTATION_FOCUSED: f32 = 0.1;
const EASE_ROTATION: f32 = 0.05;
const EASE_SCALE: f32 = 0.1;
const EASE_COLLAPSE: f32 = 0.1;

const BOB_AMPLITUDE: f32 = 0.8;

/// Below this scale the first photo counts as collapsed and the group hides
const HIDE_SCALE: f32 = 0.01;

/// Owns the photo set and computes its transforms each frame.
pub struct GalleryEngine {
    slots: Vec<Vec3>,
    photos: Vec<Photo>,
    focused: Option<u32>,
    visible: bool,
    focus_distance: f32,
    focus_scale: f32,
    photo_width: f32,
    photo_height: f32,
}

impl GalleryEngine {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            slots: sphere_positions(config.photo_count as usize, config.radius),
            photos: Vec::with_capacity(config.photo_count as usize),
            focused: None,
            visible: false,
            focus_distance: config.focus_distance,
            focus_scale: config.focus_scale,
            photo_width: config.photo_width,
            photo_height: config.photo_height,
        }
    }

    /// Add a resolved photo to slot `id`. Photos arrive in any order;
    /// unknown or already filled slots are ignored.
    pub fn insert(&mut self, id: u32, source: PhotoSource, handle: RenderHandle) -> bool {
        let Some(&gallery_position) = self.slots.get(id as usize) else {
            debug!("Ignoring photo for unknown slot {}", id);
            return false;
        };
        if self.photos.iter().any(|p| p.id == id) {
            debug!("Slot {} already filled", id);
            return false;
        }

        let gallery_rotation = look_at(gallery_position, Vec3::ZERO);
        self.photos.push(Photo {
            id,
            gallery_position,
            gallery_rotation,
            transform: Transform {
                rotation: gallery_rotation,
                ..Transform::default()
            },
            handle,
            source,
            focused: false,
        });
        debug!("Photo {} added ({} of {})", id, self.photos.len(), self.slots.len());
        true
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn photo(&self, id: u32) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn focused(&self) -> Option<u32> {
        self.focused
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Focus photo `id`, clearing any previous focus in the same step.
    pub fn focus(&mut self, id: u32) -> bool {
        if self.photo(id).is_none() {
            return false;
        }
        for photo in &mut self.photos {
            photo.focused = photo.id == id;
        }
        if self.focused != Some(id) {
            info!("Focused photo {}", id);
        }
        self.focused = Some(id);
        true
    }

    /// Clear focus. Returns the previously focused id.
    pub fn unfocus(&mut self) -> Option<u32> {
        let previous = self.focused.take();
        for photo in &mut self.photos {
            photo.focused = false;
        }
        if let Some(id) = previous {
            info!("Unfocused photo {}", id);
        }
        previous
    }

    /// Nearest photo hit by `ray`
    pub fn pick(&self, ray: &Ray) -> Option<u32> {
        if !self.visible {
            return None;
        }
        self.photos
            .iter()
            .filter_map(|p| {
                p.intersect(ray, self.photo_width, self.photo_height)
                    .map(|distance| (distance, p.id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }

    /// Target transform for `photo` in a gallery phase
    pub fn target(&self, photo: &Photo, time: f32, camera: &CameraView) -> Transform {
        if photo.focused {
            let position = camera.position + camera.forward() * self.focus_distance;
            Transform {
                position,
                rotation: look_at(position, camera.position),
                scale: self.focus_scale,
            }
        } else {
            let bob = (time + photo.id as f32).sin() * BOB_AMPLITUDE;
            Transform {
                position: photo.gallery_position + Vec3::Y * bob,
                rotation: photo.gallery_rotation,
                scale: 1.0,
            }
        }
    }

    /// Ease every photo one frame toward its target for `state`
    pub fn update(&mut self, state: AppState, time: f32, camera: &CameraView) {
        if state.shows_gallery() {
            self.visible = true;
            for i in 0..self.photos.len() {
                let target = self.target(&self.photos[i], time, camera);
                let photo = &mut self.photos[i];
                let rotation_ease = if photo.focused {
                    EASE_ROTATION_FOCUSED
                } else {
                    EASE_ROTATION
                };
                let t = &mut photo.transform;
                t.position = t.position.lerp(target.position, EASE_POSITION);
                t.rotation = t.rotation.slerp(target.rotation, rotation_ease);
                t.scale = ease(t.scale, target.scale, EASE_SCALE);
            }
        } else {
            for photo in &mut self.photos {
                let t = &mut photo.transform;
                t.position = t.position.lerp(Vec3::ZERO, EASE_COLLAPSE);
                t.scale = ease(t.scale, 0.0, EASE_COLLAPSE);
            }
            if self
                .photos
                .first()
                .map_or(true, |p| p.transform.scale < HIDE_SCALE)
            {
                self.visible = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn engine_with(count: u32) -> GalleryEngine {
        let config = GalleryConfig {
            photo_count: count,
            ..GalleryConfig::default()
        };
        let mut engine = GalleryEngine::new(&config);
        for id in 0..count {
            engine.insert(id, PhotoSource::Placeholder, RenderHandle(id as u64));
        }
        engine
    }

    fn settle(engine: &mut GalleryEngine, state: AppState, camera: &CameraView, frames: usize) {
        for _ in 0..frames {
            engine.update(state, 0.0, camera);
        }
    }

    #[test]
    fn test_insert_any_order_and_ignores_duplicates() {
        let mut engine = GalleryEngine::new(&GalleryConfig::default());
        assert!(engine.insert(7, PhotoSource::Placeholder, RenderHandle(1)));
        assert!(engine.insert(2, PhotoSource::Placeholder, RenderHandle(2)));
        assert!(!engine.insert(7, PhotoSource::Placeholder, RenderHandle(3)));
        assert!(!engine.insert(30, PhotoSource::Placeholder, RenderHandle(4)));
        assert_eq!(engine.photos().len(), 2);
        assert_eq!(engine.photo(2).unwrap().handle, RenderHandle(2));
    }

    #[test]
    fn test_single_focus() {
        let mut engine = engine_with(10);
        assert!(engine.focus(5));
        assert!(engine.focus(3));
        let focused: Vec<u32> = engine
            .photos()
            .iter()
            .filter(|p| p.is_focused())
            .map(|p| p.id)
            .collect();
        assert_eq!(focused, vec![3]);
        assert_eq!(engine.focused(), Some(3));

        assert_eq!(engine.unfocus(), Some(3));
        assert!(engine.photos().iter().all(|p| !p.is_focused()));
        assert!(!engine.focus(99));
    }

    #[test]
    fn test_unfocused_settles_on_sphere() {
        let mut engine = engine_with(30);
        let camera = CameraView::default();
        settle(&mut engine, AppState::Gallery, &camera, 400);
        assert!(engine.is_visible());

        for photo in engine.photos() {
            let t = &photo.transform;
            let bob = (photo.id as f32).sin() * BOB_AMPLITUDE;
            let expected = photo.gallery_position + Vec3::Y * bob;
            assert!((t.position - expected).length() < 1e-2);
            assert!((t.scale - 1.0).abs() < 1e-3);
            // faces the centre
            let facing = t.rotation * Vec3::Z;
            assert!(facing.dot(-photo.gallery_position.normalize()) > 0.99);
        }
    }

    #[test]
    fn test_focused_moves_in_front_of_camera() {
        let mut engine = engine_with(30);
        let camera = CameraView::default();
        engine.focus(5);
        settle(&mut engine, AppState::Gallery, &camera, 400);

        let t = engine.photo(5).unwrap().transform;
        assert!((t.position - Vec3::new(0.0, 0.0, 30.0)).length() < 1e-2);
        assert!((t.scale - 3.5).abs() < 1e-3);
        assert!(((t.rotation * Vec3::Z) - Vec3::Z).length() < 1e-2);
    }

    #[test]
    fn test_collapse_hides_group() {
        let mut engine = engine_with(4);
        let camera = CameraView::default();
        settle(&mut engine, AppState::Gallery, &camera, 200);
        assert!(engine.is_visible());

        engine.update(AppState::Forming, 0.0, &camera);
        assert!(engine.is_visible());

        settle(&mut engine, AppState::Forming, &camera, 100);
        assert!(!engine.is_visible());
        for photo in engine.photos() {
            assert!(photo.transform.scale < HIDE_SCALE);
            assert!(photo.transform.position.length() < 0.1);
        }

        engine.update(AppState::Exploding, 0.0, &camera);
        assert!(engine.is_visible());
    }

    #[test]
    fn test_pick_nearest() {
        let mut engine = engine_with(2);
        let camera = CameraView::default();
        engine.visible = true;
        for photo in &mut engine.photos {
            photo.transform.rotation = glam::Quat::IDENTITY;
            photo.transform.scale = 1.0;
        }
        engine.photos[0].transform.position = Vec3::new(0.0, 0.0, 0.0);
        engine.photos[1].transform.position = Vec3::new(0.5, 0.0, 10.0);

        assert_eq!(engine.pick(&camera.ray(Vec2::ZERO)), Some(1));
        assert_eq!(engine.pick(&camera.ray(Vec2::new(0.0, 0.9))), None);
    }

    #[test]
    fn test_pick_ignored_when_hidden() {
        let engine = engine_with(2);
        let camera = CameraView::default();
        assert_eq!(engine.pick(&camera.ray(Vec2::ZERO)), None);
    }
}
