//! Photo gallery
//!
//! Photos sit on a Fibonacci sphere facing its center. In the exploding and
//! gallery phases they ease onto their slots (or in front of the camera when
//! focused); otherwise they collapse to the origin and the group hides.

pub mod assets;
pub mod camera;
pub mod engine;
pub mod layout;
pub mod photo;

pub use assets::{PhotoAssets, ResolvedPhoto};
pub use camera::{CameraView, Ray};
pub use engine::GalleryEngine;
pub use layout::{look_at, sphere_positions};
pub use photo::{Photo, PhotoSource, RenderHandle, Transform};
