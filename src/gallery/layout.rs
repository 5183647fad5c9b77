//! Sphere layout and orientation helpers

use glam::{Mat3, Quat, Vec3};

/// Golden angle in radians
const GOLDEN_ANGLE: f32 = std::f32::consts::PI * 0.763_932; // PI * (3 - sqrt 5)

/// Evenly spread `count` points over a sphere of `radius` (Fibonacci lattice).
///
/// Point 0 sits at the north pole and the last point at the south pole.
pub fn sphere_positions(count: usize, radius: f32) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let y = if count > 1 {
                1.0 - (i as f32 / (count - 1) as f32) * 2.0
            } else {
                0.0
            };
            let ring = (1.0 - y * y).max(0.0).sqrt();
            let theta = GOLDEN_ANGLE * i as f32;
            Vec3::new(theta.cos() * ring, y, theta.sin() * ring) * radius
        })
        .collect()
}

/// Rotation whose local +Z axis points from `from` toward `target`.
pub fn look_at(from: Vec3, target: Vec3) -> Quat {
    let forward = (target - from).normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    // Up fallback for the poles, where world Y is parallel to the view
    let up = if forward.cross(Vec3::Y).length_squared() < 1e-8 {
        Vec3::Z
    } else {
        Vec3::Y
    };

    let right = up.cross(forward).normalize();
    let true_up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, true_up, forward)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_golden_angle() {
        let expected = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
        assert!((GOLDEN_ANGLE - expected).abs() < 1e-5);
    }

    #[test]
    fn test_points_on_sphere() {
        let points = sphere_positions(30, 25.0);
        assert_eq!(points.len(), 30);
        for p in &points {
            assert!((p.length() - 25.0).abs() < 1e-3);
        }
        assert!((points[0] - Vec3::new(0.0, 25.0, 0.0)).length() < 1e-3);
        assert!((points[29].y + 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_no_two_share_direction() {
        let points = sphere_positions(30, 1.0);
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!(a.normalize().dot(b.normalize()) < 0.999);
            }
        }
    }

    #[test]
    fn test_single_point_on_equator() {
        let points = sphere_positions(1, 10.0);
        assert_eq!(points.len(), 1);
        assert!((points[0] - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
        assert!(sphere_positions(0, 10.0).is_empty());
    }

    #[test]
    fn test_look_at_faces_target() {
        let from = Vec3::new(3.0, -4.0, 12.0);
        let q = look_at(from, Vec3::ZERO);
        let facing = q * Vec3::Z;
        assert!((facing - (-from).normalize()).length() < 1e-4);
    }

    #[test]
    fn test_look_at_poles() {
        let q = look_at(Vec3::new(0.0, 25.0, 0.0), Vec3::ZERO);
        assert!(((q * Vec3::Z) - Vec3::NEG_Y).length() < 1e-4);
        assert!(q.is_finite());
        assert_eq!(look_at(Vec3::ONE, Vec3::ONE), Quat::IDENTITY);
    }
}
