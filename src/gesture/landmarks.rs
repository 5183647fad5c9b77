//! Normalized hand landmark geometry

use glam::{Vec2, Vec3};

/// Number of landmarks in a full hand
pub const HAND_LANDMARKS: usize = 21;

pub const WRIST: usize = 0;

/// Index, middle, ring and pinky fingertips
pub const FINGERTIPS: [usize; 4] = [8, 12, 16, 20];

/// One hand's landmarks in normalized image coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: Vec<Vec3>,
}

impl HandLandmarks {
    /// Validate a raw landmark set. Short or non-finite sets are treated as
    /// no hand at all.
    pub fn from_points(points: &[[f32; 3]]) -> Option<Self> {
        if points.len() < HAND_LANDMARKS {
            return None;
        }
        let points: Vec<Vec3> = points.iter().map(|p| Vec3::from_array(*p)).collect();
        if !points.iter().all(|p| p.is_finite()) {
            return None;
        }
        Some(Self { points })
    }

    pub fn wrist(&self) -> Vec3 {
        self.points[WRIST]
    }

    pub fn point(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    /// Mean fingertip-to-wrist distance in the image plane
    pub fn average_tip_distance(&self) -> f32 {
        let wrist = self.wrist().truncate();
        let sum: f32 = FINGERTIPS
            .iter()
            .map(|&i| self.points[i].truncate().distance(wrist))
            .sum();
        sum / FINGERTIPS.len() as f32
    }

    /// Fingertip positions projected to the image plane
    pub fn tips_2d(&self) -> [Vec2; 4] {
        FINGERTIPS.map(|i| self.points[i].truncate())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Hand with every fingertip `distance` away from the wrist at (0.5, 0.5)
    pub fn hand_with_spread(distance: f32) -> Vec<[f32; 3]> {
        let mut points = vec![[0.5, 0.5, 0.0]; HAND_LANDMARKS];
        for (n, &tip) in FINGERTIPS.iter().enumerate() {
            let angle = std::f32::consts::FRAC_PI_2 + (n as f32 - 1.5) * 0.3;
            points[tip] = [
                0.5 + angle.cos() * distance,
                0.5 - angle.sin() * distance,
                // depth never contributes
                -0.3,
            ];
        }
        points
    }
}
