use glam::Vec3;

use super::rng::Xorshift32;
use super::silhouette::Silhouette;

/// Share of particles that trace the silhouette body; the rest form the aura.
pub const BODY_FRACTION: f32 = 0.8;

const EASE_DEFAULT: f32 = 0.08;
const EASE_BURST: f32 = 0.1;

const DRIFT_AMPLITUDE: f32 = 5.0;

const BREATH_DEPTH: f32 = 0.01;
const BODY_JITTER: f32 = 0.05;

const AURA_OFFSET_X: f32 = -2.0;
const AURA_SWAY_X: f32 = 0.5;
const AURA_SWAY_YZ: f32 = 0.2;

const BURST_BODY: f32 = 1.08;
const BURST_AURA: f32 = 1.15;

/// Fixed role of a particle, decided by its index at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleRole {
    Body,
    Aura,
}

/// Which target formula the field steers toward this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    /// Float around the scatter origins
    Drift,
    /// Assemble into the silhouette
    Silhouette,
    /// Push outward from the live positions
    Burst,
}

/// CPU particle field: fixed population, eased toward per-frame targets.
pub struct ParticleField {
    positions: Vec<Vec3>,
    origins: Vec<Vec3>,
    body_count: usize,
    silhouette: Silhouette,
    residual: f32,
    dirty: bool,
}

impl ParticleField {
    /// Create `count` particles scattered uniformly in a cube of edge `extent`.
    pub fn new(count: usize, silhouette: Silhouette, extent: f32, seed: u32) -> Self {
        let mut rng = Xorshift32::new(seed);
        let half = extent / 2.0;
        let origins: Vec<Vec3> = (0..count)
            .map(|_| Vec3::new(rng.centered(half), rng.centered(half), rng.centered(half)))
            .collect();

        Self {
            positions: origins.clone(),
            origins,
            // floor(count * BODY_FRACTION) without float rounding
            body_count: count * 4 / 5,
            silhouette,
            residual: 0.0,
            dirty: true,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn body_count(&self) -> usize {
        self.body_count
    }

    pub fn aura_count(&self) -> usize {
        self.len() - self.body_count
    }

    pub fn role(&self, index: usize) -> ParticleRole {
        if index < self.body_count {
            ParticleRole::Body
        } else {
            ParticleRole::Aura
        }
    }

    pub fn silhouette(&self) -> &Silhouette {
        &self.silhouette
    }

    pub fn position(&self, index: usize) -> Vec3 {
        self.positions[index]
    }

    pub fn origin(&self, index: usize) -> Vec3 {
        self.origins[index]
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Positions as a flat `count * 3` float buffer, ready for upload.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Whether positions changed since the renderer last uploaded them.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_uploaded(&mut self) {
        self.dirty = false;
    }

    /// Mean distance to target measured during the last update.
    pub fn residual(&self) -> f32 {
        self.residual
    }

    /// Target position of particle `index` for `mode` at animation time `time`.
    pub fn target(&self, index: usize, mode: FieldMode, time: f32) -> Vec3 {
        let i = index as f32;
        match mode {
            FieldMode::Drift => {
                let origin = self.origins[index];
                Vec3::new(
                    origin.x + (time * 0.5 + i).sin() * DRIFT_AMPLITUDE,
                    origin.y + (time * 0.3 + i).cos() * DRIFT_AMPLITUDE,
                    origin.z,
                )
            }
            FieldMode::Silhouette => match self.role(index) {
                ParticleRole::Body => {
                    let point = self.silhouette.body_point(index);
                    let breath = 1.0 + (time * 2.0).sin() * BREATH_DEPTH;
                    point * breath
                        + Vec3::new(
                            (time * 3.0 + i).sin(),
                            (time * 2.0 + i).cos(),
                            (time * 4.0 + i).sin(),
                        ) * BODY_JITTER
                }
                ParticleRole::Aura => {
                    let point = self.silhouette.aura_point(index - self.body_count, index);
                    Vec3::new(
                        point.x + AURA_OFFSET_X + (time * 5.0 + i).sin() * AURA_SWAY_X,
                        point.y + (time * 3.0 + i).sin() * AURA_SWAY_YZ,
                        point.z + (time * 4.0 + i).cos() * AURA_SWAY_YZ,
                    )
                }
            },
            FieldMode::Burst => {
                let factor = match self.role(index) {
                    ParticleRole::Body => BURST_BODY,
                    ParticleRole::Aura => BURST_AURA,
                };
                self.positions[index] * factor
            }
        }
    }

    /// Ease every particle one frame toward its target.
    pub fn update(&mut self, mode: FieldMode, time: f32) {
        if self.positions.is_empty() {
            self.residual = 0.0;
            return;
        }

        let ease = match mode {
            FieldMode::Burst => EASE_BURST,
            _ => EASE_DEFAULT,
        };

        let mut distance_sum = 0.0f32;
        for index in 0..self.positions.len() {
            let target = self.target(index, mode, time);
            let p = &mut self.positions[index];
            let delta = target - *p;
            distance_sum += delta.length();
            *p += delta * ease;
        }

        self.residual = distance_sum / self.positions.len() as f32;
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(count: usize) -> ParticleField {
        let silhouette = Silhouette::new(
            vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 0.0, 1.0)],
            vec![Vec3::new(0.0, 5.0, 0.0)],
        );
        ParticleField::new(count, silhouette, 150.0, 1234)
    }

    #[test]
    fn test_role_split() {
        let f = field(10);
        assert_eq!(f.body_count(), 8);
        assert_eq!(f.aura_count(), 2);
        assert_eq!(f.role(7), ParticleRole::Body);
        assert_eq!(f.role(8), ParticleRole::Aura);

        let odd = field(7);
        assert_eq!(odd.body_count(), 5);
    }

    #[test]
    fn test_scatter_within_extent() {
        let f = field(500);
        assert!(f
            .positions()
            .iter()
            .all(|p| p.abs().max_element() <= 75.0));
        assert_eq!(f.positions(), f.origins.as_slice());
    }

    #[test]
    fn test_flat_buffer_layout() {
        let f = field(4);
        let flat = f.positions_flat();
        assert_eq!(flat.len(), 12);
        assert_eq!(flat[3], f.position(1).x);
        assert_eq!(flat[5], f.position(1).z);
    }

    #[test]
    fn test_drift_target_keeps_z() {
        let f = field(4);
        let t = f.target(2, FieldMode::Drift, 3.7);
        let origin = f.origin(2);
        assert_eq!(t.z, origin.z);
        assert!((t.x - origin.x).abs() <= 5.0 + 1e-4);
        assert!((t.y - origin.y).abs() <= 5.0 + 1e-4);
    }

    #[test]
    fn test_body_target_wraps_silhouette_index() {
        let f = field(10);
        // time 0: breath = 1, jitter = (sin i, cos i, sin i) * 0.05
        let t = f.target(3, FieldMode::Silhouette, 0.0);
        let expected = Vec3::new(-4.0, 0.0, 1.0)
            + Vec3::new(3.0f32.sin(), 3.0f32.cos(), 3.0f32.sin()) * 0.05;
        assert!((t - expected).length() < 1e-5);
    }

    #[test]
    fn test_single_body_point_never_panics() {
        let silhouette = Silhouette::new(Vec::new(), Vec::new());
        let f = ParticleField::new(50, silhouette, 10.0, 5);
        for i in 0..50 {
            let t = f.target(i, FieldMode::Silhouette, 1.0);
            assert!(t.is_finite());
            // all targets hug the origin
            assert!(t.length() < 2.0 + 0.5 + 0.3);
        }
    }

    #[test]
    fn test_aura_target_offsets_left() {
        let f = field(10);
        let t = f.target(9, FieldMode::Silhouette, 0.0);
        let i = 9.0f32;
        let expected = Vec3::new(
            -2.0 + i.sin() * 0.5,
            5.0 + i.sin() * 0.2,
            i.cos() * 0.2,
        );
        assert!((t - expected).length() < 1e-5);
    }

    #[test]
    fn test_burst_compounds_outward() {
        let mut f = field(10);
        let start_body = f.position(0).length();
        let start_aura = f.position(9).length();
        for _ in 0..10 {
            f.update(FieldMode::Burst, 0.0);
        }
        // each frame moves 10% of the way to 1.08x / 1.15x the live position
        let body_growth = f.position(0).length() / start_body;
        let aura_growth = f.position(9).length() / start_aura;
        assert!((body_growth - 1.008f32.powi(10)).abs() < 1e-3);
        assert!((aura_growth - 1.015f32.powi(10)).abs() < 1e-3);
        assert!(aura_growth > body_growth);
    }

    #[test]
    fn test_update_eases_and_settles() {
        let mut f = field(20);
        f.mark_uploaded();
        f.update(FieldMode::Silhouette, 0.0);
        assert!(f.is_dirty());
        let first = f.residual();
        for _ in 0..200 {
            f.update(FieldMode::Silhouette, 0.0);
        }
        assert!(f.residual() < first);
        assert!(f.residual() < 0.5);
    }

    #[test]
    fn test_empty_field_updates() {
        let mut f = ParticleField::new(0, Silhouette::new(Vec::new(), Vec::new()), 150.0, 1);
        f.update(FieldMode::Drift, 1.0);
        assert!(f.is_empty());
        assert_eq!(f.residual(), 0.0);
    }
}
