use glam::Vec3;

use super::rng::Xorshift32;

/// Built-in steed silhouette used when no external point source is configured.
/// Any character other than space or `.` counts as ink.
pub const STEED_MASK: &str = r#"
                                            ###
                                          #####
                                        ########
                                     ###########
                                   ############ #
                                 ################
                       ####     ######   #########
                    ##########################  ######
                ##########################     ###
             ##############################
     ###   ################################
    ####  #################################
   #####################################
   ###  ###############################
         ##############################
         ########           ##########
        #######              ##### ####
       ######                ####   ####
      #####                  ####     ###
     ####                    ###       ###
    ###                     ###         ###
   ###                     ###           ##
  ###                     ####           ###
 ####                    #####          ####
"#;

/// Which part of the silhouette a point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    Body,
    Aura,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilhouettePoint {
    pub position: Vec3,
    pub kind: PointKind,
}

/// Binary ink coverage grid, row-major, origin top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl CoverageMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Parse a text mask, expanding every character into a `cell_size` square.
    pub fn from_text(text: &str, cell_size: usize) -> Self {
        let cell_size = cell_size.max(1);
        let rows: Vec<&str> = text.trim_matches('\n').lines().collect();
        let cols = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);

        let mut mask = Self::new(cols * cell_size, rows.len() * cell_size);
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch == ' ' || ch == '.' {
                    continue;
                }
                for dy in 0..cell_size {
                    for dx in 0..cell_size {
                        mask.set(col * cell_size + dx, row * cell_size + dy, true);
                    }
                }
            }
        }
        mask
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set(&mut self, x: usize, y: usize, ink: bool) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = ink;
        }
    }

    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    pub fn ink_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

/// Rasterization parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterParams {
    /// World units per mask pixel
    pub scale: f32,
    /// Sample every `step` pixels on both axes
    pub step: usize,
    /// Total z spread of body points
    pub depth: f32,
    /// Chance an ink sample also seeds an aura point
    pub aura_probability: f32,
    /// Total per-axis spread of the one-time body jitter
    pub jitter: f32,
}

impl Default for RasterParams {
    fn default() -> Self {
        Self {
            scale: 0.14,
            step: 2,
            depth: 6.0,
            aura_probability: 0.1,
            jitter: 0.2,
        }
    }
}

/// Immutable silhouette point cloud: body points and aura points.
///
/// The body set is never empty, so `index % body_len()` is always defined.
#[derive(Debug, Clone, PartialEq)]
pub struct Silhouette {
    body: Vec<Vec3>,
    aura: Vec<Vec3>,
}

impl Silhouette {
    pub fn new(body: Vec<Vec3>, aura: Vec<Vec3>) -> Self {
        let body = if body.is_empty() {
            tracing::warn!("Silhouette has no body points, using a single point at the origin");
            vec![Vec3::ZERO]
        } else {
            body
        };
        Self { body, aura }
    }

    pub fn from_points(points: impl IntoIterator<Item = SilhouettePoint>) -> Self {
        let mut body = Vec::new();
        let mut aura = Vec::new();
        for p in points {
            match p.kind {
                PointKind::Body => body.push(p.position),
                PointKind::Aura => aura.push(p.position),
            }
        }
        Self::new(body, aura)
    }

    /// Turn ink coverage into body/aura points centred on the mask middle.
    pub fn rasterize(mask: &CoverageMask, params: &RasterParams, seed: u32) -> Self {
        let mut rng = Xorshift32::new(seed);
        let step = params.step.max(1);
        let half_w = mask.width() as f32 / 2.0;
        let half_h = mask.height() as f32 / 2.0;

        let mut body = Vec::new();
        let mut aura = Vec::new();
        for y in (0..mask.height()).step_by(step) {
            for x in (0..mask.width()).step_by(step) {
                if !mask.is_ink(x, y) {
                    continue;
                }
                let px = (x as f32 - half_w) * params.scale;
                let py = -(y as f32 - half_h) * params.scale;
                let pz = rng.centered(params.depth / 2.0);
                body.push(Vec3::new(px, py, pz));
                if rng.next_f32() < params.aura_probability {
                    aura.push(Vec3::new(px, py, 0.0));
                }
            }
        }

        let half_jitter = params.jitter / 2.0;
        for p in &mut body {
            *p += Vec3::new(
                rng.centered(half_jitter),
                rng.centered(half_jitter),
                rng.centered(half_jitter),
            );
        }

        tracing::debug!(
            "Rasterized silhouette: {} body points, {} aura points",
            body.len(),
            aura.len()
        );
        Self::new(body, aura)
    }

    /// The bundled steed shape.
    pub fn steed(cell_size: usize, params: &RasterParams, seed: u32) -> Self {
        Self::rasterize(&CoverageMask::from_text(STEED_MASK, cell_size), params, seed)
    }

    pub fn body(&self) -> &[Vec3] {
        &self.body
    }

    pub fn aura(&self) -> &[Vec3] {
        &self.aura
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    pub fn aura_len(&self) -> usize {
        self.aura.len()
    }

    pub fn body_point(&self, index: usize) -> Vec3 {
        self.body[index % self.body.len()]
    }

    /// Aura point for the `slot`-th aura particle, reusing a body point when
    /// the source produced no aura.
    pub fn aura_point(&self, slot: usize, particle_index: usize) -> Vec3 {
        if self.aura.is_empty() {
            self.body_point(particle_index)
        } else {
            self.aura[slot % self.aura.len()]
        }
    }

    pub fn points(&self) -> impl Iterator<Item = SilhouettePoint> + '_ {
        let body = self.body.iter().map(|&position| SilhouettePoint {
            position,
            kind: PointKind::Body,
        });
        let aura = self.aura.iter().map(|&position| SilhouettePoint {
            position,
            kind: PointKind::Aura,
        });
        body.chain(aura)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_from_text() {
        let mask = CoverageMask::from_text("#.\n ##", 2);
        assert_eq!(mask.width(), 6);
        assert_eq!(mask.height(), 4);
        assert!(mask.is_ink(0, 0));
        assert!(mask.is_ink(1, 1));
        assert!(!mask.is_ink(2, 0));
        assert!(mask.is_ink(2, 2));
        assert!(mask.is_ink(5, 3));
        assert_eq!(mask.ink_count(), 12);
    }

    #[test]
    fn test_empty_body_gets_origin() {
        let s = Silhouette::new(Vec::new(), Vec::new());
        assert_eq!(s.body_len(), 1);
        assert_eq!(s.body_point(12345), Vec3::ZERO);
    }

    #[test]
    fn test_aura_falls_back_to_body() {
        let s = Silhouette::new(vec![Vec3::X, Vec3::Y], Vec::new());
        assert_eq!(s.aura_point(0, 3), Vec3::Y);
        assert_eq!(s.aura_point(7, 4), Vec3::X);
    }

    #[test]
    fn test_rasterize_centres_and_flips_y() {
        let mut mask = CoverageMask::new(4, 4);
        mask.set(0, 0, true);
        let params = RasterParams {
            scale: 1.0,
            step: 1,
            depth: 0.0,
            aura_probability: 1.0,
            jitter: 0.0,
        };
        let s = Silhouette::rasterize(&mask, &params, 7);
        assert_eq!(s.body_len(), 1);
        assert_eq!(s.aura_len(), 1);
        let p = s.body()[0];
        assert!((p.x + 2.0).abs() < 1e-6);
        assert!((p.y - 2.0).abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
        assert_eq!(s.aura()[0], Vec3::new(-2.0, 2.0, 0.0));
    }

    #[test]
    fn test_rasterize_respects_step_and_depth() {
        let mut mask = CoverageMask::new(10, 10);
        for y in 0..10 {
            for x in 0..10 {
                mask.set(x, y, true);
            }
        }
        let params = RasterParams {
            step: 2,
            aura_probability: 0.0,
            ..RasterParams::default()
        };
        let s = Silhouette::rasterize(&mask, &params, 99);
        assert_eq!(s.body_len(), 25);
        assert_eq!(s.aura_len(), 0);
        // depth 6 plus jitter 0.2 bounds z within +-3.1
        assert!(s.body().iter().all(|p| p.z.abs() <= 3.1 + 1e-4));
    }

    #[test]
    fn test_steed_mask_has_points() {
        let s = Silhouette::steed(4, &RasterParams::default(), 1);
        assert!(s.body_len() > 500);
        assert!(s.aura_len() > 0);
        assert!(s.aura_len() < s.body_len());
    }

    #[test]
    fn test_points_round_trip_kinds() {
        let s = Silhouette::new(vec![Vec3::X], vec![Vec3::Z]);
        let rebuilt = Silhouette::from_points(s.points());
        assert_eq!(rebuilt, s);
    }
}
