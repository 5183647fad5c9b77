mod rng;
mod silhouette;
mod system;

pub use silhouette::{
    CoverageMask, PointKind, RasterParams, Silhouette, SilhouettePoint, STEED_MASK,
};
pub use system::{FieldMode, ParticleField, ParticleRole, BODY_FRACTION};
