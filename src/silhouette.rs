//! Silhouette point source selection

use serde::Deserialize;
use std::path::Path;

use glam::Vec3;
use steedfield_fx::particles::{CoverageMask, RasterParams, Silhouette};

use crate::config::Config;
use crate::error::{SilhouetteError, SteedfieldError};

/// Precomputed point file layout
#[derive(Debug, Deserialize)]
struct PointFile {
    body: Vec<[f32; 3]>,
    #[serde(default)]
    aura: Vec<[f32; 3]>,
}

/// Raster parameters derived from configuration
pub fn raster_params(config: &Config) -> RasterParams {
    RasterParams {
        scale: config.silhouette.scale,
        step: config.silhouette_step(),
        depth: config.silhouette.depth,
        aura_probability: config.silhouette.aura_probability,
        jitter: config.silhouette.jitter,
    }
}

/// Build the silhouette named by the configuration.
///
/// A `.json` source is read as precomputed points, any other file as a text
/// mask, and no source selects the built-in steed.
pub fn load(config: &Config) -> Result<Silhouette, SteedfieldError> {
    let params = raster_params(config);
    let seed = config.particles.seed;

    let silhouette = match &config.silhouette.source {
        None => Silhouette::steed(config.silhouette.cell_size, &params, seed),
        Some(path) if is_json(path) => from_json(&read(path)?)?,
        Some(path) => {
            let mask = CoverageMask::from_text(&read(path)?, config.silhouette.cell_size);
            Silhouette::rasterize(&mask, &params, seed)
        }
    };

    tracing::info!(
        "Silhouette ready: {} body points, {} aura points",
        silhouette.body_len(),
        silhouette.aura_len()
    );
    Ok(silhouette)
}

/// Parse `{"body": [[x,y,z],...], "aura": [...]}`
pub fn from_json(json: &str) -> Result<Silhouette, SteedfieldError> {
    let file: PointFile =
        serde_json::from_str(json).map_err(|e| SilhouetteError::Parse(e.to_string()))?;
    let to_vec = |points: Vec<[f32; 3]>| -> Vec<Vec3> {
        points.into_iter().map(Vec3::from_array).collect()
    };
    Ok(Silhouette::new(to_vec(file.body), to_vec(file.aura)))
}

fn read(path: &Path) -> Result<String, SteedfieldError> {
    std::fs::read_to_string(path)
        .map_err(|e| SilhouetteError::ReadFile(format!("{}: {}", path.display(), e)).into())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_steed() {
        let silhouette = load(&Config::default()).unwrap();
        assert!(silhouette.body_len() > 100);
        assert!(silhouette.aura_len() > 0);
        assert!(silhouette.body_len() > silhouette.aura_len());
    }

    #[test]
    fn test_constrained_tier_samples_fewer_points() {
        let desktop = load(&Config::default()).unwrap();
        let mut config = Config::default();
        config.device.tier = crate::config::DeviceTier::Constrained;
        let constrained = load(&config).unwrap();
        assert!(constrained.body_len() < desktop.body_len());
    }

    #[test]
    fn test_json_points() {
        let silhouette =
            from_json(r#"{"body": [[1, 2, 3], [4, 5, 6]], "aura": [[0, 1, 0]]}"#).unwrap();
        assert_eq!(silhouette.body(), &[Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
        assert_eq!(silhouette.aura_len(), 1);
    }

    #[test]
    fn test_json_empty_body_falls_back() {
        let silhouette = from_json(r#"{"body": []}"#).unwrap();
        assert_eq!(silhouette.body(), &[Vec3::ZERO]);
        assert_eq!(silhouette.aura_len(), 0);
    }

    #[test]
    fn test_text_mask_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "##..").unwrap();
        writeln!(file, "##..").unwrap();

        let mut config = Config::default();
        config.silhouette.source = Some(file.path().to_path_buf());
        config.silhouette.cell_size = 2;
        config.silhouette.step = Some(1);
        let silhouette = load(&config).unwrap();
        // 2x2 ink characters, each 2x2 pixels
        assert_eq!(silhouette.body_len(), 16);
    }

    #[test]
    fn test_missing_source() {
        let mut config = Config::default();
        config.silhouette.source = Some("/nonexistent/steed.json".into());
        assert!(matches!(
            load(&config),
            Err(SteedfieldError::Silhouette(SilhouetteError::ReadFile(_)))
        ));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            from_json("{\"aura\": []}"),
            Err(SteedfieldError::Silhouette(SilhouetteError::Parse(_)))
        ));
    }
}
