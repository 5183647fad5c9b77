//! Photo asset resolution

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use super::photo::PhotoSource;
use crate::config::GalleryConfig;
use crate::error::AssetError;

/// Recognized image extensions (lowercase)
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// A photo slot whose image is ready
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPhoto {
    pub id: u32,
    pub source: PhotoSource,
}

/// Resolves gallery slots to image sources.
///
/// Every slot resolves independently; a failed slot is logged and skipped
/// without affecting the others.
#[derive(Debug, Clone)]
pub struct PhotoAssets {
    photo_dir: Option<PathBuf>,
    count: u32,
}

impl PhotoAssets {
    pub fn new(config: &GalleryConfig) -> Self {
        let photo_dir = config.photo_dir.as_ref().map(|dir| {
            if dir.is_absolute() {
                dir.clone()
            } else {
                std::env::current_dir().unwrap_or_default().join(dir)
            }
        });

        Self {
            photo_dir,
            count: config.photo_count,
        }
    }

    pub fn photo_dir(&self) -> Option<&Path> {
        self.photo_dir.as_deref()
    }

    /// Image files in the photo directory, sorted by name
    pub async fn scan(dir: &Path) -> Result<Vec<PathBuf>, AssetError> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| AssetError::Directory(format!("{}: {}", dir.display(), e)))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AssetError::Directory(format!("{}: {}", dir.display(), e)))?
        {
            let path = entry.path();
            if is_image(&path) {
                files.push(path);
            }
        }
        files.sort();

        tracing::debug!("Found {} images in {}", files.len(), dir.display());
        Ok(files)
    }

    /// Resolve one slot against the scanned file list
    pub async fn resolve_slot(id: u32, files: &[PathBuf]) -> Result<ResolvedPhoto, AssetError> {
        let path = files.get(id as usize).ok_or(AssetError::Missing(id))?;

        let metadata = tokio::fs::metadata(path).await.map_err(|e| AssetError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if metadata.len() == 0 {
            return Err(AssetError::Unreadable {
                path: path.display().to_string(),
                message: "empty file".to_string(),
            });
        }
        // Confirm the bytes are actually readable, not just listed
        tokio::fs::File::open(path)
            .await
            .map_err(|e| AssetError::Unreadable {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(ResolvedPhoto {
            id,
            source: PhotoSource::File(path.clone()),
        })
    }

    /// Resolve every slot concurrently, sending each success as it completes.
    /// Returns the number of photos delivered.
    pub async fn resolve_all(self, tx: mpsc::Sender<ResolvedPhoto>) -> usize {
        let files = match &self.photo_dir {
            None => None,
            Some(dir) => match Self::scan(dir).await {
                Ok(files) => Some(Arc::new(files)),
                Err(e) => {
                    tracing::warn!("{}", e);
                    return 0;
                }
            },
        };

        let mut tasks = JoinSet::new();
        for id in 0..self.count {
            let files = files.clone();
            tasks.spawn(async move {
                match files {
                    Some(files) => Self::resolve_slot(id, &files).await,
                    None => Ok(ResolvedPhoto {
                        id,
                        source: PhotoSource::Placeholder,
                    }),
                }
            });
        }

        let mut delivered = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(photo)) => {
                    if tx.send(photo).await.is_err() {
                        tracing::debug!("Photo receiver closed, stopping asset resolution");
                        tasks.abort_all();
                        break;
                    }
                    delivered += 1;
                }
                Ok(Err(e)) => tracing::warn!("Skipping photo: {}", e),
                Err(e) => tracing::error!("Photo task failed: {}", e),
            }
        }

        tracing::info!("Resolved {} of {} photos", delivered, self.count);
        delivered
    }
}

fn is_image(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
}
