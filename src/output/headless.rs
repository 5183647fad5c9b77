//! Frame sink that renders nothing and logs a periodic summary

use super::{FrameOutput, FrameSink};

/// Logs one summary line every `log_every` frames
pub struct HeadlessSink {
    log_every: u64,
    presented: u64,
    uploads: u64,
}

impl HeadlessSink {
    pub fn new(log_every: u64) -> Self {
        Self {
            log_every: log_every.max(1),
            presented: 0,
            uploads: 0,
        }
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Frames whose particle buffer needed uploading
    pub fn uploads(&self) -> u64 {
        self.uploads
    }
}

impl FrameSink for HeadlessSink {
    fn present(&mut self, frame: &FrameOutput<'_>) {
        self.presented += 1;
        if frame.positions_dirty {
            self.uploads += 1;
        }

        if frame.frame % self.log_every == 0 {
            let bloom = frame.effect("Bloom").map(|p| p.params[0]).unwrap_or_default();
            tracing::debug!(
                "frame {} state={} particles={} photos={} visible={} bloom={:.2} auto_rotate={}",
                frame.frame,
                frame.state,
                frame.particle_count(),
                frame.photos.len(),
                frame.gallery_visible,
                bloom,
                frame.auto_rotate
            );
        }
    }
}
