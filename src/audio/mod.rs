//! Audio cue module
//!
//! The scene only decides which cue plays and when; synthesis belongs to an
//! [`AudioSink`] implementation.

pub mod cue;

pub use cue::{ToneCue, ToneSpec, Waveform};

/// Receives cues that survived the mute gate
pub trait AudioSink: Send {
    fn play(&mut self, cue: ToneCue, spec: &ToneSpec);
}

/// Sink that only records cues in the log
#[derive(Debug, Default)]
pub struct LogAudioSink;

impl AudioSink for LogAudioSink {
    fn play(&mut self, cue: ToneCue, spec: &ToneSpec) {
        tracing::debug!(
            "Cue {}: {:?} {}Hz -> {}Hz over {:?}",
            cue,
            spec.waveform,
            spec.start_hz,
            spec.end_hz,
            spec.duration
        );
    }
}

/// Gates cues behind a mute flag. Starts muted.
pub struct CuePlayer {
    sink: Box<dyn AudioSink>,
    muted: bool,
    played: u64,
}

impl CuePlayer {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            muted: true,
            played: 0,
        }
    }

    /// Play a cue unless muted. Returns whether the cue reached the sink.
    pub fn play(&mut self, cue: ToneCue) -> bool {
        if self.muted {
            tracing::trace!("Cue {} dropped (muted)", cue);
            return false;
        }
        self.sink.play(cue, &cue.spec());
        self.played += 1;
        true
    }

    /// Flip the mute flag and return the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        tracing::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Number of cues delivered to the sink
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl Default for CuePlayer {
    fn default() -> Self {
        Self::new(Box::new(LogAudioSink))
    }
}
