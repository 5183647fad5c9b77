//! Tone cue descriptors

use serde::Serialize;
use std::time::Duration;

/// Oscillator shape of a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
}

/// Short sound played when the scene changes phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneCue {
    /// Played when the silhouette starts forming
    Rising,
    /// Played when the silhouette bursts
    Falling,
}

/// Frequency sweep handed to the synthesis collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    pub duration: Duration,
    /// Peak gain before the exponential fade
    pub gain: f32,
}

impl ToneCue {
    pub fn spec(&self) -> ToneSpec {
        match self {
            Self::Rising => ToneSpec {
                waveform: Waveform::Sine,
                start_hz: 100.0,
                end_hz: 800.0,
                duration: Duration::from_millis(1500),
                gain: 0.5,
            },
            Self::Falling => ToneSpec {
                waveform: Waveform::Triangle,
                start_hz: 200.0,
                end_hz: 50.0,
                duration: Duration::from_millis(500),
                gain: 0.5,
            },
        }
    }
}

impl std::fmt::Display for ToneCue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToneCue::Rising => write!(f, "rising"),
            ToneCue::Falling => write!(f, "falling"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rising_sweeps_up() {
        let spec = ToneCue::Rising.spec();
        assert_eq!(spec.waveform, Waveform::Sine);
        assert!(spec.end_hz > spec.start_hz);
        assert_eq!(spec.duration, Duration::from_millis(1500));
    }

    #[test]
    fn test_falling_sweeps_down() {
        let spec = ToneCue::Falling.spec();
        assert_eq!(spec.waveform, Waveform::Triangle);
        assert!(spec.end_hz < spec.start_hz);
        assert_eq!(spec.duration, Duration::from_millis(500));
    }
}
