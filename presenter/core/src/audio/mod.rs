//! Tone Synthesis
//!
//! One short square-wave beep per revealed character. The synthesizer wraps an
//! optional [`AudioCapability`]; when the capability could not be opened, or
//! a single beep fails, the failure is logged and dropped so text reveal and
//! avatar animation carry on unaffected.

mod waveform;

pub use waveform::ToneWaveform;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Errors reported by an audio capability
#[derive(Debug, Error)]
pub enum AudioError {
    /// The output device could not be opened
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    /// A single tone could not be played
    #[error("tone playback failed: {0}")]
    Playback(String),

    /// The tone parameters cannot be rendered
    #[error("invalid tone: {0}")]
    InvalidTone(String),
}

/// Parameters of one beep
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneSpec {
    /// Square wave frequency
    pub frequency_hz: f32,
    /// Gain at onset
    pub start_volume: f32,
    /// Gain reached at the end of the exponential decay
    pub end_volume: f32,
    /// Tone length; silent afterwards
    pub duration: Duration,
}

impl ToneSpec {
    /// Check that the tone can be rendered
    ///
    /// Exponential ramps need strictly positive endpoints, so both volumes
    /// must lie in `(0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::InvalidTone`] describing the offending field.
    pub fn validate(&self) -> Result<(), AudioError> {
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return Err(AudioError::InvalidTone(format!(
                "frequency must be positive, got {}",
                self.frequency_hz
            )));
        }
        for (label, volume) in [("start", self.start_volume), ("end", self.end_volume)] {
            if !volume.is_finite() || volume <= 0.0 || volume > 1.0 {
                return Err(AudioError::InvalidTone(format!(
                    "{label} volume must be in (0, 1], got {volume}"
                )));
            }
        }
        if self.duration.is_zero() {
            return Err(AudioError::InvalidTone(
                "duration must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// A device that can emit one tone
///
/// Implementations must return quickly: the call is made from inside a reveal
/// step. Playback itself should continue in the background.
pub trait AudioCapability: Send + Sync {
    /// Start playing `tone`
    ///
    /// # Errors
    ///
    /// Returns an [`AudioError`] if the tone could not be started.
    fn emit_tone(&self, tone: &ToneSpec) -> Result<(), AudioError>;
}

/// Best-effort beep generator
///
/// Cheap to share behind an `Arc`; every [`play_tone`](Self::play_tone) call
/// is independent of the others.
pub struct ToneSynthesizer {
    backend: Option<Arc<dyn AudioCapability>>,
    tone: ToneSpec,
}

impl ToneSynthesizer {
    /// Open a capability with `open`, degrading to silence if it fails
    pub fn new<F>(tone: ToneSpec, open: F) -> Self
    where
        F: FnOnce() -> Result<Arc<dyn AudioCapability>, AudioError>,
    {
        match open() {
            Ok(backend) => Self::with_capability(tone, backend),
            Err(e) => {
                tracing::debug!(error = %e, "Audio unavailable, tones disabled");
                Self::silent(tone)
            }
        }
    }

    /// Use an already opened capability
    pub fn with_capability(tone: ToneSpec, backend: Arc<dyn AudioCapability>) -> Self {
        Self {
            backend: Some(backend),
            tone,
        }
    }

    /// A synthesizer that never makes a sound
    #[must_use]
    pub fn silent(tone: ToneSpec) -> Self {
        Self {
            backend: None,
            tone,
        }
    }

    /// Whether a capability is attached
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// The tone played on every call
    #[must_use]
    pub fn tone(&self) -> &ToneSpec {
        &self.tone
    }

    /// Play one beep, swallowing any failure
    pub fn play_tone(&self) {
        let Some(backend) = &self.backend else {
            return;
        };

        if let Err(e) = backend.emit_tone(&self.tone) {
            tracing::debug!(error = %e, "Tone dropped");
        }
    }
}

impl std::fmt::Debug for ToneSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToneSynthesizer")
            .field("available", &self.is_available())
            .field("tone", &self.tone)
            .finish()
    }
}
