//! Square-wave beep samples
//!
//! Renders a [`ToneSpec`] as mono `f32` samples: a square wave whose gain
//! decays exponentially from the start volume to the end volume over the tone
//! duration, `g(t) = v0 * (v1 / v0)^(t / T)`.

use super::ToneSpec;

/// Finite iterator over the samples of one beep
#[derive(Clone, Debug)]
pub struct ToneWaveform {
    tone: ToneSpec,
    sample_rate: u32,
    index: u64,
    total: u64,
}

impl ToneWaveform {
    /// Render `tone` at `sample_rate` samples per second
    ///
    /// The tone should already be validated; non-positive volumes produce
    /// silence rather than NaN samples.
    #[must_use]
    pub fn new(tone: ToneSpec, sample_rate: u32) -> Self {
        let total = (tone.duration.as_secs_f64() * f64::from(sample_rate)).round() as u64;
        Self {
            tone,
            sample_rate,
            index: 0,
            total,
        }
    }

    /// Samples per second
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total number of samples in the tone
    #[must_use]
    pub fn total_samples(&self) -> u64 {
        self.total
    }

    /// Gain at `t` seconds into the tone
    #[must_use]
    pub fn gain_at(&self, t: f64) -> f32 {
        let start = f64::from(self.tone.start_volume);
        let end = f64::from(self.tone.end_volume);
        if start <= 0.0 || end <= 0.0 {
            return 0.0;
        }

        let duration = self.tone.duration.as_secs_f64();
        let progress = (t / duration).clamp(0.0, 1.0);
        (start * (end / start).powf(progress)) as f32
    }
}

impl Iterator for ToneWaveform {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.total {
            return None;
        }

        let t = self.index as f64 / f64::from(self.sample_rate);
        let phase = (t * f64::from(self.tone.frequency_hz)).fract();
        let level = if phase < 0.5 { 1.0 } else { -1.0 };
        self.index += 1;

        Some(level * self.gain_at(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.total - self.index).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}
