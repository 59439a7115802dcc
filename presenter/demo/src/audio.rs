//! Default output device beeps through rodio
//!
//! The rodio output stream is not `Send`, so it lives on its own thread for
//! as long as the [`RodioAudio`] handle exists; tones are queued on the
//! stream's mixer through the thread-safe handle.

use std::sync::mpsc;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamHandle, Source};

use presenter_core::{AudioCapability, AudioError, ToneSpec, ToneWaveform};

const SAMPLE_RATE: u32 = 44_100;

/// Audio capability backed by the default output device
pub struct RodioAudio {
    handle: OutputStreamHandle,
    _keepalive: mpsc::Sender<()>,
}

impl RodioAudio {
    /// Open the default output device
    pub fn open() -> Result<Self, AudioError> {
        let (ready_tx, ready_rx) = mpsc::channel();
        let (keepalive_tx, keepalive_rx) = mpsc::channel::<()>();

        std::thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || match OutputStream::try_default() {
                Ok((stream, handle)) => {
                    let _ = ready_tx.send(Ok(handle));
                    // Returns once the RodioAudio handle is dropped
                    let _ = keepalive_rx.recv();
                    drop(stream);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(AudioError::Unavailable(e.to_string())));
                }
            })
            .map_err(|e| AudioError::Unavailable(e.to_string()))?;

        let handle = ready_rx
            .recv()
            .map_err(|e| AudioError::Unavailable(e.to_string()))??;

        tracing::debug!(sample_rate = SAMPLE_RATE, "Audio output opened");
        Ok(Self {
            handle,
            _keepalive: keepalive_tx,
        })
    }
}

impl AudioCapability for RodioAudio {
    fn emit_tone(&self, tone: &ToneSpec) -> Result<(), AudioError> {
        tone.validate()?;
        self.handle
            .play_raw(Beep(ToneWaveform::new(*tone, SAMPLE_RATE)))
            .map_err(|e| AudioError::Playback(e.to_string()))
    }
}

/// One beep as a rodio source
struct Beep(ToneWaveform);

impl Iterator for Beep {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        self.0.next()
    }
}

impl Source for Beep {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.0.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f64(
            self.0.total_samples() as f64 / f64::from(self.0.sample_rate()),
        ))
    }
}
