//! Typewriter Reveal
//!
//! Reveals a message one character per tick into a [`RevealSink`], playing a
//! beep for every non-blank character and keeping the avatar talking for the
//! duration of the reveal.
//!
//! # Pacing
//!
//! Steps are driven by `tokio::time::interval`: the first character appears
//! one delay after the reveal starts and each following character one delay
//! after the previous step finished. A step (append, scroll, beep) runs to
//! completion under the session lock before the next tick is awaited, so a
//! cancelled session can never receive another character.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};

use crate::audio::ToneSynthesizer;
use crate::avatar::AvatarAnimator;
use crate::session::{RevealOutcome, RevealSession, RevealStatus};
use crate::sink::RevealSink;

/// Shortest inter-character delay the engine will schedule
const MIN_STEP_DELAY: Duration = Duration::from_millis(1);

/// Drives typewriter reveals
#[derive(Debug)]
pub struct TypewriterEngine {
    animator: AvatarAnimator,
    tone: Arc<ToneSynthesizer>,
    delay: Duration,
}

impl TypewriterEngine {
    /// Create an engine revealing one character every `delay`
    pub fn new(delay: Duration, animator: AvatarAnimator, tone: Arc<ToneSynthesizer>) -> Self {
        Self {
            animator,
            tone,
            delay: delay.max(MIN_STEP_DELAY),
        }
    }

    /// Inter-character delay
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The avatar animated during reveals
    #[must_use]
    pub fn animator(&self) -> &AvatarAnimator {
        &self.animator
    }

    /// The beep generator
    #[must_use]
    pub fn tone(&self) -> &ToneSynthesizer {
        &self.tone
    }

    /// Reveal `text` into `sink` and wait for the result
    ///
    /// Equivalent to [`begin`](Self::begin) followed by [`run`](Self::run).
    pub async fn reveal(&self, text: &str, sink: Arc<dyn RevealSink>) -> RevealOutcome {
        let session = self.begin(text, sink);
        self.run(&session).await
    }

    /// Open a running session and start the avatar talking
    ///
    /// No character is appended until [`run`](Self::run) is awaited.
    pub fn begin(&self, text: &str, sink: Arc<dyn RevealSink>) -> Arc<RevealSession> {
        let session = Arc::new(RevealSession::new(text, sink));
        tracing::info!(session = %session.id(), chars = session.len(), "Reveal started");
        self.animator.start();
        session
    }

    /// Step `session` until it completes or is cancelled
    ///
    /// Dropping the returned future before it resolves cancels the session,
    /// so the avatar never keeps talking for an abandoned reveal.
    pub async fn run(&self, session: &RevealSession) -> RevealOutcome {
        let _guard = AbandonGuard {
            engine: self,
            session,
        };

        let mut ticker = time::interval_at(Instant::now() + self.delay, self.delay);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if let Some(outcome) = self.settle(session) {
                return outcome;
            }

            tokio::select! {
                biased;
                () = session.cancelled() => {}
                _ = ticker.tick() => self.step(session),
            }
        }
    }

    /// Cancel a running session
    ///
    /// Stops the avatar before returning. Returns `false` if the session had
    /// already completed or been cancelled.
    pub fn cancel(&self, session: &RevealSession) -> bool {
        let mut progress = session.lock();
        if progress.status != RevealStatus::Running {
            return false;
        }

        progress.status = RevealStatus::Cancelled;
        self.animator.stop();
        session.signal_cancelled();

        tracing::info!(
            session = %session.id(),
            revealed = progress.cursor,
            "Reveal cancelled"
        );
        true
    }

    /// Reveal the character under the cursor
    fn step(&self, session: &RevealSession) {
        let mut progress = session.lock();
        if progress.status != RevealStatus::Running {
            return;
        }
        let Some(&ch) = session.source_text().get(progress.cursor) else {
            return;
        };

        let sink = session.sink();
        sink.append_char(ch);
        sink.scroll_to_latest();
        if !ch.is_whitespace() {
            self.tone.play_tone();
        }
        progress.cursor += 1;

        tracing::trace!(session = %session.id(), cursor = progress.cursor, "Character revealed");
    }

    /// Complete an exhausted session; returns the outcome once terminal
    fn settle(&self, session: &RevealSession) -> Option<RevealOutcome> {
        let mut progress = session.lock();
        if progress.status == RevealStatus::Running && progress.cursor >= session.len() {
            progress.status = RevealStatus::Completed;
            self.animator.stop();
            tracing::info!(
                session = %session.id(),
                revealed = progress.cursor,
                "Reveal completed"
            );
        }
        progress.outcome()
    }
}

/// Cancels the session if the reveal future is dropped mid-flight
struct AbandonGuard<'a> {
    engine: &'a TypewriterEngine,
    session: &'a RevealSession,
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        if self.engine.cancel(self.session) {
            tracing::debug!(session = %self.session.id(), "Reveal abandoned");
        }
    }
}
