//! Presentation Controller
//!
//! Serializes reveal requests from the chat flow. At most one reveal runs at
//! a time; a new request cancels the running one and starts immediately
//! (last writer wins, nothing is queued).
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use presenter_core::{
//!     AvatarAnimator, PresentationController, TimingConfig, ToneSynthesizer, TranscriptSink,
//! };
//!
//! let timing = TimingConfig::default();
//! let animator = AvatarAnimator::new(display, timing.mouth_toggle_interval);
//! let tone = ToneSynthesizer::silent(timing.tone());
//! let controller = PresentationController::from_parts(&timing, animator, tone);
//!
//! let sink = Arc::new(TranscriptSink::new());
//! let outcome = controller.present("Hello!", sink.clone()).await;
//! assert!(outcome.is_completed());
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use crate::audio::ToneSynthesizer;
use crate::avatar::AvatarAnimator;
use crate::config::TimingConfig;
use crate::session::{RevealOutcome, RevealSession, SessionId};
use crate::sink::RevealSink;
use crate::typewriter::TypewriterEngine;

/// Owner of the single active reveal
#[derive(Debug)]
pub struct PresentationController {
    engine: TypewriterEngine,
    active: Mutex<Option<Arc<RevealSession>>>,
}

impl PresentationController {
    /// Create a controller around an engine
    pub fn new(engine: TypewriterEngine) -> Self {
        Self {
            engine,
            active: Mutex::new(None),
        }
    }

    /// Wire an engine from timing values and its collaborators
    pub fn from_parts(
        timing: &TimingConfig,
        animator: AvatarAnimator,
        tone: ToneSynthesizer,
    ) -> Self {
        Self::new(TypewriterEngine::new(
            timing.inter_character_delay,
            animator,
            Arc::new(tone),
        ))
    }

    /// The engine driving reveals
    #[must_use]
    pub fn engine(&self) -> &TypewriterEngine {
        &self.engine
    }

    /// Reveal `text` into `sink`, superseding any running reveal
    ///
    /// Resolves exactly once: [`RevealOutcome::Completed`] when every
    /// character was appended, [`RevealOutcome::Cancelled`] when a later
    /// `present` or [`interrupt`](Self::interrupt) superseded this one.
    pub async fn present(&self, text: &str, sink: Arc<dyn RevealSink>) -> RevealOutcome {
        let session = {
            let mut active = self.active.lock();
            if let Some(previous) = active.take() {
                if self.engine.cancel(&previous) {
                    tracing::info!(session = %previous.id(), "Reveal superseded");
                }
            }
            let session = self.engine.begin(text, sink);
            *active = Some(Arc::clone(&session));
            session
        };

        let outcome = self.engine.run(&session).await;

        let mut active = self.active.lock();
        if active.as_ref().is_some_and(|s| s.id() == session.id()) {
            *active = None;
        }
        outcome
    }

    /// Cancel the running reveal without starting another
    ///
    /// Returns `true` if a reveal was cancelled.
    pub fn interrupt(&self) -> bool {
        let Some(session) = self.active.lock().take() else {
            return false;
        };
        self.engine.cancel(&session)
    }

    /// Whether a reveal is currently running
    #[must_use]
    pub fn is_presenting(&self) -> bool {
        self.active
            .lock()
            .as_ref()
            .is_some_and(|s| !s.status().is_terminal())
    }

    /// Identifier of the running reveal, if any
    #[must_use]
    pub fn active_session(&self) -> Option<SessionId> {
        self.active
            .lock()
            .as_ref()
            .filter(|s| !s.status().is_terminal())
            .map(|s| s.id())
    }
}
