//! Reveal Sessions
//!
//! A [`RevealSession`] is the progress state of one typewriter reveal: the
//! source text, how far the cursor has got, the sink it writes into, and its
//! lifecycle status. The status is the single source of truth for whether a
//! step may still act; the cancellation token only wakes a waiting reveal.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

use crate::sink::RevealSink;

/// Reveal session identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Generate a new process-unique session ID
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};

        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Numeric value
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "reveal-{}", self.0)
    }
}

/// Lifecycle status of a reveal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealStatus {
    /// Characters are still being revealed
    Running,
    /// Every character was appended
    Completed,
    /// Superseded or abandoned before the end
    Cancelled,
}

impl RevealStatus {
    /// Whether the session has finished, either way
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// How a reveal ended
///
/// Cancellation is a normal outcome, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The whole text was revealed
    Completed {
        /// Characters appended
        revealed: usize,
    },
    /// The reveal was cancelled
    Cancelled {
        /// Characters appended before cancellation
        revealed: usize,
    },
}

impl RevealOutcome {
    /// Whether the reveal ran to the end
    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Whether the reveal was cancelled
    #[must_use]
    pub fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Characters appended to the sink
    #[must_use]
    pub fn revealed(self) -> usize {
        match self {
            Self::Completed { revealed } | Self::Cancelled { revealed } => revealed,
        }
    }
}

/// Mutable progress of a session, guarded by the session lock
#[derive(Debug)]
pub(crate) struct Progress {
    pub(crate) status: RevealStatus,
    pub(crate) cursor: usize,
}

impl Progress {
    /// Outcome once terminal
    pub(crate) fn outcome(&self) -> Option<RevealOutcome> {
        match self.status {
            RevealStatus::Running => None,
            RevealStatus::Completed => Some(RevealOutcome::Completed {
                revealed: self.cursor,
            }),
            RevealStatus::Cancelled => Some(RevealOutcome::Cancelled {
                revealed: self.cursor,
            }),
        }
    }
}

/// One in-flight typewriter reveal
pub struct RevealSession {
    id: SessionId,
    text: Vec<char>,
    sink: Arc<dyn RevealSink>,
    progress: Mutex<Progress>,
    cancel: CancellationToken,
}

impl RevealSession {
    pub(crate) fn new(text: &str, sink: Arc<dyn RevealSink>) -> Self {
        Self {
            id: SessionId::generate(),
            text: text.chars().collect(),
            sink,
            progress: Mutex::new(Progress {
                status: RevealStatus::Running,
                cursor: 0,
            }),
            cancel: CancellationToken::new(),
        }
    }

    /// Session identifier
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Characters being revealed
    #[must_use]
    pub fn source_text(&self) -> &[char] {
        &self.text
    }

    /// Number of characters in the source text
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the source text is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Index of the next character to reveal
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.progress.lock().cursor
    }

    /// Current lifecycle status
    #[must_use]
    pub fn status(&self) -> RevealStatus {
        self.progress.lock().status
    }

    /// Outcome, once the session is no longer running
    #[must_use]
    pub fn outcome(&self) -> Option<RevealOutcome> {
        self.progress.lock().outcome()
    }

    pub(crate) fn sink(&self) -> &dyn RevealSink {
        self.sink.as_ref()
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Progress> {
        self.progress.lock()
    }

    /// Wake anything waiting in [`cancelled`](Self::cancelled)
    pub(crate) fn signal_cancelled(&self) {
        self.cancel.cancel();
    }

    /// Resolves once cancellation has been signalled
    pub(crate) async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }
}

impl std::fmt::Debug for RevealSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let progress = self.progress.lock();
        f.debug_struct("RevealSession")
            .field("id", &self.id)
            .field("len", &self.text.len())
            .field("cursor", &progress.cursor)
            .field("status", &progress.status)
            .finish_non_exhaustive()
    }
}
