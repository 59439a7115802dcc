//! Avatar Mouth Animation
//!
//! Two-frame talking animation: while a reveal runs the avatar alternates
//! between its mouth-open and mouth-closed images on a fixed interval; when
//! the reveal ends the idle (closed) image is restored.
//!
//! # Design
//!
//! Each [`AvatarAnimator::start`] spawns one toggle task driven by
//! `tokio::time::interval` and tagged with a run id. The animator state,
//! guarded by a single lock, records which run is current; a tick whose run
//! id is no longer current does nothing and ends its task. `stop()` and the
//! ticks take the same lock, so no frame can be shown after `stop()` returns.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Shortest toggle interval the animator will schedule
const MIN_TOGGLE_INTERVAL: Duration = Duration::from_millis(1);

/// Which mouth frame is shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MouthState {
    /// Mouth open (talking image)
    Open,
    /// Mouth closed (idle image)
    #[default]
    Closed,
}

impl MouthState {
    /// The other frame
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }

    /// Whether this is the idle frame
    #[must_use]
    pub fn is_idle(self) -> bool {
        self == Self::Closed
    }
}

/// Animator lifecycle phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvatarPhase {
    /// No toggle task; the idle image is shown
    Idle,
    /// A toggle task is alternating frames
    Talking,
}

/// Surface that swaps the avatar image
pub trait AvatarDisplay: Send + Sync {
    /// Show the image for `frame`
    fn show(&self, frame: MouthState);
}

/// One active toggle task
#[derive(Debug)]
struct TalkRun {
    id: u64,
    mouth: MouthState,
    toggles: u64,
    task: JoinHandle<()>,
}

struct Shared {
    display: Arc<dyn AvatarDisplay>,
    interval: Duration,
    run: Mutex<Option<TalkRun>>,
    next_run_id: AtomicU64,
}

impl Shared {
    /// Toggle the frame for run `id`; returns `false` once that run is over
    fn toggle(&self, id: u64) -> bool {
        let mut run = self.run.lock();
        match run.as_mut() {
            Some(active) if active.id == id => {
                active.mouth = active.mouth.toggled();
                active.toggles += 1;
                tracing::trace!(run = id, mouth = ?active.mouth, "Mouth toggled");
                self.display.show(active.mouth);
                true
            }
            _ => false,
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(run) = self.run.get_mut().take() {
            run.task.abort();
        }
    }
}

/// Talking-avatar animator
///
/// Cloning yields another handle to the same animator.
#[derive(Clone)]
pub struct AvatarAnimator {
    shared: Arc<Shared>,
}

impl AvatarAnimator {
    /// Create an idle animator toggling every `interval`
    pub fn new(display: Arc<dyn AvatarDisplay>, interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                display,
                interval: interval.max(MIN_TOGGLE_INTERVAL),
                run: Mutex::new(None),
                next_run_id: AtomicU64::new(1),
            }),
        }
    }

    /// Start (or restart) the talking animation
    ///
    /// Any running toggle task is stopped first, so at most one exists. The
    /// animation begins on the closed frame. Must be called from within a
    /// tokio runtime; without one the animator stays idle.
    pub fn start(&self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No tokio runtime, avatar animation not started");
            return;
        };

        let mut run = self.shared.run.lock();
        if let Some(previous) = run.take() {
            previous.task.abort();
            tracing::debug!(run = previous.id, "Restarting avatar animation");
        }

        let id = self.shared.next_run_id.fetch_add(1, Ordering::Relaxed);
        self.shared.display.show(MouthState::Closed);

        let task = runtime.spawn(toggle_loop(
            Arc::downgrade(&self.shared),
            id,
            self.shared.interval,
        ));
        *run = Some(TalkRun {
            id,
            mouth: MouthState::Closed,
            toggles: 0,
            task,
        });

        tracing::debug!(
            run = id,
            interval_ms = self.shared.interval.as_millis() as u64,
            "Avatar talking"
        );
    }

    /// Stop the animation and show the idle image
    ///
    /// Safe to call when already idle; the idle image is shown regardless.
    pub fn stop(&self) {
        let mut run = self.shared.run.lock();
        if let Some(active) = run.take() {
            active.task.abort();
            tracing::debug!(run = active.id, toggles = active.toggles, "Avatar idle");
        }
        self.shared.display.show(MouthState::Closed);
    }

    /// Current lifecycle phase
    #[must_use]
    pub fn phase(&self) -> AvatarPhase {
        if self.shared.run.lock().is_some() {
            AvatarPhase::Talking
        } else {
            AvatarPhase::Idle
        }
    }

    /// Whether a toggle task is running
    #[must_use]
    pub fn is_talking(&self) -> bool {
        self.phase() == AvatarPhase::Talking
    }

    /// Frame currently shown
    #[must_use]
    pub fn mouth(&self) -> MouthState {
        self.shared
            .run
            .lock()
            .as_ref()
            .map_or(MouthState::Closed, |run| run.mouth)
    }

    /// Toggle interval in use
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.shared.interval
    }
}

impl std::fmt::Debug for AvatarAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarAnimator")
            .field("interval", &self.shared.interval)
            .field("run", &*self.shared.run.lock())
            .finish()
    }
}

async fn toggle_loop(shared: Weak<Shared>, id: u64, period: Duration) {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let Some(shared) = shared.upgrade() else {
            break;
        };
        if !shared.toggle(id) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FrameLog {
        frames: Mutex<Vec<MouthState>>,
    }

    impl AvatarDisplay for FrameLog {
        fn show(&self, frame: MouthState) {
            self.frames.lock().push(frame);
        }
    }

    #[test]
    fn test_mouth_toggle() {
        assert_eq!(MouthState::Open.toggled(), MouthState::Closed);
        assert_eq!(MouthState::Closed.toggled(), MouthState::Open);
        assert!(MouthState::default().is_idle());
    }

    #[test]
    fn test_start_without_runtime_stays_idle() {
        let log = Arc::new(FrameLog::default());
        let animator = AvatarAnimator::new(log.clone(), Duration::from_millis(100));

        animator.start();

        assert_eq!(animator.phase(), AvatarPhase::Idle);
        assert!(log.frames.lock().is_empty());
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let animator = AvatarAnimator::new(Arc::new(FrameLog::default()), Duration::ZERO);
        assert_eq!(animator.interval(), MIN_TOGGLE_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggles_alternate_from_closed() {
        let log = Arc::new(FrameLog::default());
        let animator = AvatarAnimator::new(log.clone(), Duration::from_millis(100));

        animator.start();
        assert!(animator.is_talking());
        time::sleep(Duration::from_millis(350)).await;

        let frames = log.frames.lock().clone();
        assert_eq!(
            frames,
            vec![
                MouthState::Closed,
                MouthState::Open,
                MouthState::Closed,
                MouthState::Open,
            ]
        );
        assert_eq!(animator.mouth(), MouthState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_noop_safe_when_idle() {
        let log = Arc::new(FrameLog::default());
        let animator = AvatarAnimator::new(log.clone(), Duration::from_millis(100));

        animator.stop();
        animator.stop();

        assert_eq!(animator.phase(), AvatarPhase::Idle);
        assert_eq!(*log.frames.lock(), vec![MouthState::Closed, MouthState::Closed]);
    }
}
