//! Terminal surface: stdout sink and avatar frame reporter

use std::io::Write;

use presenter_core::{AvatarConfig, AvatarDisplay, MouthState, RevealOutcome, RevealSink};

/// Writes revealed characters straight to stdout
pub struct TerminalSink;

impl TerminalSink {
    /// Print the speaker prompt and return a sink for the rest of the line
    pub fn start_line(prompt: &str) -> Self {
        let mut out = std::io::stdout().lock();
        // Terminal output errors are not actionable here
        let _ = write!(out, "{prompt}");
        let _ = out.flush();
        Self
    }

    /// Terminate the line, marking truncated reveals
    pub fn finish_line(&self, outcome: RevealOutcome) {
        let mut out = std::io::stdout().lock();
        let _ = match outcome {
            RevealOutcome::Completed { .. } => writeln!(out),
            RevealOutcome::Cancelled { .. } => writeln!(out, " …"),
        };
        let _ = out.flush();
    }
}

impl RevealSink for TerminalSink {
    fn append_char(&self, ch: char) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "{ch}");
    }

    fn scroll_to_latest(&self) {
        // A terminal scrolls on its own; flushing makes the character visible
        let _ = std::io::stdout().lock().flush();
    }
}

/// Reports avatar frame changes through tracing
pub struct FrameReporter {
    avatar: AvatarConfig,
}

impl FrameReporter {
    pub fn new(avatar: AvatarConfig) -> Self {
        Self { avatar }
    }
}

impl AvatarDisplay for FrameReporter {
    fn show(&self, frame: MouthState) {
        tracing::debug!(
            avatar = %self.avatar.name,
            image = %self.avatar.image_path(frame),
            "Avatar frame"
        );
    }
}
