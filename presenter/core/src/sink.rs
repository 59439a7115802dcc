//! Reveal Sinks
//!
//! A sink is the display target a reveal writes into, one character at a
//! time. The surrounding chat surface owns it; the engine only appends and
//! asks it to keep the newest content in view.

use parking_lot::Mutex;

/// Text-append target for a reveal
pub trait RevealSink: Send + Sync {
    /// Append one character to the displayed text
    fn append_char(&self, ch: char);

    /// Scroll so the most recently appended content is visible
    fn scroll_to_latest(&self);
}

/// Sink backed by a shared string buffer
///
/// Surfaces that redraw from a buffer (terminal renderers, tests) can read
/// the revealed text back with [`contents`](Self::contents).
#[derive(Debug, Default)]
pub struct TranscriptSink {
    buffer: Mutex<String>,
    scroll_requests: Mutex<u64>,
}

impl TranscriptSink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text revealed so far
    #[must_use]
    pub fn contents(&self) -> String {
        self.buffer.lock().clone()
    }

    /// Number of characters revealed so far
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.buffer.lock().chars().count()
    }

    /// Number of scroll requests received
    #[must_use]
    pub fn scroll_requests(&self) -> u64 {
        *self.scroll_requests.lock()
    }

    /// Discard the revealed text
    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl RevealSink for TranscriptSink {
    fn append_char(&self, ch: char) {
        self.buffer.lock().push(ch);
    }

    fn scroll_to_latest(&self) {
        *self.scroll_requests.lock() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_sink_appends_in_order() {
        let sink = TranscriptSink::new();
        for ch in "héllo".chars() {
            sink.append_char(ch);
            sink.scroll_to_latest();
        }

        assert_eq!(sink.contents(), "héllo");
        assert_eq!(sink.char_count(), 5);
        assert_eq!(sink.scroll_requests(), 5);

        sink.clear();
        assert!(sink.contents().is_empty());
    }
}
