//! Per-turn buffer for streamed answer text.

use crate::render::CURSOR;

/// Concatenates the fragments of one assistant turn.
///
/// Lives for exactly one turn; [`finish`](StreamAccumulator::finish)
/// consumes it and yields the committed text.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
    fragments: usize,
}

impl StreamAccumulator {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment.  Returns false, and changes nothing, for an empty one.
    pub fn push(&mut self, fragment: &str) -> bool {
        if fragment.is_empty() {
            return false;
        }
        self.text.push_str(fragment);
        self.fragments += 1;
        true
    }

    /// The text so far followed by the in-progress cursor glyph.
    pub fn with_cursor(&self) -> String {
        format!("{}{CURSOR}", self.text)
    }

    /// How many non-empty fragments were pushed.
    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// Consume the accumulator, returning the full text.
    pub fn finish(self) -> String {
        self.text
    }
}
