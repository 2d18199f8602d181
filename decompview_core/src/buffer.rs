//! The text buffer the view renders into.
//!
//! Widgets implement [`TextBuffer`]; [`MemoryBuffer`] is a complete in-memory
//! implementation used by headless embedders and tests.

use decompview_api::Highlight;

/// Mutable text buffer with a caret and visual range highlighting.
///
/// All positions are character offsets.
pub trait TextBuffer {
    /// Remove all text.
    fn clear(&mut self);

    /// Append `text` followed by exactly one line terminator.
    fn append_line(&mut self, text: &str);

    /// Replace the contents with a plain informational message.
    fn show_message(&mut self, message: &str);

    /// Position at which the next appended character will be written.
    fn end_position(&self) -> usize;

    /// Current buffer contents.
    fn contents(&self) -> &str;

    /// Current caret position.
    fn caret_position(&self) -> usize;

    /// Move the caret, emitting a caret-moved notification when attached.
    fn set_caret_position(&mut self, position: usize);

    /// Whether caret-moved notifications are currently attached.
    fn caret_notifications_attached(&self) -> bool;

    /// Attach (`true`) or detach (`false`) caret-moved notifications.
    fn set_caret_notifications(&mut self, attached: bool);

    /// Replace the set of highlighted ranges.
    fn set_highlights(&mut self, highlights: Vec<Highlight>);
}

/// In-memory [`TextBuffer`].
///
/// Caret moves made while notifications are attached are queued and drained
/// with [`MemoryBuffer::take_caret_notifications`].
#[derive(Debug, Clone)]
pub struct MemoryBuffer {
    text: String,
    char_len: usize,
    caret: usize,
    notifications_attached: bool,
    pending_caret_moves: Vec<usize>,
    highlights: Vec<Highlight>,
}

impl MemoryBuffer {
    /// Create an empty buffer with the caret at position 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            char_len: 0,
            caret: 0,
            notifications_attached: true,
            pending_caret_moves: Vec::new(),
            highlights: Vec::new(),
        }
    }

    /// Highlights most recently pushed to the buffer.
    #[must_use]
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    /// Drain the caret positions reported since the last call.
    pub fn take_caret_notifications(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.pending_caret_moves)
    }

    fn move_caret(&mut self, position: usize) {
        let position = position.min(self.char_len);
        if position == self.caret {
            return;
        }
        self.caret = position;
        if self.notifications_attached {
            self.pending_caret_moves.push(position);
        }
    }
}

impl Default for MemoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer for MemoryBuffer {
    fn clear(&mut self) {
        self.text.clear();
        self.char_len = 0;
        self.highlights.clear();
        self.move_caret(0);
    }

    fn append_line(&mut self, text: &str) {
        self.text.push_str(text);
        self.text.push('\n');
        self.char_len += text.chars().count() + 1;
    }

    fn show_message(&mut self, message: &str) {
        self.text.clear();
        self.text.push_str(message);
        self.char_len = message.chars().count();
        self.highlights.clear();
        let caret = self.caret;
        self.move_caret(caret);
    }

    fn end_position(&self) -> usize {
        self.char_len
    }

    fn contents(&self) -> &str {
        &self.text
    }

    fn caret_position(&self) -> usize {
        self.caret
    }

    fn set_caret_position(&mut self, position: usize) {
        self.move_caret(position);
    }

    fn caret_notifications_attached(&self) -> bool {
        self.notifications_attached
    }

    fn set_caret_notifications(&mut self, attached: bool) {
        self.notifications_attached = attached;
    }

    fn set_highlights(&mut self, highlights: Vec<Highlight>) {
        self.highlights = highlights;
    }
}
