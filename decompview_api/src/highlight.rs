use serde::{Deserialize, Serialize};

/// Half-open range of character positions inside a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    /// Inclusive start position.
    pub start: usize,
    /// Exclusive end position.
    pub end: usize,
}

impl TextRange {
    /// Construct a range; `end` is clamped so it never precedes `start`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        let end = if end < start { start } else { end };
        Self { start, end }
    }

    /// Number of characters covered by the range.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` when the range covers no characters.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` when `position` falls inside the range.
    #[must_use]
    pub const fn contains(&self, position: usize) -> bool {
        self.start <= position && position < self.end
    }
}

/// Why a range is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    /// Line belonging to the address currently under the caret.
    AddressRun,
    /// Caret line when the caret resolves to no address.
    CaretLine,
    /// Occurrence of the word under the caret.
    SameWord,
}

/// A visual highlight pushed to the text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Highlight {
    /// Highlighted characters.
    pub range: TextRange,
    /// Reason for the highlight.
    pub kind: HighlightKind,
}

impl Highlight {
    /// Convenience constructor.
    #[must_use]
    pub const fn new(range: TextRange, kind: HighlightKind) -> Self {
        Self { range, kind }
    }
}
