//! The line record store for one decompilation result.
//!
//! A [`DecompiledDocument`] is an immutable snapshot: it is built once per
//! decompilation request and replaced wholesale on the next one. Lookups from
//! buffer positions live in `position`, lookups from addresses in `address`.

mod address;
mod position;

use decompview_api::TextRange;

/// One rendered line of decompiled text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    text: String,
    address: Option<u64>,
    buffer_position: usize,
    char_len: usize,
}

impl LineRecord {
    pub(crate) fn new(text: String, address: Option<u64>, buffer_position: usize) -> Self {
        let char_len = text.chars().count();
        Self {
            text,
            address,
            buffer_position,
            char_len,
        }
    }

    /// Literal line content without its terminator.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Address the line was generated from, if any.
    #[must_use]
    pub const fn address(&self) -> Option<u64> {
        self.address
    }

    /// Character offset in the buffer where the line's text begins.
    #[must_use]
    pub const fn buffer_position(&self) -> usize {
        self.buffer_position
    }

    /// Buffer range covered by the line's text, terminator excluded.
    #[must_use]
    pub const fn range(&self) -> TextRange {
        TextRange::new(self.buffer_position, self.buffer_position + self.char_len)
    }
}

/// Built sequence of [`LineRecord`]s for one decompilation at one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompiledDocument {
    address: u64,
    lines: Vec<LineRecord>,
}

impl DecompiledDocument {
    /// Returns `None` for an empty record list; empty results never form a document.
    pub(crate) fn from_records(address: u64, lines: Vec<LineRecord>) -> Option<Self> {
        if lines.is_empty() {
            return None;
        }
        debug_assert!(
            lines
                .windows(2)
                .all(|pair| pair[0].buffer_position < pair[1].buffer_position),
            "buffer positions must be strictly increasing"
        );
        Some(Self { address, lines })
    }

    /// Address the document was decompiled at.
    #[must_use]
    pub const fn decompiled_at(&self) -> u64 {
        self.address
    }

    /// All lines in document order.
    #[must_use]
    pub fn lines(&self) -> &[LineRecord] {
        &self.lines
    }

    /// Line at `index`, if in bounds.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&LineRecord> {
        self.lines.get(index)
    }

    /// Number of lines; a built document always has at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always `false` for a built document.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns `true` if any line carries an address.
    #[must_use]
    pub fn has_addresses(&self) -> bool {
        self.lines.iter().any(|line| line.address.is_some())
    }
}
