use super::{DecompiledDocument, LineRecord};

impl DecompiledDocument {
    /// Index of the line whose `[buffer_position, next_buffer_position)` range
    /// contains `position`.
    ///
    /// Positions past the last line's start resolve to the last line. Returns
    /// `None` when `position` precedes the first line.
    #[must_use]
    pub fn line_at(&self, position: usize) -> Option<usize> {
        let after = self
            .lines
            .partition_point(|line| line.buffer_position <= position);
        after.checked_sub(1)
    }

    /// Record variant of [`DecompiledDocument::line_at`].
    #[must_use]
    pub fn record_at(&self, position: usize) -> Option<&LineRecord> {
        self.line_at(position).and_then(|index| self.lines.get(index))
    }

    /// Address under `position`, resolved to the earliest line of its
    /// same-address run. `None` means "no address under caret".
    #[must_use]
    pub fn address_at(&self, position: usize) -> Option<u64> {
        let index = self.line_at(position)?;
        let first = self.first_of_run(index);
        self.lines[first].address
    }
}
