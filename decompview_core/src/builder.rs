use decompview_api::{format_address, DecompiledCode};
use tracing::{debug, info};

use crate::buffer::TextBuffer;
use crate::document::{DecompiledDocument, LineRecord};

/// Writes one decompilation result into a buffer and records where each
/// line starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentBuilder {
    address: u64,
}

impl DocumentBuilder {
    /// Builder for code decompiled at `address`.
    #[must_use]
    pub const fn new(address: u64) -> Self {
        Self { address }
    }

    /// Message shown when the decompiler returned no lines.
    #[must_use]
    pub fn cannot_decompile_message(address: u64) -> String {
        format!(
            "Cannot decompile at {} (Not a function?)",
            format_address(address)
        )
    }

    /// Replace the buffer contents with `code`, one line per record.
    ///
    /// Returns `None` for an empty result; the buffer then only shows the
    /// "cannot decompile" message. Caret notifications are detached while
    /// the buffer is rewritten and restored to their previous state after.
    pub fn build<B>(&self, code: &DecompiledCode, buffer: &mut B) -> Option<DecompiledDocument>
    where
        B: TextBuffer + ?Sized,
    {
        if code.is_empty() {
            info!(address = %format_address(self.address), "decompiler returned no lines");
            buffer.show_message(&Self::cannot_decompile_message(self.address));
            return None;
        }

        let attached = buffer.caret_notifications_attached();
        buffer.set_caret_notifications(false);
        buffer.clear();
        let mut records = Vec::with_capacity(code.len());
        for line in &code.lines {
            records.push(LineRecord::new(
                line.text.clone(),
                line.address,
                buffer.end_position(),
            ));
            buffer.append_line(&line.text);
        }
        buffer.set_caret_notifications(attached);

        debug!(
            address = %format_address(self.address),
            lines = records.len(),
            "built decompiled document"
        );
        DecompiledDocument::from_records(self.address, records)
    }
}
