//! Bidirectional caret/offset synchronization.
//!
//! Caret→offset and offset→caret are mutually exclusive: while one direction
//! propagates, notifications for the other are dropped. Hosts deliver their
//! own seek echo synchronously from [`OffsetHost::request_seek`], so the
//! guard holds exactly while that call runs.

use decompview_api::format_address;
use tracing::debug;

use crate::buffer::TextBuffer;
use crate::document::DecompiledDocument;
use crate::highlight;
use crate::host::{OffsetHost, OffsetListener};

/// Re-entrancy guard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// No propagation in progress.
    #[default]
    Idle,
    /// A caret move is pushing its address to the host.
    PropagatingFromCaret,
    /// A host offset change is moving the caret.
    PropagatingFromOffset,
}

/// Result of handling a caret-moved notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretOutcome {
    /// The host was asked to seek to this address.
    Seeked(u64),
    /// The caret's address already is the last known offset.
    Unchanged(u64),
    /// The caret resolves to no address (or no document is loaded).
    NoAddress,
    /// Dropped because an offset change is propagating.
    Suppressed,
}

/// Result of handling an offset-changed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetOutcome {
    /// The caret moved to the start of `line`.
    Moved {
        /// Index of the line the caret landed on.
        line: usize,
        /// Buffer position of that line.
        position: usize,
    },
    /// Offset recorded; there is no document to move the caret in.
    NoDocument,
    /// Dropped because this change is the echo of an in-flight propagation.
    Suppressed,
}

/// Owns the displayed document, the buffer and the re-entrancy guard.
#[derive(Debug)]
pub struct SyncController<B> {
    buffer: B,
    document: Option<DecompiledDocument>,
    state: SyncState,
    last_known_offset: Option<u64>,
}

impl<B: TextBuffer> SyncController<B> {
    /// Controller in the `Idle` state with no document loaded.
    pub const fn new(buffer: B) -> Self {
        Self {
            buffer,
            document: None,
            state: SyncState::Idle,
            last_known_offset: None,
        }
    }

    /// Current guard state.
    pub const fn state(&self) -> SyncState {
        self.state
    }

    /// Offset the view is currently synced to.
    pub const fn last_known_offset(&self) -> Option<u64> {
        self.last_known_offset
    }

    /// Displayed document, if any.
    pub const fn document(&self) -> Option<&DecompiledDocument> {
        self.document.as_ref()
    }

    /// The buffer being kept in sync.
    pub const fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Mutable access to the buffer, e.g. to move the caret as a user would.
    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    /// Consume the controller and return its buffer.
    pub fn into_buffer(self) -> B {
        self.buffer
    }

    /// Replace the displayed document wholesale.
    ///
    /// Any in-flight propagation belongs to the discarded document, so the
    /// guard returns to `Idle`.
    pub fn load(&mut self, document: DecompiledDocument) {
        self.document = Some(document);
        self.state = SyncState::Idle;
    }

    /// Discard the displayed document.
    pub fn unload(&mut self) {
        self.document = None;
        self.state = SyncState::Idle;
    }

    /// Address under the caret, tie-break applied.
    pub fn resolve_caret(&self) -> Option<u64> {
        self.document
            .as_ref()
            .and_then(|document| document.address_at(self.buffer.caret_position()))
    }

    /// Caret→offset: the buffer reported a caret move.
    ///
    /// Highlights are recomputed whatever the outcome.
    pub fn caret_moved<H>(&mut self, host: &mut H) -> CaretOutcome
    where
        H: OffsetHost + ?Sized,
    {
        if self.state != SyncState::Idle {
            debug!(state = ?self.state, "caret notification suppressed");
            return CaretOutcome::Suppressed;
        }

        let outcome = match self.resolve_caret() {
            None => CaretOutcome::NoAddress,
            Some(address) if self.last_known_offset == Some(address) => {
                CaretOutcome::Unchanged(address)
            }
            Some(address) => {
                debug!(address = %format_address(address), "seeking from caret");
                self.state = SyncState::PropagatingFromCaret;
                self.last_known_offset = Some(address);
                host.request_seek(address, self);
                self.state = SyncState::Idle;
                CaretOutcome::Seeked(address)
            }
        };

        self.refresh_highlights();
        outcome
    }

    /// Offset→caret: the host's current offset changed.
    pub fn sync_to_offset(&mut self, offset: u64) -> OffsetOutcome {
        if self.state != SyncState::Idle {
            debug!(
                state = ?self.state,
                offset = %format_address(offset),
                "offset notification suppressed"
            );
            return OffsetOutcome::Suppressed;
        }

        self.last_known_offset = Some(offset);
        let Some((line, position)) = self.document.as_ref().and_then(|document| {
            let line = document.caret_target(offset)?;
            Some((line, document.lines()[line].buffer_position()))
        }) else {
            return OffsetOutcome::NoDocument;
        };

        self.state = SyncState::PropagatingFromOffset;
        let attached = self.buffer.caret_notifications_attached();
        self.buffer.set_caret_notifications(false);
        self.buffer.set_caret_position(position);
        self.buffer.set_caret_notifications(attached);
        self.refresh_highlights();
        self.state = SyncState::Idle;

        OffsetOutcome::Moved { line, position }
    }

    /// Recompute and push highlights for the current caret.
    pub fn refresh_highlights(&mut self) {
        let highlights = highlight::derive(
            self.document.as_ref(),
            self.buffer.contents(),
            self.buffer.caret_position(),
        );
        self.buffer.set_highlights(highlights);
    }
}

impl<B: TextBuffer> OffsetListener for SyncController<B> {
    fn offset_changed(&mut self, offset: u64) {
        self.sync_to_offset(offset);
    }
}

#[cfg(test)]
mod tests {
    use decompview_api::{DecompiledCode, DecompiledLine};

    use super::*;
    use crate::buffer::MemoryBuffer;
    use crate::builder::DocumentBuilder;
    use crate::host::StaticHost;

    fn controller(lines: &[(&str, Option<u64>)]) -> SyncController<MemoryBuffer> {
        let code: DecompiledCode = lines
            .iter()
            .map(|(text, address)| DecompiledLine {
                text: (*text).to_string(),
                address: *address,
            })
            .collect();
        let mut buffer = MemoryBuffer::new();
        let document = DocumentBuilder::new(0)
            .build(&code, &mut buffer)
            .expect("document");
        let mut controller = SyncController::new(buffer);
        controller.load(document);
        controller
    }

    #[test]
    fn starts_idle_without_document() {
        let controller = SyncController::new(MemoryBuffer::new());
        assert_eq!(controller.state(), SyncState::Idle);
        assert!(controller.document().is_none());
        assert_eq!(controller.buffer().caret_position(), 0);
        assert_eq!(controller.resolve_caret(), None);
    }

    #[test]
    fn caret_move_seeks_host_once() {
        let mut controller = controller(&[("L0", Some(5)), ("L1", Some(5)), ("L2", Some(7))]);
        let mut host = StaticHost::new(Some(5));
        controller.sync_to_offset(5);

        controller.buffer_mut().set_caret_position(7);
        assert_eq!(controller.caret_moved(&mut host), CaretOutcome::Seeked(7));
        assert_eq!(host.current_offset(), Some(7));
        assert_eq!(controller.last_known_offset(), Some(7));
        assert_eq!(controller.state(), SyncState::Idle);
        // The host's echo was suppressed, so the caret stayed put.
        assert_eq!(controller.buffer().caret_position(), 7);
    }

    #[test]
    fn caret_in_later_line_of_run_reports_first_line_address() {
        let mut controller = controller(&[("L0", Some(5)), ("L1", Some(5)), ("L2", Some(7))]);
        let mut host = StaticHost::new(None);

        controller.buffer_mut().set_caret_position(4);
        assert_eq!(controller.caret_moved(&mut host), CaretOutcome::Seeked(5));
        assert_eq!(controller.caret_moved(&mut host), CaretOutcome::Unchanged(5));
    }

    #[test]
    fn offset_change_lands_on_first_line_of_run() {
        let mut controller = controller(&[("L0", Some(5)), ("L1", Some(5)), ("L2", Some(7))]);
        controller.buffer_mut().set_caret_position(8);
        controller.buffer_mut().take_caret_notifications();

        let outcome = controller.sync_to_offset(5);

        assert_eq!(outcome, OffsetOutcome::Moved { line: 0, position: 0 });
        assert_eq!(controller.buffer().caret_position(), 0);
        assert!(controller.buffer_mut().take_caret_notifications().is_empty());
    }

    #[test]
    fn caret_without_address_does_not_seek() {
        let mut controller = controller(&[("f();", Some(4)), ("}", None)]);
        let mut host = StaticHost::new(Some(4));

        controller.buffer_mut().set_caret_position(5);
        assert_eq!(controller.caret_moved(&mut host), CaretOutcome::NoAddress);
        assert_eq!(host.current_offset(), Some(4));
    }

    #[test]
    fn offset_without_document_is_recorded() {
        let mut controller = SyncController::new(MemoryBuffer::new());
        assert_eq!(controller.sync_to_offset(0x40), OffsetOutcome::NoDocument);
        assert_eq!(controller.last_known_offset(), Some(0x40));
    }

    #[test]
    fn unload_discards_document() {
        let mut controller = controller(&[("a", Some(1))]);
        controller.unload();
        assert!(controller.document().is_none());
        assert_eq!(controller.sync_to_offset(1), OffsetOutcome::NoDocument);
    }

    #[derive(Debug, Default)]
    struct CountingHost {
        seeks: Vec<u64>,
    }

    impl OffsetHost for CountingHost {
        fn current_offset(&self) -> Option<u64> {
            self.seeks.last().copied()
        }

        fn request_seek(&mut self, address: u64, listener: &mut dyn OffsetListener) {
            self.seeks.push(address);
            listener.offset_changed(address);
        }
    }

    #[test]
    fn caret_notification_is_dropped_while_propagating() {
        for state in [SyncState::PropagatingFromCaret, SyncState::PropagatingFromOffset] {
            let mut controller = controller(&[("L0", Some(5)), ("L1", Some(7))]);
            let mut host = CountingHost::default();
            controller.sync_to_offset(5);
            controller.buffer_mut().set_caret_position(3);
            controller.state = state;

            assert_eq!(controller.caret_moved(&mut host), CaretOutcome::Suppressed);
            assert!(host.seeks.is_empty());
            assert_eq!(controller.last_known_offset(), Some(5));
            assert_eq!(controller.buffer().caret_position(), 3);
            assert_eq!(controller.state(), state);
        }
    }

    #[test]
    fn offset_notification_is_dropped_while_propagating() {
        for state in [SyncState::PropagatingFromCaret, SyncState::PropagatingFromOffset] {
            let mut controller = controller(&[("L0", Some(5)), ("L1", Some(7))]);
            controller.sync_to_offset(5);
            controller.buffer_mut().take_caret_notifications();
            controller.state = state;

            assert_eq!(controller.sync_to_offset(7), OffsetOutcome::Suppressed);
            assert_eq!(controller.last_known_offset(), Some(5));
            assert_eq!(controller.buffer().caret_position(), 0);
            assert!(controller.buffer_mut().take_caret_notifications().is_empty());
            assert_eq!(controller.state(), state);
        }
    }

    #[test]
    fn offset_move_keeps_detached_notifications_detached() {
        let mut controller = controller(&[("L0", Some(5)), ("L1", Some(7))]);
        controller.buffer_mut().set_caret_notifications(false);

        controller.sync_to_offset(7);

        assert_eq!(controller.buffer().caret_position(), 3);
        assert!(!controller.buffer().caret_notifications_attached());
    }
}
