use decompview_api::format_address;
use tracing::{info, warn};

use crate::buffer::{MemoryBuffer, TextBuffer};
use crate::builder::DocumentBuilder;
use crate::config::ViewConfig;
use crate::decompilers::{DecompilerService, DecompilerSummary};
use crate::document::DecompiledDocument;
use crate::host::{OffsetHost, OffsetListener};
use crate::sync::{CaretOutcome, OffsetOutcome, SyncController};
use crate::{Error, Result};

/// Placeholder shown when no decompiler is registered.
pub const NO_DECOMPILER_MESSAGE: &str = "No Decompiler available.";
/// Placeholder shown before the first decompilation.
pub const NOT_YET_DECOMPILED_MESSAGE: &str = "Click Refresh to decompile from current offset.";

const WINDOW_TITLE: &str = "Decompiler";

/// What a [`DecompilerView::refresh`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No decompiler is registered.
    NoDecompilerAvailable,
    /// The host has no current offset to decompile at.
    NotYetDecompiled,
    /// The decompiler returned no lines for `address`.
    CannotDecompile {
        /// Requested address.
        address: u64,
    },
    /// The decompiler reported an error.
    Failed {
        /// Requested address.
        address: u64,
        /// Error text shown in the buffer.
        message: String,
    },
    /// A new document is displayed.
    Loaded {
        /// Address the document was decompiled at.
        address: u64,
        /// Number of lines in the document.
        lines: usize,
    },
}

/// Toolkit-free decompiler view: decompiler selection, refresh and the
/// caret/offset synchronization of the displayed result.
#[derive(Debug)]
pub struct DecompilerView<B> {
    service: DecompilerService,
    config: ViewConfig,
    selected: Option<String>,
    sync: SyncController<B>,
}

impl<B: TextBuffer> DecompilerView<B> {
    /// Create a view rendering into `buffer`.
    ///
    /// The configured decompiler is selected when registered, otherwise the
    /// first registered one.
    pub fn new(service: DecompilerService, config: ViewConfig, buffer: B) -> Self {
        let registry = service.registry();
        let selected = config
            .selected_decompiler
            .as_deref()
            .and_then(|id| registry.get(id))
            .or_else(|| registry.first())
            .map(|decompiler| decompiler.id().to_string());

        let mut sync = SyncController::new(buffer);
        sync.buffer_mut().show_message(if selected.is_some() {
            NOT_YET_DECOMPILED_MESSAGE
        } else {
            NO_DECOMPILER_MESSAGE
        });

        Self {
            service,
            config,
            selected,
            sync,
        }
    }

    /// Identifier of the selected decompiler.
    pub fn selected_decompiler(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Decompilers available for selection.
    pub fn decompilers(&self) -> Vec<DecompilerSummary> {
        self.service.summaries()
    }

    /// Selection is only offered when there is more than one decompiler.
    pub fn can_select_decompiler(&self) -> bool {
        self.service.registry().len() > 1
    }

    /// Settings reflecting the current selection, ready to be saved.
    pub const fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// `Decompiler`, suffixed with the selected decompiler id.
    pub fn window_title(&self) -> String {
        match &self.selected {
            Some(id) => format!("{WINDOW_TITLE} ({id})"),
            None => WINDOW_TITLE.to_string(),
        }
    }

    /// Switch to decompiler `id` and discard the displayed document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecompilerNotRegistered`] for unknown ids; the
    /// current selection is left untouched.
    pub fn select_decompiler(&mut self, id: &str) -> Result<()> {
        let decompiler = self.service.decompiler(id)?;
        let id = decompiler.id().to_string();
        info!(decompiler = %id, "decompiler selected");
        self.config.selected_decompiler = Some(id.clone());
        self.selected = Some(id);
        self.sync.unload();
        self.sync
            .buffer_mut()
            .show_message(NOT_YET_DECOMPILED_MESSAGE);
        Ok(())
    }

    /// Decompile at the host's current offset and display the result.
    ///
    /// Every outcome other than `Loaded` discards the previous document and
    /// leaves a message in the buffer; none of them is fatal.
    pub fn refresh<H>(&mut self, host: &H) -> RefreshOutcome
    where
        H: OffsetHost + ?Sized,
    {
        let Some(id) = self.selected.clone() else {
            self.show_placeholder(NO_DECOMPILER_MESSAGE);
            return RefreshOutcome::NoDecompilerAvailable;
        };
        let Some(address) = host.current_offset() else {
            self.show_placeholder(NOT_YET_DECOMPILED_MESSAGE);
            return RefreshOutcome::NotYetDecompiled;
        };

        let code = match self.service.decompile_at(&id, address) {
            Ok(code) => code,
            Err(err) => {
                let detail = match err {
                    Error::Decompiler { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                warn!(
                    decompiler = %id,
                    address = %format_address(address),
                    error = %detail,
                    "decompilation failed"
                );
                let message = format!(
                    "Decompiler error at {}: {detail}",
                    format_address(address)
                );
                self.show_placeholder(&message);
                return RefreshOutcome::Failed { address, message };
            }
        };

        self.sync.unload();
        match DocumentBuilder::new(address).build(&code, self.sync.buffer_mut()) {
            None => {
                self.sync.refresh_highlights();
                RefreshOutcome::CannotDecompile { address }
            }
            Some(document) => {
                let lines = document.len();
                self.sync.load(document);
                self.sync.sync_to_offset(address);
                RefreshOutcome::Loaded { address, lines }
            }
        }
    }

    /// Caret→offset entry point for the buffer's caret-moved notification.
    pub fn caret_moved<H>(&mut self, host: &mut H) -> CaretOutcome
    where
        H: OffsetHost + ?Sized,
    {
        self.sync.caret_moved(host)
    }

    /// Offset→caret entry point for the host's offset-changed notification.
    pub fn sync_to_offset(&mut self, offset: u64) -> OffsetOutcome {
        self.sync.sync_to_offset(offset)
    }

    /// Address under the caret, if any.
    pub fn caret_address(&self) -> Option<u64> {
        self.sync.resolve_caret()
    }

    /// Displayed document, if any.
    pub const fn document(&self) -> Option<&DecompiledDocument> {
        self.sync.document()
    }

    /// The synchronization controller.
    pub const fn sync(&self) -> &SyncController<B> {
        &self.sync
    }

    /// The rendered buffer.
    pub const fn buffer(&self) -> &B {
        self.sync.buffer()
    }

    /// Mutable access to the rendered buffer.
    pub fn buffer_mut(&mut self) -> &mut B {
        self.sync.buffer_mut()
    }

    fn show_placeholder(&mut self, message: &str) {
        self.sync.unload();
        self.sync.buffer_mut().show_message(message);
        self.sync.refresh_highlights();
    }
}

impl DecompilerView<MemoryBuffer> {
    /// Deliver every queued caret-moved notification of the memory buffer,
    /// in order, each with the caret at the position it reported.
    ///
    /// The caret ends where it was before pumping.
    pub fn pump_caret_notifications<H>(&mut self, host: &mut H) -> Vec<CaretOutcome>
    where
        H: OffsetHost + ?Sized,
    {
        let moves = self.sync.buffer_mut().take_caret_notifications();
        let caret = self.sync.buffer().caret_position();
        let mut outcomes = Vec::with_capacity(moves.len());
        for position in moves {
            self.place_caret_silently(position);
            outcomes.push(self.sync.caret_moved(&mut *host));
        }
        if self.sync.buffer().caret_position() != caret {
            self.place_caret_silently(caret);
            self.sync.refresh_highlights();
        }
        outcomes
    }

    fn place_caret_silently(&mut self, position: usize) {
        let buffer = self.sync.buffer_mut();
        let attached = buffer.caret_notifications_attached();
        buffer.set_caret_notifications(false);
        buffer.set_caret_position(position);
        buffer.set_caret_notifications(attached);
    }
}

impl<B: TextBuffer> OffsetListener for DecompilerView<B> {
    fn offset_changed(&mut self, offset: u64) {
        self.sync.sync_to_offset(offset);
    }
}
