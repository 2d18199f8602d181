//! Address/caret synchronization core for decompiled source views.
//!
//! The crate keeps three coordinate spaces in step:
//! - character positions inside a mutable text buffer
//! - the ordered decompiled lines, each optionally tagged with an address
//! - the host application's "current offset"
//!
//! [`DecompilerView`] is the toolkit-free entry point; the lower layers
//! ([`document`], [`sync`], [`highlight`]) are usable on their own.

#![warn(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    missing_docs
)]
#![cfg_attr(
    not(test),
    deny(
        clippy::dbg_macro,
        clippy::expect_used,
        clippy::panic,
        clippy::print_stderr,
        clippy::print_stdout,
        clippy::todo,
        clippy::unwrap_used
    )
)]

/// Text buffer abstraction and an in-memory implementation.
pub mod buffer;
/// Writes decompiled code into a buffer and records line positions.
pub mod builder;
/// Persisted view settings.
pub mod config;
/// Decompiler registry access.
pub mod decompilers;
/// Line record store with position and address lookups.
pub mod document;
/// Highlight derivation for the focused address and word.
pub mod highlight;
/// Host offset interface.
pub mod host;
/// Caret/offset synchronization state machine.
pub mod sync;
/// Toolkit-free decompiler view model.
pub mod view;

pub use decompview_api::{
    format_address, DecompiledCode, DecompiledLine, Highlight, HighlightKind, TextRange,
};

pub use buffer::{MemoryBuffer, TextBuffer};
pub use builder::DocumentBuilder;
pub use config::ViewConfig;
pub use document::{DecompiledDocument, LineRecord};
pub use host::{OffsetHost, OffsetListener, StaticHost};
pub use sync::{CaretOutcome, OffsetOutcome, SyncController, SyncState};
pub use view::{DecompilerView, RefreshOutcome};

/// Common result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the core library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requested decompiler id is not registered.
    #[error("decompiler is not registered: {id}")]
    DecompilerNotRegistered {
        /// Identifier that failed to resolve.
        id: String,
    },
    /// A decompiler failed to handle the request.
    #[error("decompiler {decompiler} failed: {source}")]
    Decompiler {
        /// Identifier of the failing decompiler.
        decompiler: String,
        /// Error reported by the decompiler.
        #[source]
        source: decompilers::DecompilerError,
    },
    /// Filesystem interaction failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// Filesystem path involved in the failed operation.
        path: String,
        /// Source I/O error returned by the standard library.
        #[source]
        source: std::io::Error,
    },
    /// Configuration file could not be parsed or serialized.
    #[error("invalid configuration in {path}: {source}")]
    Config {
        /// Configuration file path.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}
