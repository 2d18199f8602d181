mod registry;
mod types;

pub use registry::DecompilerRegistry;
pub use types::{DecompilerError, DecompilerResult, DecompilerSummary};

use decompview_api::DecompiledCode;

/// Trait implemented by decompiler engines (e.g., r2dec).
pub trait Decompiler: Send + Sync {
    /// Stable identifier used for lookup, configuration and logging.
    fn id(&self) -> &'static str;

    /// Human-friendly name for selection lists.
    fn name(&self) -> &'static str;

    /// Decompile the function containing `address`.
    ///
    /// An empty [`DecompiledCode`] means the engine cannot decompile at this
    /// address (e.g. it is not inside a function).
    ///
    /// # Errors
    ///
    /// Implementors should surface transport or backend failures.
    fn decompile_at(&self, address: u64) -> DecompilerResult<DecompiledCode>;
}
