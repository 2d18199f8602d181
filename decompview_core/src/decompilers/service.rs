use std::sync::Arc;

use decompview_api::{format_address, DecompiledCode};
use tracing::debug;

use super::{Decompiler, DecompilerRegistry, DecompilerSummary};
use crate::{Error, Result};

/// High-level façade for resolving and invoking decompilers.
#[derive(Clone)]
pub struct DecompilerService {
    registry: Arc<DecompilerRegistry>,
}

impl DecompilerService {
    /// Create a service backed by the provided registry.
    #[must_use]
    pub fn new(registry: DecompilerRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Access the underlying registry.
    #[must_use]
    pub fn registry(&self) -> Arc<DecompilerRegistry> {
        Arc::clone(&self.registry)
    }

    /// List summaries for all registered decompilers.
    #[must_use]
    pub fn summaries(&self) -> Vec<DecompilerSummary> {
        self.registry.summaries()
    }

    /// Resolve a decompiler by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecompilerNotRegistered`] when the id is unknown.
    pub fn decompiler(&self, id: &str) -> Result<Arc<dyn Decompiler>> {
        self.registry
            .get(id)
            .ok_or_else(|| Error::DecompilerNotRegistered { id: id.to_string() })
    }

    /// Decompile the function containing `address` with the given engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecompilerNotRegistered`] or the engine's failure.
    pub fn decompile_at(&self, id: &str, address: u64) -> Result<DecompiledCode> {
        let decompiler = self.decompiler(id)?;
        debug!(decompiler = id, address = %format_address(address), "decompiling");
        decompiler
            .decompile_at(address)
            .map_err(|source| Error::Decompiler {
                decompiler: id.to_string(),
                source,
            })
    }
}

impl std::fmt::Debug for DecompilerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<String> = self
            .registry
            .ids()
            .map(std::string::ToString::to_string)
            .collect();
        f.debug_struct("DecompilerService")
            .field("decompilers", &ids)
            .finish()
    }
}
