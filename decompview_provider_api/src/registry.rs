//! Registry keeps track of the available decompiler engines.

use std::sync::Arc;

use crate::{Decompiler, DecompilerSummary};

/// In-memory registry for decompilers, kept in registration order.
#[derive(Default)]
pub struct DecompilerRegistry {
    decompilers: Vec<Arc<dyn Decompiler>>,
}

impl DecompilerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decompiler keyed by its `Decompiler::id`.
    ///
    /// Registering an id twice replaces the earlier engine in place.
    pub fn register<D>(&mut self, decompiler: D)
    where
        D: Decompiler + 'static,
    {
        self.register_arc(Arc::new(decompiler));
    }

    /// Register an already shared decompiler.
    pub fn register_arc(&mut self, decompiler: Arc<dyn Decompiler>) {
        let id = decompiler.id();
        match self.decompilers.iter_mut().find(|existing| existing.id() == id) {
            Some(slot) => *slot = decompiler,
            None => self.decompilers.push(decompiler),
        }
    }

    /// Retrieve a decompiler by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn Decompiler>> {
        self.decompilers
            .iter()
            .find(|decompiler| decompiler.id() == id)
            .cloned()
    }

    /// First registered decompiler, used when nothing was selected.
    #[must_use]
    pub fn first(&self) -> Option<Arc<dyn Decompiler>> {
        self.decompilers.first().cloned()
    }

    /// Returns the registered identifiers in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decompilers.iter().map(|decompiler| decompiler.id())
    }

    /// Summaries for all registered decompilers.
    #[must_use]
    pub fn summaries(&self) -> Vec<DecompilerSummary> {
        self.decompilers
            .iter()
            .map(|decompiler| DecompilerSummary::new(decompiler.id(), decompiler.name()))
            .collect()
    }

    /// Number of registered decompilers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decompilers.len()
    }

    /// Returns `true` when no decompiler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decompilers.is_empty()
    }
}
