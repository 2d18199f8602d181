mod command;
mod fixture;

pub use command::CommandDecompiler;
pub use fixture::{FixtureDecompiler, FixtureFunction};

use decompview_provider_api::DecompilerRegistry;

/// Build a decompiler registry populated with the default engines.
#[must_use]
pub fn default_registry() -> DecompilerRegistry {
    let mut registry = DecompilerRegistry::new();
    registry.register(CommandDecompiler::from_env());
    registry
}
