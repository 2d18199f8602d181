//! Decompiler engines and the service used to invoke them.

mod service;

pub use decompview_provider_api::{
    Decompiler, DecompilerError, DecompilerRegistry, DecompilerResult, DecompilerSummary,
};
pub use decompview_providers::{
    default_registry, CommandDecompiler, FixtureDecompiler, FixtureFunction,
};

pub use service::DecompilerService;
