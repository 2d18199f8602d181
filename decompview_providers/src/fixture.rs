use decompview_api::DecompiledCode;
use decompview_provider_api::{Decompiler, DecompilerError, DecompilerResult};
use serde::{Deserialize, Serialize};

/// One function known to a [`FixtureDecompiler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureFunction {
    /// Entry address of the function.
    pub entry: u64,
    /// Size of the function body in bytes.
    pub size: u64,
    /// Decompiled output returned for any address inside the function.
    #[serde(default)]
    pub code: DecompiledCode,
}

impl FixtureFunction {
    fn contains(&self, address: u64) -> bool {
        address >= self.entry && address - self.entry < self.size
    }
}

/// Decompiler serving precomputed output, keyed by function address range.
#[derive(Debug, Clone, Default)]
pub struct FixtureDecompiler {
    functions: Vec<FixtureFunction>,
}

impl FixtureDecompiler {
    /// Create a fixture decompiler without any functions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function covering `[entry, entry + size)`.
    #[must_use]
    pub fn with_function(mut self, entry: u64, size: u64, code: DecompiledCode) -> Self {
        self.functions.push(FixtureFunction { entry, size, code });
        self
    }

    /// Load functions from a JSON array of [`FixtureFunction`]s.
    ///
    /// # Errors
    ///
    /// Returns a failure when the JSON does not describe fixture functions.
    pub fn from_json(json: &str) -> DecompilerResult<Self> {
        let functions: Vec<FixtureFunction> = serde_json::from_str(json)
            .map_err(|err| DecompilerError::message(format!("invalid fixture JSON: {err}")))?;
        Ok(Self { functions })
    }

    /// Functions served by this decompiler.
    #[must_use]
    pub fn functions(&self) -> &[FixtureFunction] {
        &self.functions
    }
}

impl Decompiler for FixtureDecompiler {
    fn id(&self) -> &'static str {
        "fixture"
    }

    fn name(&self) -> &'static str {
        "Fixture"
    }

    fn decompile_at(&self, address: u64) -> DecompilerResult<DecompiledCode> {
        Ok(self
            .functions
            .iter()
            .find(|function| function.contains(address))
            .map(|function| function.code.clone())
            .unwrap_or_default())
    }
}
