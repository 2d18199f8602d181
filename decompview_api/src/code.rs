use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Wire sentinel some decompilers emit for lines without an address.
pub const INVALID_ADDRESS: u64 = u64::MAX;

/// A single line of decompiled source as produced by a decompiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompiledLine {
    /// Literal line content without a trailing newline.
    #[serde(rename = "str")]
    pub text: String,
    /// Address the line was generated from, if it maps to a single one.
    #[serde(
        rename = "offset",
        default,
        deserialize_with = "deserialize_address",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<u64>,
}

impl DecompiledLine {
    /// Construct a line attributed to `address`.
    pub fn new(text: impl Into<String>, address: u64) -> Self {
        Self {
            text: text.into(),
            address: normalize_address(address),
        }
    }

    /// Construct a structural line (braces, blank lines) with no address.
    pub fn unaddressed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            address: None,
        }
    }
}

/// Ordered result of decompiling the function around one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DecompiledCode {
    /// Lines in display order.
    #[serde(default)]
    pub lines: Vec<DecompiledLine>,
}

impl DecompiledCode {
    /// Create an empty result, meaning "cannot decompile here".
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the decompiler produced no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines in the result.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

impl FromIterator<DecompiledLine> for DecompiledCode {
    fn from_iter<I: IntoIterator<Item = DecompiledLine>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

/// Map the wire sentinel to `None`.
#[must_use]
pub const fn normalize_address(address: u64) -> Option<u64> {
    if address == INVALID_ADDRESS {
        None
    } else {
        Some(address)
    }
}

fn deserialize_address<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<u64>::deserialize(deserializer)?;
    Ok(raw.and_then(normalize_address))
}

/// Display adapter rendering an address as `0x` plus lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressDisplay(pub u64);

impl fmt::Display for AddressDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Render an address the way every user-facing message shows it.
#[must_use]
pub fn format_address(address: u64) -> String {
    AddressDisplay(address).to_string()
}
