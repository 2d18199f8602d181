//! Shared decompview data models consumed by the core library and provider crates.

pub mod code;
pub mod highlight;

pub use code::*;
pub use highlight::*;
