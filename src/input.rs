//! Loading raw per-type record lists from JSON.

use std::path::Path;

use anyhow::{Context, Result};

use crate::types::RawInput;

/// Parse a JSON object of `type -> [{date, total}]` lists.
pub fn parse_raw_input(bytes: &mut [u8]) -> Result<RawInput> {
    simd_json::from_slice(bytes).context("Failed to parse raw input JSON")
}

/// Read and parse a raw input file.
pub fn load_raw_input(path: &Path) -> Result<RawInput> {
    let mut bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    parse_raw_input(&mut bytes).with_context(|| format!("Invalid input file {}", path.display()))
}
