use anyhow::Context;
use domain::catalog::AdviceCatalog;
use shared::types::Result;
use std::fs;
use std::path::Path;

const EMBEDDED_CATALOG: &str = include_str!("../data/advice_catalog.json");

/// Parse and validate the canned advice tables.
///
/// Reads `path` when given, otherwise the catalog compiled into the binary.
pub fn load_catalog(path: Option<&Path>) -> Result<AdviceCatalog> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read advice catalog at {:?}", path))?;
            parse_catalog(&raw).with_context(|| format!("Invalid advice catalog at {:?}", path))
        }
        None => parse_catalog(EMBEDDED_CATALOG).context("Invalid embedded advice catalog"),
    }
}

pub fn parse_catalog(raw: &str) -> Result<AdviceCatalog> {
    Ok(serde_json::from_str(raw)?)
}
