//! Record store: loads the county dataset from a JSON file.

use crate::error::LoadError;
use crate::record::County;
use std::fs;
use std::path::Path;
use tracing::info;

/// Data file used when none is configured.
pub const DEFAULT_DATA_FILE: &str = "county_demographics.json";

/// Parse a JSON array of county records, keeping file order.
pub fn parse_counties(json: &str) -> Result<Vec<County>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Load every county from `path`.
pub fn load_counties(path: &Path) -> Result<Vec<County>, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let counties = parse_counties(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), count = counties.len(), "loaded county data");
    Ok(counties)
}
