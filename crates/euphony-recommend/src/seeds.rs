//! Reading seed references from files.

use std::fs;
use std::path::Path;

use euphony_core::model::SeedRef;

use crate::error::SeedFileError;

/// Read seed references from a file.
///
/// A `.json` file holds an array whose entries are either strings or
/// `{"title": ..., "artist": ...}` objects. Any other file is plain text
/// with one free-text reference per line; blank lines are skipped.
///
/// # Errors
/// Returns an error when the file cannot be read or the JSON is invalid.
pub fn read_seed_file(path: &Path) -> Result<Vec<SeedRef>, SeedFileError> {
    let contents = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let seeds: Vec<SeedRef> = if is_json {
        serde_json::from_str(&contents)?
    } else {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(SeedRef::from)
            .collect()
    };

    log::debug!("Read {} seeds from {}", seeds.len(), path.display());
    Ok(seeds)
}
