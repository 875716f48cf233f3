// src/metadata.rs

//! Artifact metadata sidecars
//!
//! Every mirrored artifact directory carries a `metadata.json` record
//! describing the artifact. The index generator re-derives the whole
//! repository index from these records, so the mirror state is always
//! reconstructible from disk.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name of the sidecar record inside each artifact directory
pub const METADATA_FILE: &str = "metadata.json";

/// Metadata record persisted next to each downloaded artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub id: String,
    pub version: String,
    pub since_build: String,
    pub until_build: String,
    pub description: String,
}

/// Write a metadata record to `dir/metadata.json`.
///
/// The record is written to a temporary file and renamed into place, so a
/// reader never observes a partially written sidecar.
pub fn write_metadata(metadata: &ArtifactMetadata, dir: &Path) -> Result<()> {
    let data = serde_json::to_vec_pretty(metadata)
        .map_err(|e| Error::MetadataWriteError(format!("Failed to encode metadata: {e}")))?;

    let path = dir.join(METADATA_FILE);
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, data).map_err(|e| {
        Error::MetadataWriteError(format!("Failed to write {}: {e}", temp_path.display()))
    })?;
    fs::rename(&temp_path, &path).map_err(|e| {
        Error::MetadataWriteError(format!(
            "Failed to move {} to {}: {e}",
            temp_path.display(),
            path.display()
        ))
    })?;

    Ok(())
}

/// Read a metadata record from a sidecar file
pub fn read_metadata(path: &Path) -> Result<ArtifactMetadata> {
    let data = fs::read_to_string(path).map_err(|e| {
        Error::MetadataReadError(format!("Failed to read {}: {e}", path.display()))
    })?;

    serde_json::from_str(&data).map_err(|e| {
        Error::MetadataReadError(format!("Failed to parse {}: {e}", path.display()))
    })
}
