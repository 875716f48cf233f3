// src/index.rs

//! Repository index generation
//!
//! Rebuilds `index.xml` from the metadata sidecars persisted in the mirror
//! tree. The mirror directory is the source of truth: the index is always
//! reconstructible by rescanning it. Index construction itself is a pure
//! function over the collected metadata records, so it tests without any
//! real mirror on disk.

use crate::download::artifact_file_name;
use crate::error::{Error, Result};
use crate::metadata::{self, ArtifactMetadata, METADATA_FILE};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Category label every mirrored plugin is listed under
const CATEGORY_NAME: &str = "Programming Languages";

/// Fixed vendor contact written into every index entry
const VENDOR_EMAIL: &str = "support@jetbrains.com";
const VENDOR_URL: &str = "https://www.jetbrains.com";

#[derive(Debug, Serialize)]
struct IdeaVersionAttrs {
    #[serde(rename = "@since-build")]
    since_build: String,
    #[serde(rename = "@until-build")]
    until_build: String,
}

#[derive(Debug, Serialize)]
struct VendorAttrs {
    #[serde(rename = "@email")]
    email: String,
    #[serde(rename = "@url")]
    url: String,
}

/// One `idea-plugin` listing in the generated index
#[derive(Debug, Serialize)]
pub struct IndexEntry {
    // Attribute fields must precede element fields for XML serialization
    #[serde(rename = "@url")]
    url: String,
    id: String,
    name: String,
    version: String,
    #[serde(rename = "idea-version")]
    idea_version: IdeaVersionAttrs,
    vendor: VendorAttrs,
    description: String,
}

#[derive(Debug, Serialize)]
struct IndexCategory {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "idea-plugin")]
    plugins: Vec<IndexEntry>,
}

/// The generated repository index document
#[derive(Debug, Serialize)]
#[serde(rename = "plugin-repository")]
pub struct RepositoryIndex {
    category: IndexCategory,
}

/// Collect every metadata sidecar under the plugins directory.
///
/// Traversal is sorted, so the resulting record order (and therefore the
/// generated index) is deterministic for unchanged mirror contents. Any
/// unreadable or unparsable sidecar aborts the whole collection.
pub fn collect_metadata(plugins_dir: &Path) -> Result<Vec<ArtifactMetadata>> {
    let mut records = Vec::new();

    for entry in WalkDir::new(plugins_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            Error::MetadataReadError(format!(
                "Failed to walk {}: {e}",
                plugins_dir.display()
            ))
        })?;

        if entry.file_type().is_file() && entry.file_name() == METADATA_FILE {
            records.push(metadata::read_metadata(entry.path())?);
        }
    }

    debug!("Collected {} metadata records", records.len());
    Ok(records)
}

/// Build the index document from metadata records.
///
/// `repository_url` is the base where the static server exposes the mirror;
/// each entry's download URL points back into the mirror tree using the
/// same layout the fetcher writes.
pub fn build_index(records: &[ArtifactMetadata], repository_url: &str) -> RepositoryIndex {
    let base = repository_url.trim_end_matches('/');

    let plugins = records
        .iter()
        .map(|record| IndexEntry {
            url: format!(
                "{}/plugins/{}/{}/{}",
                base,
                record.id,
                record.version,
                artifact_file_name(&record.id, &record.version)
            ),
            id: record.id.clone(),
            // The catalog's display name is not persisted; the id stands in
            name: record.id.clone(),
            version: record.version.clone(),
            idea_version: IdeaVersionAttrs {
                since_build: record.since_build.clone(),
                until_build: record.until_build.clone(),
            },
            vendor: VendorAttrs {
                email: VENDOR_EMAIL.to_string(),
                url: VENDOR_URL.to_string(),
            },
            description: record.description.clone(),
        })
        .collect();

    RepositoryIndex {
        category: IndexCategory {
            name: CATEGORY_NAME.to_string(),
            plugins,
        },
    }
}

/// Serialize an index document to indented XML
pub fn render_index(index: &RepositoryIndex) -> Result<String> {
    let mut body = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut body);
    serializer.indent(' ', 2);

    serde::Serialize::serialize(index, serializer)
        .map_err(|e| Error::IoError(format!("Failed to encode index XML: {e}")))?;

    Ok(body)
}

/// Regenerate the repository index at `index_path` from the mirror contents.
///
/// The previous index is only replaced once the new one is fully written:
/// a metadata read failure aborts before anything touches `index_path`.
pub fn generate_index(
    plugins_dir: &Path,
    index_path: &Path,
    repository_url: &str,
) -> Result<()> {
    let records = collect_metadata(plugins_dir)?;
    let index = build_index(&records, repository_url);
    let body = render_index(&index)?;

    let temp_path = index_path.with_extension("xml.tmp");
    fs::write(&temp_path, body).map_err(|e| {
        Error::IoError(format!("Failed to write {}: {e}", temp_path.display()))
    })?;
    fs::rename(&temp_path, index_path).map_err(|e| {
        Error::IoError(format!(
            "Failed to move {} to {}: {e}",
            temp_path.display(),
            index_path.display()
        ))
    })?;

    info!(
        "Generated index with {} entries at {}",
        records.len(),
        index_path.display()
    );
    Ok(())
}
