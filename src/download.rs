// src/download.rs

//! Artifact downloading
//!
//! Downloads one compatible plugin version and persists it under
//! `plugins/<id>/<version>/<id>-intellij-bin-<version>.zip` together with
//! its `metadata.json` sidecar. The zip and the sidecar are staged in a
//! temporary directory and renamed into place in one step, so the pair is
//! either fully present or fully absent after a crash.

use crate::catalog::PluginVersion;
use crate::error::{Error, Result};
use crate::metadata::{self, ArtifactMetadata};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Buffer size for streaming downloads (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// File name of an artifact inside its per-version directory
pub fn artifact_file_name(plugin_id: &str, version: &str) -> String {
    format!("{plugin_id}-intellij-bin-{version}.zip")
}

/// Directory holding one (plugin id, version) pair, relative to the
/// plugins root. Fully determined by its arguments, so no two artifacts
/// collide.
pub fn artifact_dir(plugins_dir: &Path, plugin_id: &str, version: &str) -> PathBuf {
    plugins_dir.join(plugin_id).join(version)
}

/// Stream an HTTP response to a file, updating a progress bar as bytes
/// arrive
fn stream_response_to_file(
    mut response: reqwest::blocking::Response,
    file: &mut File,
    progress_bar: &ProgressBar,
) -> Result<u64> {
    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];

    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| Error::DownloadError(format!("Failed to read response: {e}")))?;

        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])
            .map_err(|e| Error::IoError(format!("Failed to write data: {e}")))?;

        downloaded += bytes_read as u64;
        progress_bar.set_position(downloaded);
    }

    Ok(downloaded)
}

/// Downloads plugin artifacts into the mirror tree
pub struct ArtifactFetcher {
    client: Client,
    base_url: String,
    plugins_dir: PathBuf,
}

impl ArtifactFetcher {
    /// Create a fetcher targeting the given download endpoint and mirror
    /// plugins directory
    pub fn new(base_url: &str, plugins_dir: PathBuf, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            plugins_dir,
        })
    }

    /// Deterministic download URL for one plugin version
    fn download_url(&self, plugin_id: &str, version: &str) -> String {
        format!(
            "{}/plugin/download?pluginId={}&version={}",
            self.base_url, plugin_id, version
        )
    }

    /// Download one plugin version and its metadata sidecar into the mirror
    pub fn fetch(&self, plugin_id: &str, version: &PluginVersion) -> Result<PathBuf> {
        let url = self.download_url(plugin_id, &version.version);
        debug!("Starting download from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Error::DownloadError(format!("Request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} from {url}",
                response.status()
            )));
        }

        let dest_dir = artifact_dir(&self.plugins_dir, plugin_id, &version.version);
        let parent = dest_dir
            .parent()
            .ok_or_else(|| Error::IoError(format!("No parent for {}", dest_dir.display())))?;
        fs::create_dir_all(parent).map_err(|e| {
            Error::IoError(format!("Failed to create directory {}: {e}", parent.display()))
        })?;

        // Stage the artifact and its sidecar together, then swap the whole
        // directory into place. The staging directory lives next to the
        // destination so the rename stays on one filesystem.
        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(parent)
            .map_err(|e| Error::IoError(format!("Failed to create staging directory: {e}")))?;

        let file_name = artifact_file_name(plugin_id, &version.version);
        let artifact_path = staging.path().join(&file_name);
        let mut file = File::create(&artifact_path).map_err(|e| {
            Error::IoError(format!("Failed to create file {}: {e}", artifact_path.display()))
        })?;

        let total_size = response.content_length().unwrap_or(0);
        let progress_bar = ProgressBar::new(total_size);
        progress_bar.set_style(
            ProgressStyle::with_template("{msg} {bytes}/{total_bytes} [{bar:30}] {bytes_per_sec}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress_bar.set_message(file_name.clone());

        let downloaded = stream_response_to_file(response, &mut file, &progress_bar)?;
        progress_bar.finish_and_clear();
        debug!("Downloaded {} bytes", downloaded);

        let metadata = ArtifactMetadata {
            id: plugin_id.to_string(),
            version: version.version.clone(),
            since_build: version.idea_version.since_build.clone(),
            until_build: version.idea_version.until_build.clone(),
            description: version.description.clone(),
        };
        metadata::write_metadata(&metadata, staging.path())?;

        // Re-syncing an already mirrored version replaces the pair wholesale
        if dest_dir.exists() {
            fs::remove_dir_all(&dest_dir).map_err(|e| {
                Error::IoError(format!("Failed to replace {}: {e}", dest_dir.display()))
            })?;
        }

        let staging_path = staging.into_path();
        fs::rename(&staging_path, &dest_dir).map_err(|e| {
            // Best-effort cleanup of the orphaned staging directory
            let _ = fs::remove_dir_all(&staging_path);
            Error::IoError(format!(
                "Failed to move {} to {}: {e}",
                staging_path.display(),
                dest_dir.display()
            ))
        })?;

        let final_path = dest_dir.join(&file_name);
        info!(
            "Downloaded plugin {} version {} to {}",
            plugin_id,
            version.version,
            final_path.display()
        );
        Ok(final_path)
    }
}
