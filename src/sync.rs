// src/sync.rs

//! Mirror synchronization
//!
//! Drives the fetch, filter, persist, re-index cycle over every configured
//! plugin. Failures are handled in two tiers: per-plugin and per-version
//! failures are logged and skipped, while mirror-root creation and index
//! generation failures abort the run.

use crate::catalog::CatalogClient;
use crate::compat::is_compatible;
use crate::config::Config;
use crate::download::ArtifactFetcher;
use crate::error::{Error, Result};
use crate::index;
use std::fs;
use tracing::{error, info};

/// File name of the generated repository index inside the plugins directory
pub const INDEX_FILE: &str = "index.xml";

/// Synchronize the mirror with the remote catalog.
///
/// Every configured plugin is processed sequentially; the index is
/// regenerated exactly once after all plugins, regardless of how many
/// individual fetches failed.
pub fn sync_plugins(config: &Config) -> Result<()> {
    let plugins_dir = config.plugins_dir();
    fs::create_dir_all(&plugins_dir).map_err(|e| {
        Error::InitError(format!(
            "Failed to create output directory {}: {e}",
            plugins_dir.display()
        ))
    })?;

    let catalog = CatalogClient::new(&config.catalog_url, config.timeout())?;
    let fetcher = ArtifactFetcher::new(&config.catalog_url, plugins_dir.clone(), config.timeout())?;

    for plugin in &config.plugins {
        info!("Syncing plugin: {}", plugin.id);

        let versions = match catalog.fetch_versions(&plugin.id) {
            Ok(versions) => versions,
            Err(e) => {
                error!("Failed to fetch versions for plugin {}: {}", plugin.id, e);
                continue;
            }
        };

        for version in &versions {
            if !is_compatible(&version.idea_version, &config.intellij.builds) {
                continue;
            }

            info!("Downloading plugin {} version {}", plugin.id, version.version);
            if let Err(e) = fetcher.fetch(&plugin.id, version) {
                error!(
                    "Failed to download plugin {} version {}: {}",
                    plugin.id, version.version, e
                );
            }
        }
    }

    let index_path = plugins_dir.join(INDEX_FILE);
    index::generate_index(&plugins_dir, &index_path, &config.repository_url)?;
    info!("Successfully generated {}", INDEX_FILE);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildRange, IntellijSection};
    use std::path::PathBuf;

    fn test_config(output_dir: PathBuf) -> Config {
        let json = r#"{ "intellij": { "builds": [] }, "plugins": [] }"#;
        let mut config: Config = serde_json::from_str(json).unwrap();
        config.output_dir = output_dir;
        config.intellij = IntellijSection {
            builds: vec![BuildRange {
                since_build: "243".to_string(),
                until_build: "*".to_string(),
            }],
        };
        config
    }

    #[test]
    fn test_sync_with_no_plugins_creates_mirror_and_index() {
        // No plugins configured touches no network; the run must still
        // create the mirror root and write an (empty) index.
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path().join("mirror"));

        sync_plugins(&config).unwrap();

        let index_path = config.plugins_dir().join(INDEX_FILE);
        assert!(index_path.exists());

        let xml = fs::read_to_string(&index_path).unwrap();
        assert!(xml.contains("plugin-repository"));
        assert!(!xml.contains("<idea-plugin"));
    }

    #[test]
    fn test_sync_regenerates_index_over_existing_mirror() {
        // A previously mirrored artifact shows up in the regenerated index
        // even when the current run downloads nothing.
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path().join("mirror"));

        let plugin_dir = config.plugins_dir().join("org.rust.lang").join("1.0");
        fs::create_dir_all(&plugin_dir).unwrap();
        crate::metadata::write_metadata(
            &crate::metadata::ArtifactMetadata {
                id: "org.rust.lang".to_string(),
                version: "1.0".to_string(),
                since_build: "243.1".to_string(),
                until_build: "243.*".to_string(),
                description: "Rust".to_string(),
            },
            &plugin_dir,
        )
        .unwrap();

        sync_plugins(&config).unwrap();

        let xml = fs::read_to_string(config.plugins_dir().join(INDEX_FILE)).unwrap();
        assert!(xml.contains("<id>org.rust.lang</id>"));
        assert!(xml.contains("org.rust.lang-intellij-bin-1.0.zip"));
    }

    #[test]
    fn test_sync_fails_when_index_generation_fails() {
        // A corrupt sidecar makes index generation (and thus the run) fail
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path().join("mirror"));

        let plugin_dir = config.plugins_dir().join("broken").join("1.0");
        fs::create_dir_all(&plugin_dir).unwrap();
        fs::write(plugin_dir.join(crate::metadata::METADATA_FILE), "garbage").unwrap();

        let result = sync_plugins(&config);
        assert!(matches!(result, Err(Error::MetadataReadError(_))));
        assert!(!config.plugins_dir().join(INDEX_FILE).exists());
    }
}
