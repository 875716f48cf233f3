// src/catalog.rs

//! Remote plugin catalog client
//!
//! Fetches the version list for one plugin from the catalog's
//! `/plugins/list` endpoint and flattens the nested
//! `plugin-repository > category > idea-plugin` XML response into a single
//! ordered `Vec<PluginVersion>`.

use crate::error::{Error, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// A plugin version's declared compatibility span, as reported by the
/// catalog's `idea-version` attributes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildSpan {
    #[serde(rename = "@since-build", default)]
    pub since_build: String,
    #[serde(rename = "@until-build", default)]
    pub until_build: String,
}

/// One version of one plugin as reported by the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct PluginVersion {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "idea-version", default)]
    pub idea_version: BuildSpan,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogCategory {
    #[serde(rename = "idea-plugin", default)]
    plugins: Vec<PluginVersion>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogDocument {
    #[serde(rename = "category", default)]
    categories: Vec<CatalogCategory>,
}

/// Parse a catalog XML response body into a flat version list.
///
/// Category order is preserved, then entry order within each category.
pub fn parse_catalog(body: &str) -> Result<Vec<PluginVersion>> {
    let document: CatalogDocument = quick_xml::de::from_str(body)
        .map_err(|e| Error::DecodeError(format!("Invalid catalog XML: {e}")))?;

    Ok(document
        .categories
        .into_iter()
        .flat_map(|category| category.plugins)
        .collect())
}

/// HTTP client for the remote plugin catalog
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a catalog client with the given base URL and request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch all published versions of a plugin
    pub fn fetch_versions(&self, plugin_id: &str) -> Result<Vec<PluginVersion>> {
        let url = format!("{}/plugins/list?pluginId={}", self.base_url, plugin_id);
        debug!("Fetching plugin versions from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Error::FetchError(format!("Request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            // Keep the response body for diagnostics
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::FetchError(format!("HTTP {status} from {url}: {body}")));
        }

        let body = response
            .text()
            .map_err(|e| Error::FetchError(format!("Failed to read response from {url}: {e}")))?;

        let versions = parse_catalog(&body)?;
        debug!("Catalog returned {} versions for {}", versions.len(), plugin_id);
        Ok(versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plugin-repository>
  <category name="Languages">
    <idea-plugin downloads="100" size="12345">
      <name>Rust</name>
      <id>org.rust.lang</id>
      <version>243.1.5</version>
      <idea-version since-build="243.1" until-build="243.*"/>
      <url>https://plugins.example.com/files/rust.zip</url>
      <description>Rust language support</description>
    </idea-plugin>
    <idea-plugin>
      <version>241.0.1</version>
      <idea-version since-build="241" until-build="241.*"/>
      <description>Older build</description>
    </idea-plugin>
  </category>
  <category name="Tools">
    <idea-plugin>
      <version>1.2.3</version>
      <idea-version since-build="230" until-build=""/>
    </idea-plugin>
  </category>
</plugin-repository>"#;

    #[test]
    fn test_parse_catalog_flattens_categories_in_order() {
        let versions = parse_catalog(SAMPLE).unwrap();
        assert_eq!(versions.len(), 3);
        assert_eq!(versions[0].version, "243.1.5");
        assert_eq!(versions[1].version, "241.0.1");
        assert_eq!(versions[2].version, "1.2.3");
    }

    #[test]
    fn test_parse_catalog_reads_idea_version_attributes() {
        let versions = parse_catalog(SAMPLE).unwrap();
        assert_eq!(versions[0].idea_version.since_build, "243.1");
        assert_eq!(versions[0].idea_version.until_build, "243.*");
        assert_eq!(versions[2].idea_version.until_build, "");
    }

    #[test]
    fn test_parse_catalog_optional_fields_default_empty() {
        let versions = parse_catalog(SAMPLE).unwrap();
        assert_eq!(versions[1].url, "");
        assert_eq!(versions[2].description, "");
        assert_eq!(
            versions[0].url,
            "https://plugins.example.com/files/rust.zip"
        );
    }

    #[test]
    fn test_parse_empty_repository() {
        let versions = parse_catalog("<plugin-repository></plugin-repository>").unwrap();
        assert!(versions.is_empty());
    }

    #[test]
    fn test_parse_malformed_xml_is_decode_error() {
        let result = parse_catalog("<plugin-repository><category>");
        assert!(matches!(result, Err(Error::DecodeError(_))));
    }
}
