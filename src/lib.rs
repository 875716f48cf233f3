// src/lib.rs

//! Jetmirror
//!
//! Offline mirror for JetBrains IDE plugins. Queries the remote plugin
//! catalog per configured plugin, filters versions by build-range
//! compatibility with the configured IDE builds, downloads compatible
//! artifacts, and regenerates an `index.xml` repository index the IDE
//! consumes to discover the mirror. A static file server exposes the
//! mirrored tree over HTTP.
//!
//! # Architecture
//!
//! - Filesystem as source of truth: the index is always rebuilt by
//!   rescanning persisted metadata sidecars, never patched incrementally
//! - Atomic artifact persistence: each zip + sidecar pair is staged and
//!   renamed into place in one step
//! - Two-tier failure policy: per-plugin and per-version failures are
//!   logged and skipped; setup and index failures abort the run

pub mod catalog;
pub mod compat;
pub mod config;
pub mod download;
mod error;
pub mod index;
pub mod metadata;
pub mod server;
pub mod sync;

pub use catalog::{BuildSpan, CatalogClient, PluginVersion, parse_catalog};
pub use compat::is_compatible;
pub use config::{BuildRange, Config, DEFAULT_CONFIG_PATH, PluginEntry};
pub use download::ArtifactFetcher;
pub use error::{Error, Result};
pub use index::{RepositoryIndex, build_index, collect_metadata, generate_index};
pub use metadata::{ArtifactMetadata, METADATA_FILE};
pub use sync::{INDEX_FILE, sync_plugins};
