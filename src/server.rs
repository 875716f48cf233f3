// src/server.rs

//! Static file server for the mirror directory
//!
//! Serves the mirror root verbatim over plain HTTP so a matching IDE can
//! fetch `plugins/index.xml` and the artifacts it references. No routing
//! logic beyond directory serving.

use crate::error::{Error, Result};
use axum::Router;
use std::path::PathBuf;
use tower_http::services::ServeDir;
use tracing::info;

/// Serve `root` at path `/` on `0.0.0.0:port` until the process exits
pub async fn serve(root: PathBuf, port: u16) -> Result<()> {
    let app = Router::new().fallback_service(ServeDir::new(&root));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| Error::InitError(format!("Failed to bind port {port}: {e}")))?;

    info!(
        "Starting plugin server for {} on http://localhost:{}",
        root.display(),
        port
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::InitError(format!("Server error: {e}")))
}
