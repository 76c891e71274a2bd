//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Create `dir` (and parents) if it does not exist yet.
pub async fn ensure_dir(dir: impl AsRef<Path>) -> anyhow::Result<()> {
    let dir = dir.as_ref();
    if tokio::fs::metadata(dir).await.is_ok() {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    info!(dir = %dir.display(), "created directory");
    Ok(())
}

/// Ensure the content directory exists; a relative path is resolved against the cwd.
pub async fn ensure_env(upload_dir: &str) -> anyhow::Result<()> {
    if Path::new(upload_dir).is_relative() {
        warn!(%upload_dir, "upload directory is relative to the working directory");
    }
    ensure_dir(upload_dir).await
}
