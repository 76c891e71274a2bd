//! Content directory for uploaded listing images.
//!
//! Files are written under a freshly generated name; the client's file name
//! only contributes its extension, so it can neither collide with nor escape
//! the directory.

use std::path::PathBuf;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

pub const DEFAULT_EXTENSION: &str = ".jpg";
const MAX_EXTENSION_LEN: usize = 10;

/// Failure reported by the incoming byte stream, kept intact for the caller.
pub type StreamError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to save image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read uploaded image: {0}")]
    Read(#[source] StreamError),
}

/// Where an image ended up: the generated file name and its public path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub file_name: String,
    pub public_path: String,
}

/// Extension of the client-supplied name (with the dot) if it looks like one.
pub fn recognizable_extension(original: &str) -> Option<String> {
    // only the last path component counts, whichever separator the client used
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(format!(".{ext}"))
}

/// `<32 hex chars><ext>`, defaulting the extension to `.jpg`.
pub fn safe_file_name(original: Option<&str>) -> String {
    let ext = original
        .and_then(recognizable_extension)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    format!("{}{}", Uuid::new_v4().simple(), ext)
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    public_prefix: String,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        let public_prefix = public_prefix.into().trim_end_matches('/').to_string();
        Self { dir: dir.into(), public_prefix }
    }

    pub fn public_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_prefix, file_name)
    }

    /// Stream `chunks` into a new file. A file whose stream fails midway is removed.
    pub async fn save_stream<S, E>(&self, original: Option<&str>, chunks: S) -> Result<SavedImage, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<StreamError>,
    {
        let file_name = safe_file_name(original);
        let path = self.dir.join(&file_name);
        let io_err = |source| UploadError::Io { path: path.clone(), source };

        let mut file = fs::File::create(&path).await.map_err(io_err)?;
        let mut written = 0usize;
        futures::pin_mut!(chunks);
        while let Some(chunk) = chunks.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    drop(file);
                    if let Err(rm) = fs::remove_file(&path).await {
                        warn!(file = %file_name, error = %rm, "failed to remove partial image");
                    }
                    return Err(UploadError::Read(e.into()));
                }
            };
            file.write_all(&chunk).await.map_err(io_err)?;
            written += chunk.len();
        }
        file.flush().await.map_err(io_err)?;

        debug!(file = %file_name, bytes = written, "image saved");
        Ok(SavedImage { public_path: self.public_path(&file_name), file_name })
    }

    /// Best-effort removal of files written by a request whose insert failed.
    pub async fn discard(&self, images: &[SavedImage]) {
        for image in images {
            let path = self.dir.join(&image.file_name);
            if let Err(e) = fs::remove_file(&path).await {
                warn!(file = %image.file_name, error = %e, "failed to remove orphaned image");
            }
        }
    }
}
