//! Binary object storage for reel videos.
//!
//! Uploads are keyed as `<owner>/<unix-millis>.<ext>` and resolve to a
//! public URL under the configured base URL.

use crate::error::{Result, StoreError};
use crate::types::UserId;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `bytes` and return the public URL of the object.
    async fn upload(&self, owner: UserId, file_name: &str, bytes: &[u8]) -> Result<String>;
}

/// Object key for an upload: the owner's folder plus a timestamped name that
/// keeps the original extension.
pub fn object_key(owner: UserId, file_name: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    match Path::new(file_name).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{owner}/{millis}.{}", ext.to_ascii_lowercase()),
        _ => format!("{owner}/{millis}"),
    }
}

/// `MediaStore` writing objects under a local directory.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    public_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn upload(&self, owner: UserId, file_name: &str, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(StoreError::Constraint(format!("empty upload: {file_name}")));
        }

        let key = object_key(owner, file_name);
        let path = self.root.join(&key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        let url = format!("{}/{}", self.public_url, key);
        info!("Uploaded {} bytes for {} to {}", bytes.len(), owner, url);
        Ok(url)
    }
}
