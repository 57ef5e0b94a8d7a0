//! Durable, content-addressed-by-name artifact storage.
//!
//! [`ArtifactStore`] is the seam the pipeline and bulk import depend on;
//! the S3 and local-filesystem backends implement it. Once an object is
//! uploaded its public URL is a pure function of its key.

pub mod local;
pub mod s3;

use async_trait::async_trait;

pub use local::LocalArtifactStore;
pub use s3::S3ArtifactStore;

/// Object storage for submitted images.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store `bytes` under `key` and return the publicly resolvable URL.
    async fn upload(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Public URL for an already-uploaded key. Pure and non-failing.
    fn public_url(&self, key: &str) -> String;

    /// List stored keys under a prefix. Used by the orphan sweep.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// Errors from an artifact storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend refused the object (quota, policy, invalid key).
    #[error("Upload rejected: {0}")]
    Rejected(String),

    /// The backend or the network failed.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Local filesystem failure.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}
