//! Bulk import of confirmed reference images.
//!
//! A moderator uploads a batch of images that are already known to show a
//! given breed (no source scan involved). The batch is all-or-nothing on
//! the upload side: if any single upload fails, the operation stops before
//! any row is inserted, so a half-applied batch cannot exist.

use chrono::Utc;
use herdscan_core::error::CoreError;
use herdscan_core::types::DbId;
use herdscan_db::models::confirmed_breed::{ConfirmedBreed, CreateConfirmedBreed};
use herdscan_db::repositories::{BreedRepo, ConfirmedBreedRepo};
use herdscan_storage::{ArtifactStore, StorageError};
use sqlx::PgPool;

use crate::artifact::{artifact_key, probe_image, REFERENCE_PREFIX};

/// Errors from a bulk import.
#[derive(Debug, thiserror::Error)]
pub enum BulkImportError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// One upload failed; the batch stopped and nothing was inserted.
    #[error("Upload {index} of {total} failed: {source}")]
    Upload {
        index: usize,
        total: usize,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Upload every image, then insert one confirmed breed per image in a
/// single batch, all attributed to `moderator_id`.
///
/// Fail-fast: validation and every upload happen before the first insert.
pub async fn import_confirmed(
    pool: &PgPool,
    store: &dyn ArtifactStore,
    breed_name: &str,
    images: &[Vec<u8>],
    moderator_id: DbId,
) -> Result<Vec<ConfirmedBreed>, BulkImportError> {
    let breed_name = breed_name.trim();
    if breed_name.is_empty() {
        return Err(CoreError::Precondition("Select a breed before importing".into()).into());
    }
    if images.is_empty() {
        return Err(CoreError::Precondition("No images in the batch".into()).into());
    }
    if !BreedRepo::exists(pool, breed_name).await? {
        return Err(CoreError::Validation(format!("Unknown breed '{breed_name}'")).into());
    }

    // Probe everything up front so a garbled payload aborts before any
    // object is created.
    let mut contents = Vec::with_capacity(images.len());
    for (i, image) in images.iter().enumerate() {
        let content = probe_image(image).map_err(|e| {
            CoreError::Validation(format!("Image {} of {}: {e}", i + 1, images.len()))
        })?;
        contents.push(content);
    }

    let total = images.len();
    let mut entries = Vec::with_capacity(total);
    for (i, (image, content)) in images.iter().zip(&contents).enumerate() {
        let key = artifact_key(REFERENCE_PREFIX, Utc::now(), content.extension);
        let url = store
            .upload(&key, image, content.mime)
            .await
            .map_err(|source| BulkImportError::Upload {
                index: i + 1,
                total,
                source,
            })?;

        entries.push(CreateConfirmedBreed {
            scan_id: None,
            image_url: url,
            breed_name: breed_name.to_string(),
        });
    }

    let rows = ConfirmedBreedRepo::batch_insert(pool, moderator_id, &entries).await?;

    tracing::info!(
        breed = %breed_name,
        count = rows.len(),
        moderator_id,
        "Bulk import committed"
    );

    Ok(rows)
}
