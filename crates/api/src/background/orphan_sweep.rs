//! Periodic report of orphaned storage objects.
//!
//! A submission that uploads its image but fails at the persistence stage
//! leaves an object referenced by no scan. Those objects are deliberately
//! never deleted (a stage-aware resume may still claim one); this job
//! makes them visible to operators instead of letting them pile up
//! silently. Runs on a fixed interval using `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use herdscan_storage::{ArtifactStore, StorageError};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the sweep runs by default: every 6 hours.
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 6 * 3600;

/// Errors from one sweep pass.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Run the orphan sweep loop until `cancel` is triggered.
///
/// The interval can be overridden with `ORPHAN_SWEEP_INTERVAL_SECS`.
pub async fn run(pool: PgPool, artifacts: Arc<dyn ArtifactStore>, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("ORPHAN_SWEEP_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);

    tracing::info!(interval_secs, "Orphan sweep started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Orphan sweep stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep(&pool, artifacts.as_ref()).await {
                    Ok(orphans) if orphans.is_empty() => {
                        tracing::debug!("Orphan sweep: no orphaned artifacts");
                    }
                    Ok(orphans) => {
                        tracing::warn!(count = orphans.len(), "Orphan sweep: orphaned artifacts found");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Orphan sweep failed");
                    }
                }
            }
        }
    }
}

/// One sweep pass: list every stored object and report those referenced
/// by neither `scans` nor `confirmed_breeds`.
///
/// Reports only; nothing is deleted.
pub async fn sweep(
    pool: &PgPool,
    artifacts: &dyn ArtifactStore,
) -> Result<Vec<String>, SweepError> {
    let keys = artifacts.list("").await?;
    let mut orphans = Vec::new();

    for key in keys {
        let url = artifacts.public_url(&key);
        let referenced = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM scans WHERE image_url = $1)
                 OR EXISTS (SELECT 1 FROM confirmed_breeds WHERE image_url = $1)",
        )
        .bind(&url)
        .fetch_one(pool)
        .await?;

        if !referenced {
            tracing::warn!(key = %key, url = %url, "Orphaned artifact: stored object has no referencing record");
            orphans.push(key);
        }
    }

    Ok(orphans)
}
