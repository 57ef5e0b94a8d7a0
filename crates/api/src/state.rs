use std::sync::Arc;

use herdscan_inference::Classifier;
use herdscan_pipeline::location::LocationResolver;
use herdscan_pipeline::submission::{PgScanStore, SubmissionPipeline};
use herdscan_storage::ArtifactStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: herdscan_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Remote breed classifier.
    pub classifier: Arc<dyn Classifier>,
    /// Artifact storage backend.
    pub artifacts: Arc<dyn ArtifactStore>,
    /// Best-effort location source.
    pub location: Arc<dyn LocationResolver>,
}

impl AppState {
    /// Build a fresh pipeline for one submission.
    ///
    /// Each request gets its own pipeline value, so concurrent
    /// submissions share nothing mutable.
    pub fn new_pipeline(&self) -> SubmissionPipeline {
        SubmissionPipeline::new(
            self.classifier.clone(),
            self.artifacts.clone(),
            self.location.clone(),
            Arc::new(PgScanStore::new(self.pool.clone())),
        )
    }
}
