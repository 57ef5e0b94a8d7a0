//! The staged submission pipeline.
//!
//! One [`SubmissionPipeline`] value covers one submission. The stages run
//! in strict order because each stage's output is the next stage's input:
//!
//! ```text
//! Idle -> Inferring -> Uploading -> Persisting -> Complete(id)
//!             |            |            |
//!             +------------+------------+--> Failed(stage)
//! ```
//!
//! Every stage is attempted at most once per invocation and there is no
//! automatic retry: a half-finished submission (image uploaded, scan not
//! persisted) must never be silently repeated, because re-running the
//! upload would mint a second object. A caller that wants to retry calls
//! [`SubmissionPipeline::resume`], which picks up at the failed stage and
//! reuses the carried artifact URL. [`SubmissionPipeline::reset`] returns
//! to `Idle` from anywhere and never fails.
//!
//! The state field is written *before* each external call, so a caller
//! cancelling at an await point leaves the pipeline parked at the
//! in-flight stage rather than looking complete.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use herdscan_core::error::CoreError;
use herdscan_core::prediction::Prediction;
use herdscan_core::types::DbId;
use herdscan_db::models::scan::{CreateScan, Scan};
use herdscan_db::repositories::ScanRepo;
use herdscan_inference::{Classifier, InferenceError};
use herdscan_storage::{ArtifactStore, StorageError};
use sqlx::PgPool;

use crate::artifact::{artifact_key, probe_image, ImageContent, SCAN_PREFIX};
use crate::location::LocationResolver;

// ---------------------------------------------------------------------------
// States and errors
// ---------------------------------------------------------------------------

/// The three stages that can fail a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Inference,
    Upload,
    Persistence,
}

impl Stage {
    /// Stable name used in logs and error responses.
    pub fn name(self) -> &'static str {
        match self {
            Self::Inference => "inference",
            Self::Upload => "upload",
            Self::Persistence => "persistence",
        }
    }
}

/// Where a submission currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Inferring,
    Uploading,
    Persisting,
    Complete(DbId),
    Failed(Stage),
}

/// A failed submission, tagged with the stage that failed. The underlying
/// message is preserved verbatim so callers can surface stage-specific
/// guidance.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// The payload was rejected before any stage ran. No side effects.
    #[error("Unsupported image payload: {0}")]
    InvalidImage(String),

    /// The pipeline was driven from the wrong state.
    #[error("Invalid pipeline state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to save scan: {0}")]
    Persistence(#[from] ScanStoreError),
}

impl SubmissionError {
    /// The stage this failure is tagged with, if it came from one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Inference(_) => Some(Stage::Inference),
            Self::Storage(_) => Some(Stage::Upload),
            Self::Persistence(_) => Some(Stage::Persistence),
            Self::InvalidImage(_) | Self::InvalidState(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Persistence seam
// ---------------------------------------------------------------------------

/// Error from the scan persistence layer, message preserved.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ScanStoreError(pub String);

/// Persistence seam for the final pipeline stage.
#[async_trait]
pub trait ScanStore: Send + Sync {
    async fn insert_scan(&self, input: &CreateScan) -> Result<Scan, ScanStoreError>;
}

/// Production [`ScanStore`] backed by the scans repository.
pub struct PgScanStore {
    pool: PgPool,
}

impl PgScanStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScanStore for PgScanStore {
    async fn insert_scan(&self, input: &CreateScan) -> Result<Scan, ScanStoreError> {
        ScanRepo::create(&self.pool, input)
            .await
            .map_err(|e| ScanStoreError(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Orchestrates one submission across the classifier, the artifact store
/// and the scan store. Independent submissions get independent pipeline
/// values; there is no shared mutable state between them.
pub struct SubmissionPipeline {
    classifier: Arc<dyn Classifier>,
    store: Arc<dyn ArtifactStore>,
    resolver: Arc<dyn LocationResolver>,
    scans: Arc<dyn ScanStore>,
    state: SubmissionState,
    /// Carried across stages and reused by `resume`.
    predictions: Option<Vec<Prediction>>,
    image_url: Option<String>,
}

impl SubmissionPipeline {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        store: Arc<dyn ArtifactStore>,
        resolver: Arc<dyn LocationResolver>,
        scans: Arc<dyn ScanStore>,
    ) -> Self {
        Self {
            classifier,
            store,
            resolver,
            scans,
            state: SubmissionState::Idle,
            predictions: None,
            image_url: None,
        }
    }

    /// Current state of this submission.
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// The uploaded artifact URL carried for a stage-aware retry, if the
    /// upload stage has completed.
    pub fn artifact_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Return unconditionally to `Idle`, discarding in-flight results.
    /// This is the only transition that never fails.
    pub fn reset(&mut self) {
        self.state = SubmissionState::Idle;
        self.predictions = None;
        self.image_url = None;
    }

    /// Run a full submission from `Idle`.
    ///
    /// On success the pipeline parks in `Complete` and the persisted scan
    /// is returned. On failure it parks in `Failed(stage)`; call
    /// [`resume`](Self::resume) to retry from that stage or
    /// [`reset`](Self::reset) to abandon the attempt.
    pub async fn submit(
        &mut self,
        image: &[u8],
        submitter_id: Option<DbId>,
    ) -> Result<Scan, SubmissionError> {
        if self.state != SubmissionState::Idle {
            return Err(SubmissionError::InvalidState(format!(
                "submit requires an idle pipeline (currently {:?}); call reset first",
                self.state
            )));
        }

        let content = probe(image)?;
        self.infer(image).await?;
        self.upload(image, content).await?;
        self.persist(submitter_id).await
    }

    /// Retry a failed submission from the stage that failed.
    ///
    /// Stages that already completed are not re-run: a submission that
    /// failed at persistence reuses the previously uploaded artifact URL
    /// rather than minting a second object.
    pub async fn resume(
        &mut self,
        image: &[u8],
        submitter_id: Option<DbId>,
    ) -> Result<Scan, SubmissionError> {
        match self.state {
            // Inference failed before any side effect; start over.
            SubmissionState::Failed(Stage::Inference) => {
                self.reset();
                self.submit(image, submitter_id).await
            }
            SubmissionState::Failed(Stage::Upload) => {
                let content = probe(image)?;
                self.upload(image, content).await?;
                self.persist(submitter_id).await
            }
            SubmissionState::Failed(Stage::Persistence) => self.persist(submitter_id).await,
            other => Err(SubmissionError::InvalidState(format!(
                "resume requires a failed pipeline (currently {other:?})"
            ))),
        }
    }

    async fn infer(&mut self, image: &[u8]) -> Result<(), SubmissionError> {
        self.state = SubmissionState::Inferring;
        match self.classifier.classify(image).await {
            Ok(predictions) => {
                self.predictions = Some(predictions);
                Ok(())
            }
            Err(e) => {
                self.state = SubmissionState::Failed(Stage::Inference);
                tracing::warn!(error = %e, stage = Stage::Inference.name(), "Submission stage failed");
                Err(e.into())
            }
        }
    }

    async fn upload(&mut self, image: &[u8], content: ImageContent) -> Result<(), SubmissionError> {
        self.state = SubmissionState::Uploading;
        let key = artifact_key(SCAN_PREFIX, Utc::now(), content.extension);
        match self.store.upload(&key, image, content.mime).await {
            Ok(url) => {
                self.image_url = Some(url);
                Ok(())
            }
            Err(e) => {
                self.state = SubmissionState::Failed(Stage::Upload);
                tracing::warn!(error = %e, stage = Stage::Upload.name(), "Submission stage failed");
                Err(e.into())
            }
        }
    }

    async fn persist(&mut self, submitter_id: Option<DbId>) -> Result<Scan, SubmissionError> {
        let (predictions, image_url) = match (&self.predictions, &self.image_url) {
            (Some(p), Some(u)) => (p.clone(), u.clone()),
            _ => {
                return Err(SubmissionError::InvalidState(
                    "no carried results to persist; reset and resubmit".into(),
                ))
            }
        };

        self.state = SubmissionState::Persisting;

        // Best-effort enrichment: a resolver failure degrades to "no
        // location", never to a pipeline failure.
        let location = match self.resolver.resolve().await {
            Ok(point) => Some(point),
            Err(e) => {
                tracing::warn!(error = %e, "Location resolution failed; saving scan without location");
                None
            }
        };

        let input = CreateScan {
            image_url,
            predictions,
            location,
            submitter_id,
        };

        match self.scans.insert_scan(&input).await {
            Ok(scan) => {
                self.state = SubmissionState::Complete(scan.id);
                tracing::info!(scan_id = scan.id, "Submission complete");
                Ok(scan)
            }
            Err(e) => {
                self.state = SubmissionState::Failed(Stage::Persistence);
                // The uploaded object now has no scan row pointing at it.
                // It is not deleted here: a stage-aware resume may still
                // persist this exact URL. The orphan sweep reports it if
                // nothing ever does.
                tracing::warn!(
                    error = %e,
                    stage = Stage::Persistence.name(),
                    orphaned_url = %input.image_url,
                    "Submission stage failed; uploaded artifact is orphaned until resumed"
                );
                Err(e.into())
            }
        }
    }
}

/// Probe the payload, mapping a validation failure into the pipeline's
/// error type. Runs before the first stage, so rejection has no side
/// effects.
fn probe(image: &[u8]) -> Result<ImageContent, SubmissionError> {
    probe_image(image).map_err(|e| match e {
        CoreError::Validation(msg) => SubmissionError::InvalidImage(msg),
        other => SubmissionError::InvalidImage(other.to_string()),
    })
}
