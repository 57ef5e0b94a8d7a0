//! Submission pipeline and moderation reconciliation.
//!
//! This crate owns the two flows with real sequencing and consistency
//! concerns:
//!
//! - [`submission`]: the staged pipeline turning a raw image into a
//!   persisted scan (inference -> upload -> persist), with an explicit
//!   state machine, stage-tagged failures and a stage-aware retry.
//! - [`reconcile`]: the moderation views over unconfirmed and confirmed
//!   scans, plus the confirm/unconfirm commit operations.
//! - [`bulk`]: fail-fast bulk import of confirmed reference images.

pub mod artifact;
pub mod bulk;
pub mod location;
pub mod reconcile;
pub mod submission;

pub use bulk::{import_confirmed, BulkImportError};
pub use location::{HttpLocationResolver, LocationError, LocationResolver, NullLocationResolver};
pub use reconcile::{
    confirm, confirmed_page, unconfirm, unconfirmed_page, ConfirmedQuery, ReconcileError,
    UnconfirmedQuery, PAGE_SIZE,
};
pub use submission::{
    PgScanStore, ScanStore, ScanStoreError, Stage, SubmissionError, SubmissionPipeline,
    SubmissionState,
};
