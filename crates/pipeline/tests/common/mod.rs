//! Shared test doubles for the pipeline's adapter seams.
//!
//! Each stub counts its calls and can be told to fail, so tests can
//! inject a failure at exactly one stage and assert what the earlier and
//! later stages did (or never did).

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use herdscan_core::geo::GeoPoint;
use herdscan_core::prediction::{normalize_predictions, Prediction};
use herdscan_db::models::scan::{CreateScan, Scan};
use herdscan_inference::{Classifier, InferenceError};
use herdscan_pipeline::location::{LocationError, LocationResolver};
use herdscan_pipeline::submission::{ScanStore, ScanStoreError};
use herdscan_storage::{ArtifactStore, StorageError};
use sqlx::types::Json;

/// PNG file header; enough for format probing.
pub const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Classifier stub answering with a fixed Gir/Sahiwal ranking.
pub struct StubClassifier {
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

impl StubClassifier {
    pub fn ok() -> Self {
        Self {
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<Vec<Prediction>, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(InferenceError::Status {
                status: 503,
                body: "model warming up".into(),
            });
        }
        Ok(normalize_predictions(vec![
            ("Sahiwal".to_string(), 10.1),
            ("Gir".to_string(), 82.3),
        ])
        .unwrap())
    }
}

/// Classifier stub whose call never completes, for cancellation tests.
pub struct PendingClassifier;

#[async_trait]
impl Classifier for PendingClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<Vec<Prediction>, InferenceError> {
        std::future::pending().await
    }
}

// ---------------------------------------------------------------------------
// Artifact store
// ---------------------------------------------------------------------------

/// In-memory artifact store that can fail at a chosen call.
pub struct StubStore {
    pub uploads: Mutex<Vec<String>>,
    /// 1-indexed upload call that should fail, if any.
    pub fail_at: Option<usize>,
    pub calls: AtomicUsize,
}

impl StubStore {
    pub fn ok() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            fail_at: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_at(call: usize) -> Self {
        Self {
            fail_at: Some(call),
            ..Self::ok()
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl ArtifactStore for StubStore {
    async fn upload(
        &self,
        key: &str,
        _bytes: &[u8],
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_at == Some(call) {
            return Err(StorageError::Backend("disk full".into()));
        }
        self.uploads.lock().unwrap().push(key.to_string());
        Ok(self.public_url(key))
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.test/{key}")
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .uploads
            .lock()
            .unwrap()
            .iter()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Location resolver
// ---------------------------------------------------------------------------

/// Resolver stub with a fixed coordinate or a permanent failure.
pub struct StubResolver {
    pub fail: bool,
}

#[async_trait]
impl LocationResolver for StubResolver {
    async fn resolve(&self) -> Result<GeoPoint, LocationError> {
        if self.fail {
            return Err(LocationError::Unreachable("gps off".into()));
        }
        Ok(GeoPoint {
            latitude: 23.0225,
            longitude: 72.5714,
            accuracy_radius: 30.0,
        })
    }
}

// ---------------------------------------------------------------------------
// Scan store
// ---------------------------------------------------------------------------

/// In-memory scan store with togglable failure.
pub struct MemoryScanStore {
    pub fail: AtomicBool,
    pub inserted: Mutex<Vec<CreateScan>>,
}

impl MemoryScanStore {
    pub fn ok() -> Self {
        Self {
            fail: AtomicBool::new(false),
            inserted: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: AtomicBool::new(true),
            inserted: Mutex::new(Vec::new()),
        }
    }

    pub fn insert_count(&self) -> usize {
        self.inserted.lock().unwrap().len()
    }
}

#[async_trait]
impl ScanStore for MemoryScanStore {
    async fn insert_scan(&self, input: &CreateScan) -> Result<Scan, ScanStoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ScanStoreError("connection refused".into()));
        }

        let mut inserted = self.inserted.lock().unwrap();
        inserted.push(input.clone());

        Ok(Scan {
            id: inserted.len() as i64,
            image_url: input.image_url.clone(),
            predictions: Json(input.predictions.clone()),
            latitude: input.location.map(|g| g.latitude),
            longitude: input.location.map(|g| g.longitude),
            accuracy_radius: input.location.map(|g| g.accuracy_radius),
            submitter_id: input.submitter_id,
            was_helpful: None,
            flagged: false,
            flag_reason: None,
            created_at: Utc::now(),
        })
    }
}
