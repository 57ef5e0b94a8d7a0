//! HTTP client for the remote classifier.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use herdscan_core::error::CoreError;
use herdscan_core::prediction::{normalize_predictions, Prediction};

/// Anything that can classify an image into a ranked prediction list.
///
/// Implementations return the list already normalized (descending by
/// confidence, ties broken by ascending label, unique labels).
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<Vec<Prediction>, InferenceError>;
}

/// Errors from the remote classifier. A non-success response or a garbled
/// body is a typed failure here, never a panic.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// The service could not be reached (connect failure, timeout).
    #[error("Classifier unreachable: {0}")]
    Unreachable(String),

    /// The service answered with a non-success status.
    #[error("Classifier returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response decoded but is unusable (empty map, out-of-range or
    /// non-finite confidences, blank labels).
    #[error("Classifier returned an unusable result: {0}")]
    Malformed(String),
}

/// Client for a classifier exposed as a single HTTP endpoint taking raw
/// image bytes and answering with a JSON `label -> confidence` object.
pub struct HttpClassifier {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpClassifier {
    /// Create a client targeting `endpoint` with a per-request timeout.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed, which
    /// only happens with an invalid TLS/system configuration at startup.
    pub fn new(endpoint: String, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build classifier HTTP client");
        Self { endpoint, http }
    }

    /// Classifier endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, image: &[u8]) -> Result<Vec<Prediction>, InferenceError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| InferenceError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let scores: HashMap<String, f64> = response
            .json()
            .await
            .map_err(|e| InferenceError::Malformed(e.to_string()))?;

        let predictions = normalize_predictions(scores).map_err(|e| match e {
            CoreError::Validation(msg) => InferenceError::Malformed(msg),
            other => InferenceError::Malformed(other.to_string()),
        })?;

        tracing::debug!(
            label = %predictions[0].label,
            confidence = predictions[0].confidence,
            candidates = predictions.len(),
            "Classifier produced predictions"
        );

        Ok(predictions)
    }
}
