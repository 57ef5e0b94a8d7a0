//! Best-effort location acquisition.
//!
//! Location is enrichment only: every caller treats a resolver failure as
//! "no location" and moves on. Nothing in the pipeline blocks on it.

use std::time::Duration;

use async_trait::async_trait;
use herdscan_core::geo::GeoPoint;

/// Errors from a location source. Non-fatal to every caller.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location service unreachable: {0}")]
    Unreachable(String),

    #[error("Location service returned status {0}")]
    Status(u16),

    #[error("Location service returned an unusable result: {0}")]
    Malformed(String),
}

/// A source of submitter coordinates.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve(&self) -> Result<GeoPoint, LocationError>;
}

/// Resolver backed by an HTTP endpoint answering with
/// `{latitude, longitude, accuracy_radius}`.
pub struct HttpLocationResolver {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpLocationResolver {
    /// Create a resolver targeting `endpoint` with a per-request timeout.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed, which
    /// only happens with an invalid TLS/system configuration at startup.
    pub fn new(endpoint: String, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build location HTTP client");
        Self { endpoint, http }
    }
}

#[async_trait]
impl LocationResolver for HttpLocationResolver {
    async fn resolve(&self) -> Result<GeoPoint, LocationError> {
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| LocationError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LocationError::Status(status.as_u16()));
        }

        let point: GeoPoint = response
            .json()
            .await
            .map_err(|e| LocationError::Malformed(e.to_string()))?;

        point
            .validate()
            .map_err(|e| LocationError::Malformed(e.to_string()))?;

        Ok(point)
    }
}

/// Resolver for deployments without any location source: always fails,
/// which callers degrade to "no location".
pub struct NullLocationResolver;

#[async_trait]
impl LocationResolver for NullLocationResolver {
    async fn resolve(&self) -> Result<GeoPoint, LocationError> {
        Err(LocationError::Unreachable(
            "no location resolver configured".into(),
        ))
    }
}
