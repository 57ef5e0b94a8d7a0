//! Coordinate types for best-effort location enrichment.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A resolved coordinate with its accuracy radius in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_radius: f64,
}

impl GeoPoint {
    /// Reject coordinates outside the WGS84 envelope or with a negative
    /// accuracy radius.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CoreError::Validation(format!(
                "Latitude {} is outside -90..90",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CoreError::Validation(format!(
                "Longitude {} is outside -180..180",
                self.longitude
            )));
        }
        if !self.accuracy_radius.is_finite() || self.accuracy_radius < 0.0 {
            return Err(CoreError::Validation(format!(
                "Accuracy radius {} must be non-negative",
                self.accuracy_radius
            )));
        }
        Ok(())
    }
}
