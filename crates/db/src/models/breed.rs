//! Breed vocabulary entity model and DTOs.

use herdscan_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `breeds` table. Taxonomy columns hold members of the
/// closed enumerations in `herdscan_core::taxonomy`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Breed {
    pub name: String,
    pub species: String,
    pub breed_status: String,
    pub temperament: String,
    pub conservation_status: String,
    pub milk_yield_min: Option<f64>,
    pub milk_yield_max: Option<f64>,
    pub milk_yield_unit: Option<String>,
    pub body_weight_min: Option<f64>,
    pub body_weight_max: Option<f64>,
    pub body_weight_unit: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new breed.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBreed {
    pub name: String,
    pub species: String,
    pub breed_status: String,
    pub temperament: String,
    pub conservation_status: String,
    pub milk_yield_min: Option<f64>,
    pub milk_yield_max: Option<f64>,
    pub milk_yield_unit: Option<String>,
    pub body_weight_min: Option<f64>,
    pub body_weight_max: Option<f64>,
    pub body_weight_unit: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// DTO for updating an existing breed. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBreed {
    pub species: Option<String>,
    pub breed_status: Option<String>,
    pub temperament: Option<String>,
    pub conservation_status: Option<String>,
    pub milk_yield_min: Option<f64>,
    pub milk_yield_max: Option<f64>,
    pub milk_yield_unit: Option<String>,
    pub body_weight_min: Option<f64>,
    pub body_weight_max: Option<f64>,
    pub body_weight_unit: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}
