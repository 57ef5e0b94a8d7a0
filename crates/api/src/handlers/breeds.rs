//! Handlers for the breed vocabulary and ancestry edges.
//!
//! Writes validate against the closed taxonomy enumerations before
//! touching the database; the table CHECK constraints are the backstop.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use herdscan_core::error::CoreError;
use herdscan_core::taxonomy::{
    validate_contribution_pct, validate_measure_range, BreedStatus, ConservationStatus, Species,
    Temperament,
};
use herdscan_core::types::DbId;
use herdscan_db::models::breed::{Breed, CreateBreed, UpdateBreed};
use herdscan_db::models::breed_origin::{BreedOrigin, CreateBreedOrigin};
use herdscan_db::repositories::{BreedOriginRepo, BreedRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireModerator;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/breeds
pub async fn list_breeds(State(state): State<AppState>) -> AppResult<Json<Vec<Breed>>> {
    let breeds = BreedRepo::list_all(&state.pool).await?;
    Ok(Json(breeds))
}

/// GET /api/v1/breeds/{name}
pub async fn get_breed(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Breed>> {
    let breed = BreedRepo::find_by_name(&state.pool, &name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Breed '{name}' not found")))?;
    Ok(Json(breed))
}

/// POST /api/v1/breeds
pub async fn create_breed(
    State(state): State<AppState>,
    RequireModerator(_user): RequireModerator,
    Json(input): Json<CreateBreed>,
) -> AppResult<(StatusCode, Json<Breed>)> {
    validate_create(&input)?;
    let breed = BreedRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(breed)))
}

/// PATCH /api/v1/breeds/{name}
pub async fn update_breed(
    State(state): State<AppState>,
    RequireModerator(_user): RequireModerator,
    Path(name): Path<String>,
    Json(input): Json<UpdateBreed>,
) -> AppResult<Json<Breed>> {
    validate_update(&input)?;
    let breed = BreedRepo::update(&state.pool, &name, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Breed '{name}' not found")))?;
    Ok(Json(breed))
}

/// DELETE /api/v1/breeds/{name}
///
/// Fails with 409 while confirmed breeds still reference the name.
pub async fn delete_breed(
    State(state): State<AppState>,
    RequireModerator(_user): RequireModerator,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    if BreedRepo::delete(&state.pool, &name).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Breed '{name}' not found")))
    }
}

/// GET /api/v1/breeds/{name}/origins
pub async fn list_origins(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Vec<BreedOrigin>>> {
    let origins = BreedOriginRepo::list_for_breed(&state.pool, &name).await?;
    Ok(Json(origins))
}

/// POST /api/v1/breeds/{name}/origins
pub async fn create_origin(
    State(state): State<AppState>,
    RequireModerator(_user): RequireModerator,
    Path(name): Path<String>,
    Json(input): Json<CreateBreedOrigin>,
) -> AppResult<(StatusCode, Json<BreedOrigin>)> {
    validate_contribution_pct(input.contribution_pct)?;

    if input.parent_breed_name == name {
        return Err(CoreError::Validation(
            "A breed cannot descend from itself".into(),
        )
        .into());
    }
    if !BreedRepo::exists(&state.pool, &input.parent_breed_name).await? {
        return Err(CoreError::Validation(format!(
            "Unknown parent breed '{}'",
            input.parent_breed_name
        ))
        .into());
    }

    let origin = BreedOriginRepo::create(&state.pool, &name, &input).await?;
    Ok((StatusCode::CREATED, Json(origin)))
}

/// DELETE /api/v1/breeds/{name}/origins/{id}
pub async fn delete_origin(
    State(state): State<AppState>,
    RequireModerator(_user): RequireModerator,
    Path((_name, id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    if BreedOriginRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "breed origin",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_create(input: &CreateBreed) -> Result<(), CoreError> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Breed name must not be empty".into()));
    }

    Species::from_name(&input.species)?;
    BreedStatus::from_name(&input.breed_status)?;
    Temperament::from_name(&input.temperament)?;
    ConservationStatus::from_name(&input.conservation_status)?;

    validate_measure_range(
        "milk_yield",
        input.milk_yield_min,
        input.milk_yield_max,
        input.milk_yield_unit.as_deref(),
    )?;
    validate_measure_range(
        "body_weight",
        input.body_weight_min,
        input.body_weight_max,
        input.body_weight_unit.as_deref(),
    )?;

    Ok(())
}

fn validate_update(input: &UpdateBreed) -> Result<(), CoreError> {
    if let Some(ref species) = input.species {
        Species::from_name(species)?;
    }
    if let Some(ref status) = input.breed_status {
        BreedStatus::from_name(status)?;
    }
    if let Some(ref temperament) = input.temperament {
        Temperament::from_name(temperament)?;
    }
    if let Some(ref conservation) = input.conservation_status {
        ConservationStatus::from_name(conservation)?;
    }

    // Partial updates can only tighten what they carry; cross-field
    // consistency against stored values is the CHECK constraint's job.
    validate_measure_range(
        "milk_yield",
        input.milk_yield_min,
        input.milk_yield_max,
        input.milk_yield_unit.as_deref().or(Some("unchanged")),
    )?;
    validate_measure_range(
        "body_weight",
        input.body_weight_min,
        input.body_weight_max,
        input.body_weight_unit.as_deref().or(Some("unchanged")),
    )?;

    Ok(())
}
