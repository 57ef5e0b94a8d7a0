//! Breed taxonomy enumerations and field validation.
//!
//! Every taxonomy column on the `breeds` table is drawn from one of the
//! closed enumerations here. The database CHECK constraints mirror these
//! lists; this module is the canonical source.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

/// Valid `species` values.
pub const VALID_SPECIES: &[&str] = &["cattle", "buffalo"];

/// Species enum matching the `breeds.species` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    Cattle,
    Buffalo,
}

impl Species {
    /// Parse from the database column value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "cattle" => Ok(Self::Cattle),
            "buffalo" => Ok(Self::Buffalo),
            other => Err(CoreError::Validation(format!(
                "Unknown species '{other}'. Must be one of: {VALID_SPECIES:?}"
            ))),
        }
    }

    /// Database column value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cattle => "cattle",
            Self::Buffalo => "buffalo",
        }
    }
}

// ---------------------------------------------------------------------------
// Breed status
// ---------------------------------------------------------------------------

/// Valid `breed_status` values.
pub const VALID_BREED_STATUSES: &[&str] = &["indigenous", "exotic", "crossbred"];

/// Breed status enum matching the `breeds.breed_status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreedStatus {
    Indigenous,
    Exotic,
    Crossbred,
}

impl BreedStatus {
    /// Parse from the database column value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "indigenous" => Ok(Self::Indigenous),
            "exotic" => Ok(Self::Exotic),
            "crossbred" => Ok(Self::Crossbred),
            other => Err(CoreError::Validation(format!(
                "Unknown breed status '{other}'. Must be one of: {VALID_BREED_STATUSES:?}"
            ))),
        }
    }

    /// Database column value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Indigenous => "indigenous",
            Self::Exotic => "exotic",
            Self::Crossbred => "crossbred",
        }
    }
}

// ---------------------------------------------------------------------------
// Temperament
// ---------------------------------------------------------------------------

/// Valid `temperament` values.
pub const VALID_TEMPERAMENTS: &[&str] = &["docile", "moderate", "aggressive"];

/// Temperament enum matching the `breeds.temperament` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temperament {
    Docile,
    Moderate,
    Aggressive,
}

impl Temperament {
    /// Parse from the database column value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "docile" => Ok(Self::Docile),
            "moderate" => Ok(Self::Moderate),
            "aggressive" => Ok(Self::Aggressive),
            other => Err(CoreError::Validation(format!(
                "Unknown temperament '{other}'. Must be one of: {VALID_TEMPERAMENTS:?}"
            ))),
        }
    }

    /// Database column value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Docile => "docile",
            Self::Moderate => "moderate",
            Self::Aggressive => "aggressive",
        }
    }
}

// ---------------------------------------------------------------------------
// Conservation status
// ---------------------------------------------------------------------------

/// Valid `conservation_status` values.
pub const VALID_CONSERVATION_STATUSES: &[&str] =
    &["not_at_risk", "vulnerable", "endangered", "critical", "unknown"];

/// Conservation status enum matching the `breeds.conservation_status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConservationStatus {
    NotAtRisk,
    Vulnerable,
    Endangered,
    Critical,
    Unknown,
}

impl ConservationStatus {
    /// Parse from the database column value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "not_at_risk" => Ok(Self::NotAtRisk),
            "vulnerable" => Ok(Self::Vulnerable),
            "endangered" => Ok(Self::Endangered),
            "critical" => Ok(Self::Critical),
            "unknown" => Ok(Self::Unknown),
            other => Err(CoreError::Validation(format!(
                "Unknown conservation status '{other}'. Must be one of: {VALID_CONSERVATION_STATUSES:?}"
            ))),
        }
    }

    /// Database column value.
    pub fn name(self) -> &'static str {
        match self {
            Self::NotAtRisk => "not_at_risk",
            Self::Vulnerable => "vulnerable",
            Self::Endangered => "endangered",
            Self::Critical => "critical",
            Self::Unknown => "unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// Numeric range validation
// ---------------------------------------------------------------------------

/// Validate an optional measurement range (milk yield, body weight).
///
/// - Bounds must be finite and non-negative.
/// - `min <= max` when both are present.
/// - A range carries its unit: any bound without a unit is rejected.
pub fn validate_measure_range(
    field: &str,
    min: Option<f64>,
    max: Option<f64>,
    unit: Option<&str>,
) -> Result<(), CoreError> {
    for bound in [min, max].into_iter().flatten() {
        if !bound.is_finite() || bound < 0.0 {
            return Err(CoreError::Validation(format!(
                "{field}: bound {bound} must be a non-negative number"
            )));
        }
    }

    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(CoreError::Validation(format!(
                "{field}: min {lo} exceeds max {hi}"
            )));
        }
    }

    if (min.is_some() || max.is_some()) && unit.map_or(true, |u| u.trim().is_empty()) {
        return Err(CoreError::Validation(format!(
            "{field}: a range requires a unit"
        )));
    }

    Ok(())
}

/// Validate an ancestry contribution percentage (0..=100 when present).
pub fn validate_contribution_pct(pct: Option<f64>) -> Result<(), CoreError> {
    if let Some(p) = pct {
        if !p.is_finite() || !(0.0..=100.0).contains(&p) {
            return Err(CoreError::Validation(format!(
                "Contribution percentage {p} is outside 0..100"
            )));
        }
    }
    Ok(())
}
