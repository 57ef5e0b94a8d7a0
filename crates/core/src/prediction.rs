//! Prediction-list normalization.
//!
//! The remote classifier returns an unordered `label -> confidence` map.
//! Before a scan is persisted that map is normalized into the canonical
//! form every consumer relies on: sorted descending by confidence, ties
//! broken by ascending label, one entry per label.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lowest confidence the classifier may report.
pub const MIN_CONFIDENCE: f64 = 0.0;

/// Highest confidence the classifier may report.
pub const MAX_CONFIDENCE: f64 = 100.0;

/// One ranked classifier output: a breed label and its confidence in
/// [`MIN_CONFIDENCE`]..=[`MAX_CONFIDENCE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
}

/// Normalize raw classifier output into a canonical prediction list.
///
/// - Sorted descending by confidence, ties broken by ascending label.
/// - Duplicate labels collapse to their highest confidence.
/// - Empty input, blank labels, and confidences outside
///   [`MIN_CONFIDENCE`]..=[`MAX_CONFIDENCE`] (or non-finite) are rejected.
pub fn normalize_predictions<I>(raw: I) -> Result<Vec<Prediction>, CoreError>
where
    I: IntoIterator<Item = (String, f64)>,
{
    let mut best: BTreeMap<String, f64> = BTreeMap::new();

    for (label, confidence) in raw {
        if label.trim().is_empty() {
            return Err(CoreError::Validation(
                "Prediction label must not be empty".into(),
            ));
        }
        if !confidence.is_finite() || !(MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&confidence) {
            return Err(CoreError::Validation(format!(
                "Confidence {confidence} for '{label}' is outside {MIN_CONFIDENCE}..{MAX_CONFIDENCE}"
            )));
        }

        let entry = best.entry(label).or_insert(confidence);
        if confidence > *entry {
            *entry = confidence;
        }
    }

    if best.is_empty() {
        return Err(CoreError::Validation(
            "Classifier returned no predictions".into(),
        ));
    }

    let mut predictions: Vec<Prediction> = best
        .into_iter()
        .map(|(label, confidence)| Prediction { label, confidence })
        .collect();

    predictions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.label.cmp(&b.label))
    });

    Ok(predictions)
}

/// The single highest-confidence entry of a normalized prediction list.
pub fn headline(predictions: &[Prediction]) -> Option<&Prediction> {
    predictions.first()
}
