//! Client for the remote breed-classification service.
//!
//! The service is used strictly through its public contract: image bytes
//! in, a `label -> confidence` map out. Everything else (model hosting,
//! retraining) is someone else's problem.

pub mod client;

pub use client::{Classifier, HttpClassifier, InferenceError};
