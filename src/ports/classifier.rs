//! Classifier port: Trait for the pretrained screening model.
//!
//! This trait abstracts the model runtime from the screening pipeline.

use crate::domain::{FeatureVector, Score};

/// Errors raised by a classifier implementation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("Failed to load model: {0}")]
    Load(String),

    #[error("Model expects {expected} inputs, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Model produced a non-finite output")]
    NonFinite,
}

/// A loaded binary classifier.
///
/// Implementations are read-only after construction and may be shared
/// across threads behind an `Arc`.
pub trait Classifier: Send + Sync {
    /// Number of inputs the model accepts.
    fn input_width(&self) -> usize;

    /// Canonical symptom identifiers in input order, when the artifact
    /// records them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Score a feature vector.
    ///
    /// # Errors
    /// Returns `ClassifierError::DimensionMismatch` when the vector width is
    /// not [`Classifier::input_width`], or `ClassifierError::NonFinite` when
    /// the model output cannot be interpreted as a probability.
    fn score(&self, features: &FeatureVector) -> Result<Score, ClassifierError>;
}
