//! Classifier port: Trait for the pre-trained disease classifier.
//!
//! The classifier is an opaque artifact produced by an external training
//! pipeline. The application only relies on its `classify` contract.

use std::path::PathBuf;

use crate::domain::FeatureVector;

/// Errors that can occur while loading or running a classifier.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifierError {
    #[error("Model file not found: {path:?}")]
    NotFound { path: PathBuf },

    #[error("Failed to read model: {0}")]
    Io(String),

    #[error("Invalid model format: {0}")]
    Format(String),

    #[error("Model integrity check failed: {0}")]
    Integrity(String),

    #[error("Feature vector has {got} features, model expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Trait for disease classifiers.
///
/// Implementations are loaded once at startup and must be safe to share
/// between concurrent requests without locking.
pub trait Classifier: Send + Sync {
    /// Predict the disease label for an encoded symptom vector.
    ///
    /// # Errors
    /// Returns `ClassifierError::DimensionMismatch` if the vector length
    /// differs from [`Classifier::n_features`].
    fn classify(&self, features: &FeatureVector) -> Result<u32, ClassifierError>;

    /// Number of input features the model was trained on.
    fn n_features(&self) -> usize;

    /// Every label the model can emit.
    fn labels(&self) -> Vec<u32>;
}
