//! # Dobby
//!
//! Voice-activated symptom checker.
//!
//! A user speaks or types symptoms, a pre-trained classifier predicts a
//! disease and the crate reports its description, precautions, medications,
//! diet and workout recommendations.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Symptom vocabulary, disease labels, prediction records
//! - `ports`: Trait definitions for the classifier, reference data and speech
//! - `adapters`: Concrete implementations (JSON linear model, CSV tables,
//!   command-driven speech, log sanitization)
//! - `application`: The encode -> classify -> resolve pipeline
//! - `api`: HTTP JSON endpoint
//! - `tui`: Terminal user interface with optional voice interaction

pub mod adapters;
pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use application::{CheckerContext, SymptomChecker};
pub use domain::{DiseaseDetail, FeatureVector, Prediction};

/// Result type for Dobby operations
pub type Result<T> = std::result::Result<T, DobbyError>;

/// Main error type for Dobby
#[derive(Debug, thiserror::Error)]
pub enum DobbyError {
    #[error("Classifier error: {0}")]
    Classifier(#[from] ports::ClassifierError),

    #[error("Reference data error: {0}")]
    ReferenceData(#[from] adapters::TableError),

    #[error("Classifier produced label {0} with no entry in the disease label table")]
    UnknownLabel(u32),

    #[error("Model not loaded: {0}")]
    ModelNotLoaded(String),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}
