//! Domain layer: Core types and the static symptom/disease tables.
//!
//! This module contains pure Rust types with no I/O.

mod labels;
mod prediction;
mod vocabulary;

pub use labels::{DiseaseLabelTable, DISEASES, DISEASE_COUNT};
pub use prediction::{
    DiseaseDetail, Prediction, PredictionRecord, NO_DESCRIPTION, NO_DIET, NO_MEDICATIONS,
    NO_PRECAUTIONS, NO_WORKOUT,
};
pub use vocabulary::{parse_symptom_input, FeatureVector, SymptomVocabulary, SYMPTOMS, SYMPTOM_COUNT};
