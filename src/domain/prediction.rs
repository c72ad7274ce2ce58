//! Prediction result types.
//!
//! Represents the disease predicted for a set of symptoms together with the
//! care recommendations resolved from the reference tables.

use serde::{Deserialize, Serialize};

/// Placeholder when the description table has no row for a disease.
pub const NO_DESCRIPTION: &str = "No description available.";
/// Placeholder when the precautions table has no row for a disease.
pub const NO_PRECAUTIONS: &str = "No precautions listed.";
/// Placeholder when the medications table has no row for a disease.
pub const NO_MEDICATIONS: &str = "No medications listed.";
/// Placeholder when the diet table has no row for a disease.
pub const NO_DIET: &str = "No diet listed.";
/// Placeholder when the workout table has no row for a disease.
pub const NO_WORKOUT: &str = "No workout listed.";

/// Care information for one disease.
///
/// Every field is always populated: missing reference rows are replaced by
/// the placeholder constants above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseDetail {
    pub description: String,
    /// Up to four precautions, in column order
    pub precautions: Vec<String>,
    pub medications: Vec<String>,
    pub diet: Vec<String>,
    pub workout: Vec<String>,
}

/// Response of the symptom checker.
///
/// The JSON field names are part of the HTTP contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub disease: String,
    pub description: String,
    pub precautions: Vec<String>,
    pub medications: Vec<String>,
    pub diet: Vec<String>,
    pub workout: Vec<String>,
}

impl Prediction {
    /// Combine a disease name with its resolved details.
    #[must_use]
    pub fn new(disease: impl Into<String>, detail: DiseaseDetail) -> Self {
        Self {
            disease: disease.into(),
            description: detail.description,
            precautions: detail.precautions,
            medications: detail.medications,
            diet: detail.diet,
            workout: detail.workout,
        }
    }

    /// Single paragraph suitable for speech synthesis.
    #[must_use]
    pub fn report_text(&self) -> String {
        format!(
            "Disease: {}. {} Diet: {}. Medications: {}. Precautions: {}. Workout: {}",
            self.disease,
            self.description,
            self.diet.join(", "),
            self.medications.join(", "),
            self.precautions.join(", "),
            self.workout.join(", "),
        )
    }

    /// Multi-line printed report.
    #[must_use]
    pub fn report_lines(&self) -> Vec<String> {
        vec![
            "** Disease Prediction **".to_string(),
            format!("Predicted Disease: {}", self.disease),
            format!("Description: {}", self.description),
            format!("Precautions: {}", self.precautions.join(", ")),
            format!("Medications: {}", self.medications.join(", ")),
            format!("Diets: {}", self.diet.join(", ")),
            format!("Workout: {}", self.workout.join(", ")),
            "***".to_string(),
        ]
    }
}

/// A prediction made during an interactive session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Symptoms that matched the vocabulary
    pub recognized: Vec<String>,

    /// Tokens that were ignored
    pub unrecognized: Vec<String>,

    pub prediction: Prediction,

    /// How the symptoms were captured
    pub voice_input: bool,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl PredictionRecord {
    #[must_use]
    pub fn new(
        prediction: Prediction,
        recognized: Vec<String>,
        unrecognized: Vec<String>,
        voice_input: bool,
    ) -> Self {
        Self {
            recognized,
            unrecognized,
            prediction,
            voice_input,
            created_at: chrono::Utc::now(),
        }
    }
}
