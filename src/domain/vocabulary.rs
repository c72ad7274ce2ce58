//! Symptom vocabulary and feature vector encoding.
//!
//! The vocabulary is the column order of the classifier's training matrix:
//! symptom `i` in [`SYMPTOMS`] is feature `i` of every [`FeatureVector`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Number of symptoms known to the classifier.
pub const SYMPTOM_COUNT: usize = 132;

/// Canonical symptom names, ordered by feature index.
///
/// Spellings (including the underscores and the single-letter entry at 58)
/// are those of the training export and must not be "fixed" here without
/// retraining the model.
pub const SYMPTOMS: [&str; SYMPTOM_COUNT] = [
    "itching", "skin rash", "nodal skin eruptions", "continuous sneezing", "shivering",
    "chills", "joint pain", "stomach pain", "acidity", "ulcers on tongue",
    "muscle wasting", "vomiting", "burning micturition", "spotting urination", "fatigue",
    "weight gain", "anxiety", "cold hands and feets", "mood swings", "weight loss",
    "restlessness", "lethargy", "patches in throat", "irregular sugar level", "cough",
    "high fever", "sunken eyes", "breathlessness", "sweating", "dehydration",
    "indigestion", "headache", "yellowish skin", "dark urine", "nausea",
    "loss of appetite", "pain behind the eyes", "back pain", "constipation",
    "abdominal pain", "diarrhoea", "mild fever", "yellow urine", "yellowing of eyes",
    "acute liver failure", "fluid overload", "swelling of stomach",
    "swelled lymph_nodes", "malaise", "blurred and distorted vision", "phlegm",
    "throat irritation", "redness of eyes", "sinus pressure", "runny nose", "congestion",
    "chest pain", "weakness in limbs", "e", "pain during bowel movements",
    "pain in anal region", "bloody stool", "irritation in anus", "neck pain",
    "dizziness", "cramps", "bruising", "obesity", "swollen legs",
    "swollen blood vessels", "puffy face and eyes", "enlarged thyroid", "brittle nails",
    "swollen extremities", "excessive hunger", "extra marital contacts",
    "drying and tingling lips", "slurred speech", "knee pain", "hip joint_pain",
    "muscle weakness", "stiffneck", "swelling joints", "movement stiffness",
    "spinning_movements", "loss_of_balance", "unsteadiness", "weakness_of_one_body_side",
    "loss_of_smell", "bladder_discomfort", "foul_smell_of urine",
    "continuous_feel_of_urine", "passage_of_gases", "internal_itching",
    "toxic_look_(typhos)", "depression", "irritability", "muscle_pain",
    "altered_sensorium", "red_spots_over_body", "belly_pain", "abnormal_menstruation",
    "dichromatic_patches", "watering_from_eyes", "increased_appetite", "polyuria",
    "family_history", "mucoid_sputum", "rusty_sputum", "lack_of_concentration",
    "visual_disturbances", "receiving_blood_transfusion",
    "receiving_unsterile_injections", "coma", "stomach_bleeding",
    "distention_of_abdomen", "history_of_alcohol_consumption", "fluid_overload.1",
    "blood_in_sputum", "prominent_veins_on_calf", "palpitations", "painful_walking",
    "pus_filled_pimples", "blackheads", "scurring", "skin_peeling",
    "silver_like_dusting", "small_dents_in_nails", "inflammatory_nails", "blister",
    "red_sore_around_nose", "yellow_crust_ooze",
];

/// Binary presence/absence encoding of symptoms.
///
/// Position `i` is `1.0` iff the symptom with index `i` was reported.
/// The length is fixed at construction and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// Create an all-zero vector of the given length.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    /// Mark the feature at `index` as present. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = 1.0;
        }
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw values, in feature order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Whether the feature at `index` is set.
    #[must_use]
    pub fn is_set(&self, index: usize) -> bool {
        self.values.get(index).is_some_and(|v| *v != 0.0)
    }

    /// Indices of all present features, ascending.
    #[must_use]
    pub fn active_indices(&self) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of present features.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }
}

/// Fixed mapping from symptom name to feature index.
#[derive(Debug, Clone)]
pub struct SymptomVocabulary {
    index: HashMap<&'static str, usize>,
}

impl SymptomVocabulary {
    /// Build the canonical vocabulary.
    #[must_use]
    pub fn new() -> Self {
        let index = SYMPTOMS
            .iter()
            .enumerate()
            .map(|(i, name)| (*name, i))
            .collect();
        Self { index }
    }

    /// Number of known symptoms (the feature vector length).
    #[must_use]
    pub fn len(&self) -> usize {
        SYMPTOMS.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        SYMPTOMS.is_empty()
    }

    /// Feature index of a symptom, by exact match.
    #[must_use]
    pub fn index_of(&self, symptom: &str) -> Option<usize> {
        self.index.get(symptom).copied()
    }

    /// Symptom name at a feature index.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&'static str> {
        SYMPTOMS.get(index).copied()
    }

    /// All symptom names in feature order.
    #[must_use]
    pub fn names(&self) -> &'static [&'static str] {
        &SYMPTOMS
    }

    /// Encode symptom tokens into a feature vector.
    ///
    /// Tokens must already be trimmed. Unknown tokens are ignored: voice
    /// transcripts are noisy and a partial match is still useful.
    #[must_use]
    pub fn encode<S: AsRef<str>>(&self, symptoms: &[S]) -> FeatureVector {
        let mut vector = FeatureVector::zeros(self.len());
        for symptom in symptoms {
            if let Some(i) = self.index_of(symptom.as_ref()) {
                vector.set(i);
            }
        }
        vector
    }

    /// Split tokens into (recognized, unrecognized), preserving input order.
    #[must_use]
    pub fn partition<'a, S: AsRef<str>>(&self, symptoms: &'a [S]) -> (Vec<&'a str>, Vec<&'a str>) {
        symptoms
            .iter()
            .map(|s| -> &'a str { s.as_ref() })
            .partition(|s| self.index.contains_key(*s))
    }
}

impl Default for SymptomVocabulary {
    fn default() -> Self {
        Self::new()
    }
}

/// Split comma-separated symptom text into trimmed, non-empty tokens.
#[must_use]
pub fn parse_symptom_input(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
