//! Symptom checker: encode -> classify -> decode -> resolve.
//!
//! Both front ends call this; it holds no mutable state and can be shared
//! across threads behind an `Arc`.

use std::sync::Arc;

use crate::application::{CheckerContext, DetailResolver};
use crate::domain::{parse_symptom_input, Prediction, PredictionRecord};
use crate::DobbyError;

/// Runs predictions against a loaded [`CheckerContext`].
#[derive(Clone)]
pub struct SymptomChecker {
    context: Arc<CheckerContext>,
    resolver: DetailResolver,
}

impl SymptomChecker {
    #[must_use]
    pub fn new(context: Arc<CheckerContext>) -> Self {
        let resolver = DetailResolver::new(context.reference());
        Self { context, resolver }
    }

    #[must_use]
    pub fn context(&self) -> &CheckerContext {
        &self.context
    }

    /// Predict from already-split symptom tokens. Unknown tokens are ignored.
    ///
    /// # Errors
    /// Returns `DobbyError::Classifier` if the classifier fails and
    /// `DobbyError::UnknownLabel` if it returns a label with no disease name.
    pub fn predict<S: AsRef<str>>(&self, symptoms: &[S]) -> Result<Prediction, DobbyError> {
        let vocabulary = self.context.vocabulary();
        let features = vocabulary.encode(symptoms);

        let label = self.context.classifier().classify(&features)?;
        let disease = self
            .context
            .labels()
            .decode(label)
            .ok_or(DobbyError::UnknownLabel(label))?;

        let (recognized, unrecognized) = vocabulary.partition(symptoms);
        if !unrecognized.is_empty() {
            tracing::debug!("Ignored unrecognized symptom(s): {:?}", unrecognized);
        }
        tracing::info!(
            "Predicted {:?} from {} recognized symptom(s), {} unrecognized",
            disease,
            recognized.len(),
            unrecognized.len()
        );

        Ok(Prediction::new(disease, self.resolver.resolve(disease)))
    }

    /// Predict from comma-separated text.
    ///
    /// # Errors
    /// See [`SymptomChecker::predict`].
    pub fn predict_text(&self, raw: &str) -> Result<Prediction, DobbyError> {
        self.predict(&parse_symptom_input(raw))
    }

    /// Predict from comma-separated text and keep the interaction details.
    ///
    /// # Errors
    /// See [`SymptomChecker::predict`].
    pub fn assess(&self, raw: &str, voice_input: bool) -> Result<PredictionRecord, DobbyError> {
        let tokens = parse_symptom_input(raw);
        let prediction = self.predict(&tokens)?;
        let (recognized, unrecognized) = self.context.vocabulary().partition(&tokens);

        Ok(PredictionRecord::new(
            prediction,
            recognized.into_iter().map(str::to_string).collect(),
            unrecognized.into_iter().map(str::to_string).collect(),
            voice_input,
        ))
    }
}
