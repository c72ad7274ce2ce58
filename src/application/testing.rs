//! Test doubles shared by the application, api and tui tests.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::model::{ExportedLinearModel, MODEL_FILE};
use crate::adapters::tables::{fixtures, CsvReferenceTables};
use crate::application::{CheckerContext, SymptomChecker};
use crate::domain::{FeatureVector, DISEASE_COUNT, SYMPTOM_COUNT};
use crate::ports::{Classifier, ClassifierError};

/// Classifier returning a fixed answer and recording what it was asked.
#[derive(Clone)]
pub struct StubClassifier {
    answer: Result<u32, ClassifierError>,
    n_features: usize,
    labels: Vec<u32>,
    seen: Arc<Mutex<Vec<usize>>>,
}

impl StubClassifier {
    pub fn always(label: u32) -> Self {
        Self {
            answer: Ok(label),
            n_features: SYMPTOM_COUNT,
            labels: (0..DISEASE_COUNT as u32).collect(),
            seen: Arc::default(),
        }
    }

    pub fn failing(err: ClassifierError) -> Self {
        Self {
            answer: Err(err),
            ..Self::always(0)
        }
    }

    pub fn with_features(mut self, n: usize) -> Self {
        self.n_features = n;
        self
    }

    pub fn with_labels(mut self, labels: Vec<u32>) -> Self {
        self.labels = labels;
        self
    }

    /// Active indices of the last classified vector.
    pub fn last_active(&self) -> Vec<usize> {
        self.seen.lock().expect("lock").clone()
    }
}

impl Classifier for StubClassifier {
    fn classify(&self, features: &FeatureVector) -> Result<u32, ClassifierError> {
        assert_eq!(features.len(), SYMPTOM_COUNT);
        *self.seen.lock().expect("lock") = features.active_indices();
        self.answer.clone()
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn labels(&self) -> Vec<u32> {
        self.labels.clone()
    }
}

/// Reference tables loaded from the shared CSV fixtures.
pub fn fixture_tables() -> CsvReferenceTables {
    let dir = tempfile::tempdir().expect("tempdir");
    fixtures::write_all(dir.path());
    CsvReferenceTables::load(dir.path(), false).expect("load fixtures")
}

/// Checker over `classifier` and the fixture tables.
pub fn checker_with(classifier: StubClassifier) -> SymptomChecker {
    let context = CheckerContext::new(Arc::new(classifier), Arc::new(fixture_tables()))
        .expect("valid context");
    SymptomChecker::new(Arc::new(context))
}

/// Write a full-size `model.json` where class k fires on symptom k.
pub fn write_model_dir(dir: &Path) {
    let coefficients = (0..DISEASE_COUNT)
        .map(|k| {
            let mut row = vec![0.0; SYMPTOM_COUNT];
            row[k] = 1.0;
            row
        })
        .collect();
    let model = ExportedLinearModel {
        format_version: 1,
        kind: "linear_ovr".into(),
        n_features: SYMPTOM_COUNT,
        classes: (0..DISEASE_COUNT as u32).collect(),
        coefficients,
        intercepts: vec![0.0; DISEASE_COUNT],
    };
    let json = serde_json::to_string(&model).expect("serialize");
    std::fs::write(dir.join(MODEL_FILE), json).expect("write model");
}
