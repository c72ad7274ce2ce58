//! Checker context: everything a prediction needs, loaded once.

use std::sync::Arc;

use crate::adapters::model::LinearModel;
use crate::adapters::tables::CsvReferenceTables;
use crate::config::AppConfig;
use crate::domain::{DiseaseLabelTable, SymptomVocabulary};
use crate::ports::{Classifier, ClassifierError, ReferenceData};
use crate::DobbyError;

/// Immutable state shared by every request.
///
/// Construction validates that the classifier agrees with the static
/// tables, so a context that exists can always encode and decode.
pub struct CheckerContext {
    vocabulary: SymptomVocabulary,
    labels: DiseaseLabelTable,
    classifier: Arc<dyn Classifier>,
    reference: Arc<dyn ReferenceData>,
}

impl CheckerContext {
    /// Assemble a context from already-loaded parts.
    ///
    /// # Errors
    /// Returns `DobbyError::Validation` if the classifier expects a different
    /// number of features than the vocabulary has, or can emit a label the
    /// disease table does not know.
    pub fn new(
        classifier: Arc<dyn Classifier>,
        reference: Arc<dyn ReferenceData>,
    ) -> Result<Self, DobbyError> {
        let vocabulary = SymptomVocabulary::new();
        let labels = DiseaseLabelTable::new();

        if classifier.n_features() != vocabulary.len() {
            return Err(DobbyError::Validation(format!(
                "classifier expects {} features but the symptom vocabulary has {}",
                classifier.n_features(),
                vocabulary.len()
            )));
        }

        let unknown: Vec<u32> = classifier
            .labels()
            .into_iter()
            .filter(|l| !labels.contains(*l))
            .collect();
        if !unknown.is_empty() {
            return Err(DobbyError::Validation(format!(
                "classifier can emit labels with no disease name: {unknown:?}"
            )));
        }

        Ok(Self {
            vocabulary,
            labels,
            classifier,
            reference,
        })
    }

    /// Load the model and reference tables named by `config`.
    ///
    /// # Errors
    /// Returns `DobbyError::ModelNotLoaded` if the model file is absent and
    /// any other loading or validation error as is.
    pub fn load(config: &AppConfig) -> Result<Self, DobbyError> {
        tracing::info!(
            "Loading model from {:?} and reference data from {:?}",
            config.model_dir,
            config.data_dir
        );

        let model = LinearModel::load(&config.model_dir, config.require_manifest).map_err(
            |e| match e {
                ClassifierError::NotFound { path } => {
                    DobbyError::ModelNotLoaded(format!("{} not found", path.display()))
                }
                other => DobbyError::Classifier(other),
            },
        )?;
        let tables = CsvReferenceTables::load(&config.data_dir, config.require_manifest)?;

        let context = Self::new(Arc::new(model), Arc::new(tables))?;
        tracing::info!(
            "Symptom checker ready ({} symptoms, {} diseases)",
            context.vocabulary.len(),
            context.labels.len()
        );
        Ok(context)
    }

    #[must_use]
    pub fn vocabulary(&self) -> &SymptomVocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub fn labels(&self) -> &DiseaseLabelTable {
        &self.labels
    }

    #[must_use]
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    #[must_use]
    pub fn reference(&self) -> Arc<dyn ReferenceData> {
        Arc::clone(&self.reference)
    }
}

impl std::fmt::Debug for CheckerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckerContext")
            .field("symptoms", &self.vocabulary.len())
            .field("diseases", &self.labels.len())
            .field("n_features", &self.classifier.n_features())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{write_model_dir, StubClassifier};
    use crate::adapters::tables::fixtures;
    use crate::application::SymptomChecker;
    use crate::domain::{DISEASES, SYMPTOM_COUNT};

    fn tables() -> Arc<dyn ReferenceData> {
        Arc::new(CsvReferenceTables::default())
    }

    #[test]
    fn test_accepts_consistent_classifier() {
        let ctx = CheckerContext::new(Arc::new(StubClassifier::always(15)), tables());
        assert!(ctx.is_ok());
    }

    #[test]
    fn test_rejects_feature_mismatch() {
        let stub = StubClassifier::always(15).with_features(SYMPTOM_COUNT - 1);
        let err = CheckerContext::new(Arc::new(stub), tables()).expect_err("must fail");
        assert!(matches!(err, DobbyError::Validation(_)));
    }

    #[test]
    fn test_rejects_unknown_labels() {
        let stub = StubClassifier::always(15).with_labels(vec![0, 15, 41]);
        let err = CheckerContext::new(Arc::new(stub), tables()).expect_err("must fail");
        assert!(matches!(err, DobbyError::Validation(msg) if msg.contains("41")));
    }

    #[test]
    fn test_load_from_directories() {
        let models = tempfile::tempdir().expect("tempdir");
        let data = tempfile::tempdir().expect("tempdir");
        write_model_dir(models.path());
        fixtures::write_all(data.path());

        let config = AppConfig {
            model_dir: models.path().to_path_buf(),
            data_dir: data.path().to_path_buf(),
            ..AppConfig::default()
        };
        let ctx = CheckerContext::load(&config).expect("load");
        assert_eq!(ctx.classifier().labels().len(), 41);
    }

    #[test]
    fn test_loaded_model_predicts_end_to_end() {
        let models = tempfile::tempdir().expect("tempdir");
        let data = tempfile::tempdir().expect("tempdir");
        write_model_dir(models.path());
        fixtures::write_all(data.path());

        let config = AppConfig {
            model_dir: models.path().to_path_buf(),
            data_dir: data.path().to_path_buf(),
            ..AppConfig::default()
        };
        let ctx = Arc::new(CheckerContext::load(&config).expect("load"));
        // Class k fires on symptom k; label 15 is Fungal infection.
        let symptom = ctx.vocabulary().names()[15];
        let checker = SymptomChecker::new(ctx);

        let prediction = checker.predict(&[symptom]).expect("predict");
        assert_eq!(prediction.disease, "Fungal infection");
        assert!(prediction.medications.iter().any(|m| m == "Ketoconazole"));

        let other = checker.predict(&[checker.context().vocabulary().names()[3]]);
        assert_eq!(other.expect("predict").disease, DISEASES[3]);
    }

    #[test]
    fn test_missing_model_is_reported() {
        let models = tempfile::tempdir().expect("tempdir");
        let data = tempfile::tempdir().expect("tempdir");
        fixtures::write_all(data.path());

        let config = AppConfig {
            model_dir: models.path().to_path_buf(),
            data_dir: data.path().to_path_buf(),
            ..AppConfig::default()
        };
        assert!(matches!(
            CheckerContext::load(&config),
            Err(DobbyError::ModelNotLoaded(_))
        ));
    }

    #[test]
    fn test_missing_reference_data_is_reported() {
        let models = tempfile::tempdir().expect("tempdir");
        let data = tempfile::tempdir().expect("tempdir");
        write_model_dir(models.path());

        let config = AppConfig {
            model_dir: models.path().to_path_buf(),
            data_dir: data.path().to_path_buf(),
            ..AppConfig::default()
        };
        assert!(matches!(
            CheckerContext::load(&config),
            Err(DobbyError::ReferenceData(_))
        ));
    }
}
