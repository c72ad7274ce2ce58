//! Detail resolver: joins the reference tables for one disease.

use std::sync::Arc;

use crate::domain::{
    DiseaseDetail, NO_DESCRIPTION, NO_DIET, NO_MEDICATIONS, NO_PRECAUTIONS, NO_WORKOUT,
};
use crate::ports::ReferenceData;

/// Looks up every reference table independently and fills misses with
/// placeholder text. Never fails.
#[derive(Clone)]
pub struct DetailResolver {
    reference: Arc<dyn ReferenceData>,
}

impl DetailResolver {
    #[must_use]
    pub fn new(reference: Arc<dyn ReferenceData>) -> Self {
        Self { reference }
    }

    #[must_use]
    pub fn resolve(&self, disease: &str) -> DiseaseDetail {
        let r = self.reference.as_ref();

        let description = r
            .description(disease)
            .map_or_else(|| NO_DESCRIPTION.to_string(), str::to_string);

        let precautions = or_placeholder(r.precautions(disease).unwrap_or_default(), NO_PRECAUTIONS);
        let medications = or_placeholder(r.medications(disease), NO_MEDICATIONS);
        let diet = or_placeholder(r.diet(disease), NO_DIET);
        let workout = or_placeholder(r.workout(disease), NO_WORKOUT);

        DiseaseDetail {
            description,
            precautions,
            medications,
            diet,
            workout,
        }
    }
}

fn or_placeholder(values: &[String], placeholder: &str) -> Vec<String> {
    if values.is_empty() {
        vec![placeholder.to_string()]
    } else {
        values.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::tables::{fixtures, CsvReferenceTables};
    use crate::domain::DISEASES;

    fn resolver() -> DetailResolver {
        let dir = tempfile::tempdir().expect("tempdir");
        fixtures::write_all(dir.path());
        let tables = CsvReferenceTables::load(dir.path(), false).expect("load");
        DetailResolver::new(Arc::new(tables))
    }

    #[test]
    fn test_full_row() {
        let detail = resolver().resolve("Fungal infection");
        assert!(detail.description.starts_with("Fungal infection is"));
        assert_eq!(detail.precautions.len(), 4);
        assert_eq!(detail.medications[0], "Antifungal Cream");
        assert_eq!(detail.diet, ["Antifungal Diet", "Probiotics"]);
        assert_eq!(detail.workout, ["Avoid sugary foods", "Consume probiotics"]);
    }

    #[test]
    fn test_missing_medications_row() {
        let detail = resolver().resolve("Allergy");
        assert_eq!(detail.medications, [NO_MEDICATIONS]);
        assert_eq!(detail.diet.len(), 2);
    }

    #[test]
    fn test_unknown_disease_gets_every_placeholder() {
        let detail = resolver().resolve("Migraine");
        assert_eq!(detail.description, NO_DESCRIPTION);
        assert_eq!(detail.precautions, [NO_PRECAUTIONS]);
        assert_eq!(detail.medications, [NO_MEDICATIONS]);
        assert_eq!(detail.diet, [NO_DIET]);
        assert_eq!(detail.workout, [NO_WORKOUT]);
    }

    #[test]
    fn test_total_and_idempotent() {
        let resolver = resolver();
        for disease in DISEASES.iter().chain(["", "not a disease"].iter()) {
            let first = resolver.resolve(disease);
            assert!(!first.description.is_empty());
            assert!(!first.precautions.is_empty());
            assert!(!first.medications.is_empty());
            assert!(!first.diet.is_empty());
            assert!(!first.workout.is_empty());
            assert_eq!(first, resolver.resolve(disease));
        }
    }
}
