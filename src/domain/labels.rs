//! Disease label table.
//!
//! Maps the classifier's integer output to the disease display name. The
//! display names are also the keys of every reference table, so they are
//! kept byte-for-byte as exported (including trailing spaces).

/// Number of diseases the classifier distinguishes.
pub const DISEASE_COUNT: usize = 41;

/// Disease display names, indexed by classifier label.
pub const DISEASES: [&str; DISEASE_COUNT] = [
    "(vertigo) Paroymsal  Positional Vertigo", // 0
    "AIDS",                                    // 1
    "Acne",                                    // 2
    "Alcoholic hepatitis",                     // 3
    "Allergy",                                 // 4
    "Arthritis",                               // 5
    "Bronchial Asthma",                        // 6
    "Cervical spondylosis",                    // 7
    "Chicken pox",                             // 8
    "Chronic cholestasis",                     // 9
    "Common Cold",                             // 10
    "Dengue",                                  // 11
    "Diabetes ",                               // 12
    "Dimorphic hemmorhoids(piles)",            // 13
    "Drug Reaction",                           // 14
    "Fungal infection",                        // 15
    "GERD",                                    // 16
    "Gastroenteritis",                         // 17
    "Heart attack",                            // 18
    "Hepatitis B",                             // 19
    "Hepatitis C",                             // 20
    "Hepatitis D",                             // 21
    "Hepatitis E",                             // 22
    "Hypertension ",                           // 23
    "Hyperthyroidism",                         // 24
    "Hypoglycemia",                            // 25
    "Hypothyroidism",                          // 26
    "Impetigo",                                // 27
    "Jaundice",                                // 28
    "Malaria",                                 // 29
    "Migraine",                                // 30
    "Osteoarthristis",                         // 31
    "Paralysis (brain hemorrhage)",            // 32
    "Peptic ulcer diseae",                     // 33
    "Pneumonia",                               // 34
    "Psoriasis",                               // 35
    "Tuberculosis",                            // 36
    "Typhoid",                                 // 37
    "Urinary tract infection",                 // 38
    "Varicose veins",                          // 39
    "hepatitis A",                             // 40
];

/// Fixed mapping from classifier label to disease display name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiseaseLabelTable;

impl DiseaseLabelTable {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Display name for a label, if the label is known.
    #[must_use]
    pub fn decode(&self, label: u32) -> Option<&'static str> {
        DISEASES.get(usize::try_from(label).ok()?).copied()
    }

    /// Whether the table has an entry for `label`.
    #[must_use]
    pub fn contains(&self, label: u32) -> bool {
        self.decode(label).is_some()
    }

    /// Label of a display name (exact match).
    #[must_use]
    pub fn label_of(&self, disease: &str) -> Option<u32> {
        DISEASES
            .iter()
            .position(|d| *d == disease)
            .and_then(|i| u32::try_from(i).ok())
    }

    /// All labels in ascending order.
    pub fn labels(&self) -> impl Iterator<Item = u32> {
        (0..DISEASE_COUNT).filter_map(|i| u32::try_from(i).ok())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        DISEASE_COUNT
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        DISEASES.is_empty()
    }

    /// All display names in label order.
    #[must_use]
    pub fn names(&self) -> &'static [&'static str] {
        &DISEASES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_decode_known_labels() {
        let table = DiseaseLabelTable::new();
        assert_eq!(table.decode(15), Some("Fungal infection"));
        assert_eq!(table.decode(0), Some("(vertigo) Paroymsal  Positional Vertigo"));
        assert_eq!(table.decode(40), Some("hepatitis A"));
    }

    #[test]
    fn test_unknown_label_is_none() {
        let table = DiseaseLabelTable::new();
        assert_eq!(table.decode(41), None);
        assert_eq!(table.decode(u32::MAX), None);
        assert!(!table.contains(99));
    }

    #[test]
    fn test_labels_are_dense() {
        let table = DiseaseLabelTable::new();
        let labels: Vec<u32> = table.labels().collect();
        assert_eq!(labels, (0..41).collect::<Vec<u32>>());
        assert!(labels.iter().all(|l| table.contains(*l)));
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = DISEASES.iter().copied().collect();
        assert_eq!(names.len(), DISEASE_COUNT);
    }

    #[test]
    fn test_label_of_roundtrips_display_names() {
        let table = DiseaseLabelTable::new();
        assert_eq!(table.label_of("Diabetes "), Some(12));
        assert_eq!(table.label_of("Diabetes"), None);
    }
}
