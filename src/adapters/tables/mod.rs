//! Reference tables adapter: Implementation of ReferenceData over CSV files.
//!
//! Five files live in the data directory, each keyed by a `Disease` column:
//!
//! | file                 | value column(s)            | rows used     |
//! |----------------------|----------------------------|---------------|
//! | `description.csv`    | `Description`              | first match   |
//! | `precautions_df.csv` | `Precaution_1..4`          | first match   |
//! | `medications.csv`    | `Medication`               | all matches   |
//! | `diets.csv`          | `Diet`                     | all matches   |
//! | `workout_df.csv`     | `workout`                  | all matches   |
//!
//! Header names are matched ignoring ASCII case and surrounding whitespace;
//! other columns (such as an exported index column) are ignored. Cell
//! contents, including the disease key, are kept verbatim.
//!
//! Medication and diet cells are often Python list literals such as
//! `['Antifungal Cream', 'Fluconazole']`. Those are expanded into their
//! items; anything else is one value.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::adapters::integrity;
use crate::ports::ReferenceData;

pub const DESCRIPTION_FILE: &str = "description.csv";
pub const PRECAUTIONS_FILE: &str = "precautions_df.csv";
pub const MEDICATIONS_FILE: &str = "medications.csv";
pub const DIETS_FILE: &str = "diets.csv";
pub const WORKOUT_FILE: &str = "workout_df.csv";

/// Every file the tables need, in load order.
pub const REQUIRED_FILES: [&str; 5] = [
    DESCRIPTION_FILE,
    PRECAUTIONS_FILE,
    MEDICATIONS_FILE,
    DIETS_FILE,
    WORKOUT_FILE,
];

const DISEASE_COLUMN: &str = "Disease";
const PRECAUTION_COLUMNS: [&str; 4] = [
    "Precaution_1",
    "Precaution_2",
    "Precaution_3",
    "Precaution_4",
];

/// Errors raised while loading reference tables.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Reference file not found: {0:?}")]
    MissingFile(PathBuf),

    #[error("{file} has no {column:?} column")]
    MissingColumn { file: String, column: String },

    #[error("Malformed CSV in {file}: {reason}")]
    Csv { file: String, reason: String },

    #[error("Integrity check failed: {0}")]
    Integrity(String),
}

/// Disease reference data held in memory.
#[derive(Debug, Clone, Default)]
pub struct CsvReferenceTables {
    descriptions: HashMap<String, String>,
    precautions: HashMap<String, Vec<String>>,
    medications: HashMap<String, Vec<String>>,
    diets: HashMap<String, Vec<String>>,
    workouts: HashMap<String, Vec<String>>,
}

impl CsvReferenceTables {
    /// Load all five tables from `data_dir`.
    ///
    /// If the directory has a `manifest.json` (mandatory when
    /// `require_manifest` is set) it must cover every table file and match
    /// their digests.
    ///
    /// # Errors
    /// Returns `TableError` on the first missing file, missing column,
    /// malformed CSV or integrity failure.
    pub fn load(data_dir: &Path, require_manifest: bool) -> Result<Self, TableError> {
        for name in REQUIRED_FILES {
            let path = data_dir.join(name);
            if !path.is_file() {
                return Err(TableError::MissingFile(path));
            }
        }

        if let Some(manifest) = integrity::verify_directory(data_dir, require_manifest)
            .map_err(|e| TableError::Integrity(e.to_string()))?
        {
            manifest
                .require(&REQUIRED_FILES)
                .map_err(|e| TableError::Integrity(e.to_string()))?;
        }

        let mut tables = Self::default();

        for (disease, row) in read_rows(data_dir, DESCRIPTION_FILE, &["Description"])? {
            if let Some(text) = row.into_iter().next() {
                tables.descriptions.entry(disease).or_insert(text);
            }
        }

        for (disease, row) in read_rows(data_dir, PRECAUTIONS_FILE, &PRECAUTION_COLUMNS)? {
            let items: Vec<String> = row.into_iter().filter(|c| !c.trim().is_empty()).collect();
            tables.precautions.entry(disease).or_insert(items);
        }

        collect_values(&mut tables.medications, read_rows(data_dir, MEDICATIONS_FILE, &["Medication"])?);
        collect_values(&mut tables.diets, read_rows(data_dir, DIETS_FILE, &["Diet"])?);
        collect_values(&mut tables.workouts, read_rows(data_dir, WORKOUT_FILE, &["workout"])?);

        tracing::info!(
            "Loaded reference data from {:?}: {} descriptions, {} precaution sets, {} medication, {} diet, {} workout keys",
            data_dir,
            tables.descriptions.len(),
            tables.precautions.len(),
            tables.medications.len(),
            tables.diets.len(),
            tables.workouts.len()
        );

        Ok(tables)
    }

    /// Number of diseases with a description row.
    #[must_use]
    pub fn description_count(&self) -> usize {
        self.descriptions.len()
    }
}

impl ReferenceData for CsvReferenceTables {
    fn description(&self, disease: &str) -> Option<&str> {
        self.descriptions.get(disease).map(String::as_str)
    }

    fn precautions(&self, disease: &str) -> Option<&[String]> {
        self.precautions.get(disease).map(Vec::as_slice)
    }

    fn medications(&self, disease: &str) -> &[String] {
        self.medications.get(disease).map_or(&[], Vec::as_slice)
    }

    fn diet(&self, disease: &str) -> &[String] {
        self.diets.get(disease).map_or(&[], Vec::as_slice)
    }

    fn workout(&self, disease: &str) -> &[String] {
        self.workouts.get(disease).map_or(&[], Vec::as_slice)
    }
}

fn collect_values(into: &mut HashMap<String, Vec<String>>, rows: Vec<(String, Vec<String>)>) {
    for (disease, row) in rows {
        let values = into.entry(disease).or_default();
        for cell in row {
            values.extend(expand_cell(&cell).into_iter().filter(|v| !v.trim().is_empty()));
        }
    }
}

/// Read `(disease, [value columns...])` for every record of `file`.
fn read_rows(
    dir: &Path,
    file: &str,
    value_columns: &[&str],
) -> Result<Vec<(String, Vec<String>)>, TableError> {
    let csv_error = |e: csv::Error| TableError::Csv {
        file: file.to_string(),
        reason: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(dir.join(file))
        .map_err(csv_error)?;

    let headers = reader.headers().map_err(csv_error)?.clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| TableError::MissingColumn {
                file: file.to_string(),
                column: name.to_string(),
            })
    };

    let key_idx = find(DISEASE_COLUMN)?;
    let value_idx = value_columns
        .iter()
        .map(|c| find(c))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let Some(disease) = record.get(key_idx) else {
            continue;
        };
        let values = value_idx
            .iter()
            .map(|&i| record.get(i).unwrap_or_default().to_string())
            .collect();
        rows.push((disease.to_string(), values));
    }

    tracing::debug!("Read {} row(s) from {}", rows.len(), file);
    Ok(rows)
}

/// Expand a `['a', "b"]` list literal into its items; any other cell is
/// returned as a single value.
#[must_use]
pub fn expand_cell(cell: &str) -> Vec<String> {
    parse_list_literal(cell.trim()).unwrap_or_else(|| vec![cell.to_string()])
}

fn parse_list_literal(text: &str) -> Option<Vec<String>> {
    let inner = text.strip_prefix('[')?.strip_suffix(']')?;
    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let Some(quote) = chars.next() else {
            break;
        };
        if quote != '\'' && quote != '"' {
            return None;
        }

        let mut item = String::new();
        loop {
            match chars.next()? {
                '\\' => item.push(chars.next()?),
                c if c == quote => break,
                c => item.push(c),
            }
        }
        items.push(item);

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(_) => return None,
        }
    }

    Some(items)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::fs;
    use std::path::Path;

    pub const DESCRIPTION: &str = "\
Disease,Description
Fungal infection,Fungal infection is a common skin condition caused by fungi.
Allergy,Allergy is an immune system reaction to a substance in the environment.
Fungal infection,A second description that must be ignored.
";

    pub const PRECAUTIONS: &str = "\
,Disease,Precaution_1,Precaution_2,Precaution_3,Precaution_4
0,Fungal infection,bath twice,use detol or neem in bathing water,keep infected area dry,use clean cloths
1,Allergy,apply calamine,cover area with bandage,,use ice to compress itching
2,Fungal infection,ignored,ignored,ignored,ignored
";

    pub const MEDICATIONS: &str = "\
Disease,Medication
Fungal infection,\"['Antifungal Cream', 'Fluconazole', 'Terbinafine']\"
Fungal infection,Ketoconazole
";

    pub const DIETS: &str = "\
Disease,Diet
Fungal infection,\"['Antifungal Diet', 'Probiotics']\"
Allergy,\"['Elimination Diet', 'Omega-3-rich foods']\"
";

    pub const WORKOUT: &str = "\
Unnamed: 0,disease,workout
0,Fungal infection,Avoid sugary foods
1,Fungal infection,Consume probiotics
2,Allergy,Avoid allergenic foods
";

    /// Write a complete, valid data directory.
    pub fn write_all(dir: &Path) {
        fs::write(dir.join(super::DESCRIPTION_FILE), DESCRIPTION).expect("write");
        fs::write(dir.join(super::PRECAUTIONS_FILE), PRECAUTIONS).expect("write");
        fs::write(dir.join(super::MEDICATIONS_FILE), MEDICATIONS).expect("write");
        fs::write(dir.join(super::DIETS_FILE), DIETS).expect("write");
        fs::write(dir.join(super::WORKOUT_FILE), WORKOUT).expect("write");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::integrity::AssetManifest;
    use std::fs;

    fn loaded() -> CsvReferenceTables {
        let dir = tempfile::tempdir().expect("tempdir");
        fixtures::write_all(dir.path());
        CsvReferenceTables::load(dir.path(), false).expect("load")
    }

    #[test]
    fn test_first_description_wins() {
        let tables = loaded();
        assert_eq!(
            tables.description("Fungal infection"),
            Some("Fungal infection is a common skin condition caused by fungi.")
        );
        assert_eq!(tables.description_count(), 2);
    }

    #[test]
    fn test_precautions_first_row_skips_empty_cells() {
        let tables = loaded();
        assert_eq!(
            tables.precautions("Fungal infection").expect("row"),
            [
                "bath twice",
                "use detol or neem in bathing water",
                "keep infected area dry",
                "use clean cloths"
            ]
        );
        assert_eq!(
            tables.precautions("Allergy").expect("row"),
            ["apply calamine", "cover area with bandage", "use ice to compress itching"]
        );
    }

    #[test]
    fn test_list_cells_are_expanded_and_rows_concatenated() {
        let tables = loaded();
        assert_eq!(
            tables.medications("Fungal infection"),
            ["Antifungal Cream", "Fluconazole", "Terbinafine", "Ketoconazole"]
        );
        assert_eq!(tables.diet("Allergy"), ["Elimination Diet", "Omega-3-rich foods"]);
        assert_eq!(
            tables.workout("Fungal infection"),
            ["Avoid sugary foods", "Consume probiotics"]
        );
    }

    #[test]
    fn test_lookup_misses() {
        let tables = loaded();
        assert!(tables.medications("Allergy").is_empty());
        assert!(tables.description("Unknown").is_none());
        assert!(tables.precautions("Unknown").is_none());
        // Keys are exact
        assert!(tables.description("fungal infection").is_none());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        fixtures::write_all(dir.path());
        fs::remove_file(dir.path().join(DIETS_FILE)).expect("remove");

        let err = CsvReferenceTables::load(dir.path(), false).expect_err("must fail");
        assert!(matches!(err, TableError::MissingFile(p) if p.ends_with(DIETS_FILE)));
    }

    #[test]
    fn test_missing_disease_column_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        fixtures::write_all(dir.path());
        fs::write(dir.path().join(DESCRIPTION_FILE), "Name,Description\nAllergy,x\n")
            .expect("write");

        let err = CsvReferenceTables::load(dir.path(), false).expect_err("must fail");
        assert!(matches!(
            err,
            TableError::MissingColumn { ref column, .. } if column == "Disease"
        ));
    }

    #[test]
    fn test_missing_value_column_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        fixtures::write_all(dir.path());
        fs::write(dir.path().join(MEDICATIONS_FILE), "Disease,Drug\nAllergy,x\n").expect("write");

        assert!(matches!(
            CsvReferenceTables::load(dir.path(), false),
            Err(TableError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_manifest_must_cover_tables() {
        let dir = tempfile::tempdir().expect("tempdir");
        fixtures::write_all(dir.path());
        assert!(matches!(
            CsvReferenceTables::load(dir.path(), true),
            Err(TableError::Integrity(_))
        ));

        AssetManifest::for_directory(dir.path())
            .expect("build")
            .write_to(dir.path())
            .expect("write");
        assert!(CsvReferenceTables::load(dir.path(), true).is_ok());

        fs::write(dir.path().join(WORKOUT_FILE), "Disease,workout\nAllergy,run\n").expect("write");
        assert!(matches!(
            CsvReferenceTables::load(dir.path(), false),
            Err(TableError::Integrity(_))
        ));
    }

    #[test]
    fn test_expand_cell() {
        assert_eq!(expand_cell("['a', 'b']"), ["a", "b"]);
        assert_eq!(expand_cell("[\"it's\", 'x']"), ["it's", "x"]);
        assert_eq!(expand_cell("[]"), Vec::<String>::new());
        assert_eq!(expand_cell("Plain value"), ["Plain value"]);
        assert_eq!(expand_cell("[not a list]"), ["[not a list]"]);
        assert_eq!(expand_cell("['unterminated"), ["['unterminated"]);
    }
}
