//! Linear model adapter: Implementation of Classifier for exported
//! one-vs-rest linear models.
//!
//! The training pipeline exports the fitted model as `model.json`:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "kind": "linear_ovr",
//!   "n_features": 132,
//!   "classes": [0, 1, 2],
//!   "coefficients": [[0.1, ...], [..], [..]],
//!   "intercepts": [-0.5, 0.2, 0.0]
//! }
//! ```
//!
//! The predicted label is the class whose decision score
//! `coefficients[k] . x + intercepts[k]` is highest; on ties the first
//! class in `classes` wins.
//!
//! # Loading
//!
//! Loading is all-or-nothing: a missing file, malformed JSON, inconsistent
//! shapes or non-finite parameters are reported as errors so the caller can
//! refuse to start. If the model directory carries a `manifest.json`, the
//! model file must be listed in it and match its digest.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adapters::integrity::{self, IntegrityError};
use crate::domain::FeatureVector;
use crate::ports::{Classifier, ClassifierError};

/// File name of the exported model inside the model directory.
pub const MODEL_FILE: &str = "model.json";

const FORMAT_VERSION: u32 = 1;
const KIND_LINEAR_OVR: &str = "linear_ovr";

/// Model parameters exported by the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedLinearModel {
    pub format_version: u32,
    pub kind: String,
    pub n_features: usize,
    pub classes: Vec<u32>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl ExportedLinearModel {
    /// Check shapes and values.
    ///
    /// # Errors
    /// Returns `ClassifierError::Format` describing the first problem found.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ClassifierError::Format(format!(
                "unsupported format_version {} (expected {FORMAT_VERSION})",
                self.format_version
            )));
        }
        if self.kind != KIND_LINEAR_OVR {
            return Err(ClassifierError::Format(format!(
                "unsupported model kind {:?} (expected {KIND_LINEAR_OVR:?})",
                self.kind
            )));
        }
        if self.n_features == 0 {
            return Err(ClassifierError::Format("n_features must be positive".into()));
        }
        if self.classes.is_empty() {
            return Err(ClassifierError::Format("model has no classes".into()));
        }

        let mut seen = HashSet::with_capacity(self.classes.len());
        if let Some(dup) = self.classes.iter().find(|c| !seen.insert(**c)) {
            return Err(ClassifierError::Format(format!("duplicate class {dup}")));
        }

        if self.coefficients.len() != self.classes.len()
            || self.intercepts.len() != self.classes.len()
        {
            return Err(ClassifierError::Format(format!(
                "{} classes but {} coefficient rows and {} intercepts",
                self.classes.len(),
                self.coefficients.len(),
                self.intercepts.len()
            )));
        }

        for (k, row) in self.coefficients.iter().enumerate() {
            if row.len() != self.n_features {
                return Err(ClassifierError::Format(format!(
                    "coefficient row {k} has {} values, expected {}",
                    row.len(),
                    self.n_features
                )));
            }
            if row.iter().any(|w| !w.is_finite()) {
                return Err(ClassifierError::Format(format!(
                    "coefficient row {k} contains a non-finite value"
                )));
            }
        }
        if self.intercepts.iter().any(|b| !b.is_finite()) {
            return Err(ClassifierError::Format("non-finite intercept".into()));
        }

        Ok(())
    }
}

/// One-vs-rest linear classifier.
#[derive(Debug, Clone)]
pub struct LinearModel {
    model: ExportedLinearModel,
}

impl LinearModel {
    /// Wrap already-parsed parameters after validating them.
    ///
    /// # Errors
    /// Returns `ClassifierError::Format` if the parameters are inconsistent.
    pub fn from_exported(model: ExportedLinearModel) -> Result<Self, ClassifierError> {
        model.validate()?;
        Ok(Self { model })
    }

    /// Load `model.json` from a model directory (or a direct file path).
    ///
    /// When `require_manifest` is set, the directory must contain a
    /// `manifest.json` covering the model file.
    ///
    /// # Errors
    /// Returns `ClassifierError::NotFound` if the file is missing,
    /// `ClassifierError::Integrity` on a manifest problem and
    /// `ClassifierError::Format` if the content is not a valid model.
    pub fn load(model_path: &Path, require_manifest: bool) -> Result<Self, ClassifierError> {
        // A missing path without an extension names a directory.
        let names_file =
            model_path.is_file() || (!model_path.is_dir() && model_path.extension().is_some());
        let (base_dir, model_file) = if !names_file {
            (model_path.to_path_buf(), model_path.join(MODEL_FILE))
        } else {
            let base = model_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            (base, model_path.to_path_buf())
        };

        if !model_file.exists() {
            return Err(ClassifierError::NotFound { path: model_file });
        }

        let file_name = model_file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(MODEL_FILE)
            .to_string();
        if let Some(manifest) =
            integrity::verify_directory(&base_dir, require_manifest).map_err(integrity_error)?
        {
            manifest.require(&[&file_name]).map_err(integrity_error)?;
        }

        let content = std::fs::read_to_string(&model_file)
            .map_err(|e| ClassifierError::Io(format!("{model_file:?}: {e}")))?;
        let exported: ExportedLinearModel = serde_json::from_str(&content)
            .map_err(|e| ClassifierError::Format(e.to_string()))?;
        let model = Self::from_exported(exported)?;

        tracing::info!(
            "Loaded model from {:?} (kind={}, n_features={}, n_classes={})",
            model_file,
            model.model.kind,
            model.model.n_features,
            model.model.classes.len()
        );

        Ok(model)
    }

    /// Decision score of every class, in `classes` order.
    #[must_use]
    pub fn decision_scores(&self, x: &[f64]) -> Vec<f64> {
        self.model
            .coefficients
            .iter()
            .zip(&self.model.intercepts)
            .map(|(row, b)| row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + b)
            .collect()
    }
}

impl Classifier for LinearModel {
    fn classify(&self, features: &FeatureVector) -> Result<u32, ClassifierError> {
        if features.len() != self.model.n_features {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.model.n_features,
                got: features.len(),
            });
        }

        let scores = self.decision_scores(features.as_slice());
        let mut best = 0;
        for (k, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = k;
            }
        }

        tracing::debug!(
            "Classified {} active feature(s): class index {} (score {:.4})",
            features.active_count(),
            best,
            scores[best]
        );

        Ok(self.model.classes[best])
    }

    fn n_features(&self) -> usize {
        self.model.n_features
    }

    fn labels(&self) -> Vec<u32> {
        self.model.classes.clone()
    }
}

fn integrity_error(err: IntegrityError) -> ClassifierError {
    ClassifierError::Integrity(err.to_string())
}
