//! Asset manifests: SHA-256 digests of model and reference data files.
//!
//! A directory may carry a `manifest.json` listing the files it contains
//! and their digests. When present it is verified before anything in the
//! directory is loaded, so a partially copied or edited asset set is
//! rejected at startup instead of producing wrong predictions later.
//!
//! ```json
//! { "version": 1, "files": { "model.json": "9f86d0...", "...": "..." } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// File name of the manifest inside an asset directory.
pub const MANIFEST_FILE: &str = "manifest.json";

const MANIFEST_VERSION: u32 = 1;

/// Errors raised while building or verifying a manifest.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IntegrityError {
    #[error("{0:?} has no manifest.json but one is required")]
    MissingManifest(PathBuf),

    #[error("Cannot read {path:?}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Unsupported manifest version: {0}")]
    UnsupportedVersion(u32),

    #[error("File hash mismatch for {0}")]
    HashMismatch(String),

    #[error("Manifest does not cover required file {0}")]
    NotCovered(String),
}

/// Digest list for the files of one asset directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

impl AssetManifest {
    /// Hash every regular file directly inside `dir` (except the manifest).
    ///
    /// # Errors
    /// Returns `IntegrityError::Unreadable` if the directory or a file
    /// cannot be read.
    pub fn for_directory(dir: &Path) -> Result<Self, IntegrityError> {
        let entries = fs::read_dir(dir).map_err(|e| unreadable(dir, &e))?;

        let mut files = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|e| unreadable(dir, &e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name == MANIFEST_FILE {
                continue;
            }
            let bytes = fs::read(&path).map_err(|e| unreadable(&path, &e))?;
            files.insert(name.to_string(), sha256_hex(&bytes));
        }

        Ok(Self {
            version: MANIFEST_VERSION,
            files,
        })
    }

    /// Write the manifest as pretty JSON into `dir`.
    ///
    /// # Errors
    /// Returns `IntegrityError::Unreadable` if the file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, IntegrityError> {
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| IntegrityError::InvalidManifest(e.to_string()))?;
        fs::write(&path, json).map_err(|e| unreadable(&path, &e))?;
        Ok(path)
    }

    /// Whether `name` is listed.
    #[must_use]
    pub fn covers(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Fail unless every name in `required` is listed.
    ///
    /// # Errors
    /// Returns `IntegrityError::NotCovered` naming the first missing file.
    pub fn require(&self, required: &[&str]) -> Result<(), IntegrityError> {
        match required.iter().find(|name| !self.covers(name)) {
            Some(name) => Err(IntegrityError::NotCovered((*name).to_string())),
            None => Ok(()),
        }
    }
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Verify the manifest of `dir`, if it has one.
///
/// Returns `Ok(None)` when there is no manifest and `required` is false.
///
/// # Errors
/// Returns an `IntegrityError` if the manifest is required but absent,
/// malformed, references a missing file, or any digest differs.
pub fn verify_directory(dir: &Path, required: bool) -> Result<Option<AssetManifest>, IntegrityError> {
    let manifest_path = dir.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        if required {
            return Err(IntegrityError::MissingManifest(dir.to_path_buf()));
        }
        tracing::debug!("No manifest in {:?}, skipping integrity check", dir);
        return Ok(None);
    }

    let content = fs::read(&manifest_path).map_err(|e| unreadable(&manifest_path, &e))?;
    let manifest: AssetManifest = serde_json::from_slice(&content)
        .map_err(|e| IntegrityError::InvalidManifest(e.to_string()))?;

    if manifest.version != MANIFEST_VERSION {
        return Err(IntegrityError::UnsupportedVersion(manifest.version));
    }
    if manifest.files.is_empty() {
        return Err(IntegrityError::InvalidManifest("manifest lists no files".into()));
    }

    for (rel, expected_hex) in &manifest.files {
        if !is_plain_relative(rel) {
            return Err(IntegrityError::InvalidManifest(format!(
                "entry {rel:?} must be a relative path inside the asset directory"
            )));
        }
        let path = dir.join(rel);
        let bytes = fs::read(&path).map_err(|e| unreadable(&path, &e))?;
        if !sha256_hex(&bytes).eq_ignore_ascii_case(expected_hex.trim()) {
            return Err(IntegrityError::HashMismatch(rel.clone()));
        }
    }

    tracing::info!(
        "Verified {} file(s) against {:?}",
        manifest.files.len(),
        manifest_path
    );
    Ok(Some(manifest))
}

fn is_plain_relative(rel: &str) -> bool {
    let path = Path::new(rel);
    !rel.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

fn unreadable(path: &Path, err: &std::io::Error) -> IntegrityError {
    IntegrityError::Unreadable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"test"),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_roundtrip_directory_manifest() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("model.json"), b"{}").expect("write");
        fs::write(dir.path().join("notes.txt"), b"hello").expect("write");

        let manifest = AssetManifest::for_directory(dir.path()).expect("build");
        assert!(manifest.covers("model.json"));
        assert!(manifest.covers("notes.txt"));
        manifest.write_to(dir.path()).expect("write manifest");

        let verified = verify_directory(dir.path(), true).expect("verify");
        assert_eq!(verified, Some(manifest));
    }

    #[test]
    fn test_manifest_does_not_list_itself() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("a.csv"), b"x").expect("write");
        AssetManifest::for_directory(dir.path())
            .expect("build")
            .write_to(dir.path())
            .expect("write");

        let again = AssetManifest::for_directory(dir.path()).expect("rebuild");
        assert!(!again.covers(MANIFEST_FILE));
    }

    #[test]
    fn test_tampered_file_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("model.json"), b"{}").expect("write");
        AssetManifest::for_directory(dir.path())
            .expect("build")
            .write_to(dir.path())
            .expect("write");

        fs::write(dir.path().join("model.json"), b"{\"changed\":true}").expect("write");
        let err = verify_directory(dir.path(), false).expect_err("must fail");
        assert!(matches!(err, IntegrityError::HashMismatch(name) if name == "model.json"));
    }

    #[test]
    fn test_missing_manifest() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(verify_directory(dir.path(), false).expect("optional").is_none());
        assert!(matches!(
            verify_directory(dir.path(), true),
            Err(IntegrityError::MissingManifest(_))
        ));
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest = AssetManifest {
            version: 1,
            files: BTreeMap::from([("../secret".to_string(), "00".to_string())]),
        };
        manifest.write_to(dir.path()).expect("write");
        assert!(matches!(
            verify_directory(dir.path(), false),
            Err(IntegrityError::InvalidManifest(_))
        ));
    }

    #[test]
    fn test_require_reports_first_missing() {
        let manifest = AssetManifest {
            version: 1,
            files: BTreeMap::from([("model.json".to_string(), "00".to_string())]),
        };
        assert!(manifest.require(&["model.json"]).is_ok());
        assert!(matches!(
            manifest.require(&["model.json", "diets.csv"]),
            Err(IntegrityError::NotCovered(name)) if name == "diets.csv"
        ));
    }
}
