//! Adapters layer: Concrete implementations of ports.
//!
//! - `model`: linear classifier loaded from `model.json`
//! - `tables`: CSV reference tables
//! - `speech`: command-driven speech engines
//! - `integrity`: SHA-256 asset manifests
//! - `sanitize`: personal data redaction for logs

pub mod integrity;
pub mod model;
pub mod sanitize;
pub mod speech;
pub mod tables;

// Re-export table error for lib.rs
pub use tables::TableError;
