//! Reference data port: Read-only lookups keyed by disease name.
//!
//! Matching is exact string equality. Callers pass the display name from
//! the disease label table, which is the canonical spelling.

/// Trait for the five disease reference tables.
///
/// A lookup miss is not an error: implementations return `None` or an empty
/// slice and the resolver substitutes a placeholder.
pub trait ReferenceData: Send + Sync {
    /// Description of the disease (first matching row).
    fn description(&self, disease: &str) -> Option<&str>;

    /// Precautions of the first matching row, in column order.
    fn precautions(&self, disease: &str) -> Option<&[String]>;

    /// Medications from all matching rows, in file order.
    fn medications(&self, disease: &str) -> &[String];

    /// Diet recommendations from all matching rows, in file order.
    fn diet(&self, disease: &str) -> &[String];

    /// Workout recommendations from all matching rows, in file order.
    fn workout(&self, disease: &str) -> &[String];
}
