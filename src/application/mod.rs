//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod assistant;
mod context;
mod pipeline;
mod resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use assistant::{VoiceAssistant, WakeOutcome, GREETING};
pub use context::CheckerContext;
pub use pipeline::SymptomChecker;
pub use resolver::DetailResolver;
