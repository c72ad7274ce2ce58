//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (model artifact, reference
//! data files, speech engines).

mod classifier;
mod reference;
mod speech;

pub use classifier::{Classifier, ClassifierError};
pub use reference::ReferenceData;
pub use speech::{RecognitionError, SpeechError, SpeechRecognizer, SpeechSynthesizer};
