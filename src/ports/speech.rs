//! Speech ports: Traits for speech capture and synthesis.
//!
//! The engines themselves are external (OS voices, cloud recognizers);
//! these traits are the only thing the application depends on.

/// Errors from speech recognition.
///
/// Both kinds are recoverable for a single request. Callers decide whether
/// repeated `ServiceUnavailable` ends a listening loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecognitionError {
    /// Audio was captured but could not be turned into text
    #[error("speech was not understood")]
    Unintelligible,

    /// The recognition service could not be reached or failed to run
    #[error("recognition service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl RecognitionError {
    /// Message shown or spoken to the user.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unintelligible => "Sorry, I did not understand that",
            Self::ServiceUnavailable(_) => "Sorry, I could not request results",
        }
    }
}

/// Errors from speech synthesis.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SpeechError {
    #[error("no speech synthesizer available: {0}")]
    Unavailable(String),

    #[error("speech synthesis failed: {0}")]
    Failed(String),
}

/// Captures one utterance and returns its transcript.
pub trait SpeechRecognizer: Send + Sync {
    /// Block until an utterance has been captured and transcribed.
    ///
    /// # Errors
    /// Returns `RecognitionError::Unintelligible` for empty or unusable
    /// transcripts and `RecognitionError::ServiceUnavailable` when the
    /// recognizer cannot run.
    fn listen(&self) -> Result<String, RecognitionError>;
}

/// Speaks text aloud.
pub trait SpeechSynthesizer: Send + Sync {
    /// Block until `text` has been spoken.
    ///
    /// # Errors
    /// Returns `SpeechError` if no voice is available or playback fails.
    fn speak(&self, text: &str) -> Result<(), SpeechError>;
}
