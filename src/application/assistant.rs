//! Voice assistant: wake phrase, spoken symptom capture and read-back.
//!
//! All methods block on the speech engines and are meant to run on a
//! background thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::ports::{RecognitionError, SpeechRecognizer, SpeechSynthesizer};

/// Spoken once the wake phrase is heard.
pub const GREETING: &str = "Hello, I am Dobby. How can I assist you?";

/// First pause after an unintelligible utterance while waiting to wake.
const WAKE_RETRY_MIN: Duration = Duration::from_millis(100);
/// Cap on the pause; doubles per consecutive unintelligible result.
const WAKE_RETRY_MAX: Duration = Duration::from_secs(2);
/// How often a pause checks the cancel flag.
const CANCEL_POLL: Duration = Duration::from_millis(25);

/// How waiting for the wake phrase ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WakeOutcome {
    Awake,
    /// Recognition service failed; fall back to typed input
    Unavailable(RecognitionError),
    Cancelled,
}

/// Drives the speech ports for one user.
#[derive(Clone)]
pub struct VoiceAssistant {
    recognizer: Arc<dyn SpeechRecognizer>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    wake_phrase: String,
}

impl VoiceAssistant {
    #[must_use]
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        wake_phrase: impl Into<String>,
    ) -> Self {
        Self {
            recognizer,
            synthesizer,
            wake_phrase: wake_phrase.into().to_lowercase(),
        }
    }

    #[must_use]
    pub fn wake_phrase(&self) -> &str {
        &self.wake_phrase
    }

    /// Whether a transcript contains the wake phrase (case-insensitive).
    #[must_use]
    pub fn is_wake_command(&self, heard: &str) -> bool {
        heard.to_lowercase().contains(&self.wake_phrase)
    }

    /// Listen until the wake phrase is heard, then greet the user.
    ///
    /// Unintelligible audio and unrelated speech are ignored. The first
    /// `ServiceUnavailable` ends the wait. Consecutive unintelligible
    /// results back off so a recognizer that returns at once is not
    /// respawned in a tight loop. `cancel` is checked between utterances
    /// and during pauses.
    pub fn wait_for_wake(&self, cancel: &AtomicBool) -> WakeOutcome {
        tracing::info!("Listening for {:?}", self.wake_phrase);

        let mut retry = WAKE_RETRY_MIN;
        loop {
            if cancel.load(Ordering::Relaxed) {
                return WakeOutcome::Cancelled;
            }

            match self.recognizer.listen() {
                Ok(heard) if self.is_wake_command(&heard) => {
                    tracing::info!("Wake phrase heard");
                    self.speak(GREETING);
                    return WakeOutcome::Awake;
                }
                Ok(heard) => {
                    tracing::debug!("Heard: {}", heard);
                    retry = WAKE_RETRY_MIN;
                }
                Err(RecognitionError::Unintelligible) => {
                    pause(retry, cancel);
                    retry = (retry * 2).min(WAKE_RETRY_MAX);
                }
                Err(err) => {
                    tracing::warn!("Stopped listening for wake phrase: {}", err);
                    return WakeOutcome::Unavailable(err);
                }
            }
        }
    }

    /// Capture one utterance of symptoms.
    ///
    /// # Errors
    /// Returns the recognizer's error; both kinds leave the assistant usable.
    pub fn listen_for_symptoms(&self) -> Result<String, RecognitionError> {
        tracing::info!("Listening for symptoms...");
        self.recognizer.listen().map_err(|err| {
            tracing::warn!("Symptom capture failed: {}", err);
            err
        })
    }

    /// Speak `text`; failures are logged and reported as `false`.
    pub fn speak(&self, text: &str) -> bool {
        match self.synthesizer.speak(text) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("Speech synthesis failed: {}", err);
                false
            }
        }
    }
}

/// Sleep for `duration` or until `cancel` is set.
fn pause(duration: Duration, cancel: &AtomicBool) {
    let deadline = Instant::now() + duration;
    while !cancel.load(Ordering::Relaxed) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        thread::sleep(remaining.min(CANCEL_POLL));
    }
}
