//! Background worker for blocking speech and prediction work.
//!
//! Speech capture and synthesis block for seconds at a time. The worker
//! runs one task on its own thread and reports progress over a channel so
//! the TUI main loop keeps drawing. The app never runs two workers at
//! once, so listening and speaking cannot overlap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::{SymptomChecker, VoiceAssistant, WakeOutcome};
use crate::domain::PredictionRecord;

/// Work the worker can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerTask {
    /// Listen until the wake phrase is heard
    WaitForWake,
    /// Capture spoken symptoms, then predict and read the report aloud
    CaptureSymptoms,
    /// Predict from typed symptoms and read the report aloud
    Predict { raw: String },
    /// Read text aloud
    Speak(String),
}

/// Progress updates from the worker.
#[derive(Debug, Clone)]
pub enum WorkerProgress {
    Listening,
    Awake,
    /// Wake phrase listening stopped; the message says why
    WakeUnavailable(String),
    Heard(String),
    /// Message for the user, e.g. "Sorry, I did not understand that"
    RecognitionFailed(String),
    Predicting,
    Complete(Box<PredictionRecord>),
    Speaking,
    Error(String),
    /// The task is over; the worker thread is exiting
    Done,
}

/// Handle to a running worker.
pub struct WorkerHandle {
    progress_rx: Receiver<WorkerProgress>,
    cancel: Arc<AtomicBool>,
    _handle: JoinHandle<()>,
}

impl WorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<WorkerProgress> {
        self.progress_rx.try_recv().ok()
    }

    /// Ask the worker to stop at the next opportunity.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

/// Worker that runs one [`WorkerTask`] in the background.
pub struct AssistantWorker;

impl AssistantWorker {
    pub fn spawn(
        task: WorkerTask,
        checker: Arc<SymptomChecker>,
        assistant: VoiceAssistant,
    ) -> WorkerHandle {
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);

        let handle = thread::spawn(move || {
            Self::run(task, &checker, &assistant, &flag, &tx);
            let _ = tx.send(WorkerProgress::Done);
        });

        WorkerHandle {
            progress_rx: rx,
            cancel,
            _handle: handle,
        }
    }

    fn run(
        task: WorkerTask,
        checker: &SymptomChecker,
        assistant: &VoiceAssistant,
        cancel: &AtomicBool,
        tx: &Sender<WorkerProgress>,
    ) {
        match task {
            WorkerTask::WaitForWake => {
                let _ = tx.send(WorkerProgress::Listening);
                match assistant.wait_for_wake(cancel) {
                    WakeOutcome::Awake => {
                        let _ = tx.send(WorkerProgress::Awake);
                    }
                    WakeOutcome::Unavailable(err) => {
                        let _ = tx.send(WorkerProgress::WakeUnavailable(
                            err.user_message().to_string(),
                        ));
                    }
                    WakeOutcome::Cancelled => {}
                }
            }
            WorkerTask::CaptureSymptoms => {
                let _ = tx.send(WorkerProgress::Listening);
                match assistant.listen_for_symptoms() {
                    Ok(transcript) => {
                        let _ = tx.send(WorkerProgress::Heard(transcript.clone()));
                        if !cancel.load(Ordering::Relaxed) {
                            Self::predict_and_speak(&transcript, true, checker, assistant, tx);
                        }
                    }
                    Err(err) => {
                        let message = err.user_message();
                        let _ = tx.send(WorkerProgress::RecognitionFailed(message.to_string()));
                        assistant.speak(message);
                    }
                }
            }
            WorkerTask::Predict { raw } => {
                Self::predict_and_speak(&raw, false, checker, assistant, tx);
            }
            WorkerTask::Speak(text) => {
                let _ = tx.send(WorkerProgress::Speaking);
                assistant.speak(&text);
            }
        }
    }

    fn predict_and_speak(
        raw: &str,
        voice_input: bool,
        checker: &SymptomChecker,
        assistant: &VoiceAssistant,
        tx: &Sender<WorkerProgress>,
    ) {
        let _ = tx.send(WorkerProgress::Predicting);
        match checker.assess(raw, voice_input) {
            Ok(record) => {
                let text = record.prediction.report_text();
                let _ = tx.send(WorkerProgress::Complete(Box::new(record)));
                let _ = tx.send(WorkerProgress::Speaking);
                assistant.speak(&text);
            }
            Err(e) => {
                tracing::warn!("Prediction failed: {}", e);
                let _ = tx.send(WorkerProgress::Error(e.to_string()));
            }
        }
    }
}
