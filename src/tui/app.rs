//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Speech and prediction via a background worker

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::adapters::speech::{
    CommandRecognizer, CommandSynthesizer, DisabledRecognizer, SilentSynthesizer,
};
use crate::application::{CheckerContext, SymptomChecker, VoiceAssistant};
use crate::config::AppConfig;
use crate::domain::PredictionRecord;
use crate::ports::{SpeechRecognizer, SpeechSynthesizer};

use super::ui::{
    dashboard::{render_dashboard, DashboardState},
    render_disclaimer,
    report::render_report,
    symptoms::{render_symptom_input, SymptomInputState},
    Activity,
};
use super::worker::{AssistantWorker, WorkerHandle, WorkerProgress, WorkerTask};

/// Predictions kept for the dashboard.
const HISTORY_LIMIT: usize = 50;

/// Current screen/view in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Symptoms,
    Report,
}

/// Main application state
pub struct App {
    screen: Screen,
    should_quit: bool,

    checker: Arc<SymptomChecker>,
    assistant: VoiceAssistant,
    voice_enabled: bool,

    dashboard_state: DashboardState,
    symptom_state: SymptomInputState,

    /// Latest prediction, shown on the report screen
    report: Option<PredictionRecord>,

    /// Session history, oldest first
    history: Vec<PredictionRecord>,

    /// Pending worker (at most one)
    pending_worker: Option<WorkerHandle>,
    /// Started once the pending worker finishes
    queued_task: Option<WorkerTask>,
    activity: Activity,
}

impl App {
    /// Build the application from configuration.
    ///
    /// Loads the model and reference data, and wires speech engines: the
    /// recognizer needs `DOBBY_STT_COMMAND`; with `DOBBY_VOICE` off nothing
    /// is spoken.
    ///
    /// # Errors
    /// Returns error if the model or reference data cannot be loaded.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let context = CheckerContext::load(config)?;
        let checker = Arc::new(SymptomChecker::new(Arc::new(context)));

        let recognizer: Arc<dyn SpeechRecognizer> =
            match config.stt_command.as_deref().and_then(CommandRecognizer::new) {
                Some(stt) => Arc::new(stt),
                None => Arc::new(DisabledRecognizer),
            };

        let synthesizer: Arc<dyn SpeechSynthesizer> = if config.voice {
            let tts = config
                .tts_command
                .as_deref()
                .and_then(CommandSynthesizer::new)
                .unwrap_or_else(CommandSynthesizer::platform_default);
            tracing::info!("Speaking via {:?}", tts.program());
            Arc::new(tts)
        } else {
            Arc::new(SilentSynthesizer)
        };

        let assistant = VoiceAssistant::new(recognizer, synthesizer, config.wake_phrase.clone());
        let voice_enabled = config.voice && config.stt_command.is_some();
        if config.voice && !voice_enabled {
            tracing::warn!("DOBBY_VOICE is set but DOBBY_STT_COMMAND is not; voice input disabled");
        }

        Ok(Self::with_dependencies(checker, assistant, voice_enabled))
    }

    /// Create application with injected dependencies (Composition Root pattern).
    #[must_use]
    pub fn with_dependencies(
        checker: Arc<SymptomChecker>,
        assistant: VoiceAssistant,
        voice_enabled: bool,
    ) -> Self {
        let dashboard_state = DashboardState {
            symptom_count: checker.context().vocabulary().len(),
            disease_count: checker.context().labels().len(),
            voice_enabled,
            wake_phrase: assistant.wake_phrase().to_string(),
            notice: None,
        };

        Self {
            screen: Screen::Dashboard,
            should_quit: false,
            checker,
            assistant,
            voice_enabled,
            dashboard_state,
            symptom_state: SymptomInputState::default(),
            report: None,
            history: Vec::new(),
            pending_worker: None,
            queued_task: None,
            activity: Activity::Idle,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        if self.voice_enabled {
            self.start(WorkerTask::WaitForWake);
        }

        let result = self.main_loop(&mut terminal);

        if let Some(worker) = &self.pending_worker {
            worker.cancel();
        }

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.poll_worker();

            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Draw the current screen.
    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(2)])
            .split(f.area());

        match (&self.screen, &self.report) {
            (Screen::Report, Some(record)) => render_report(f, chunks[0], record, self.activity),
            (Screen::Symptoms, _) => {
                render_symptom_input(f, chunks[0], &self.symptom_state, self.activity)
            }
            _ => render_dashboard(
                f,
                chunks[0],
                &self.dashboard_state,
                &self.history,
                self.activity,
            ),
        }

        render_disclaimer(f, chunks[1]);
    }

    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    #[must_use]
    pub fn activity(&self) -> Activity {
        self.activity
    }

    #[must_use]
    pub fn history(&self) -> &[PredictionRecord] {
        &self.history
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.pending_worker.is_some()
    }

    fn start(&mut self, task: WorkerTask) {
        if self.pending_worker.is_some() {
            tracing::debug!("Worker busy, ignoring {:?}", task);
            return;
        }

        self.activity = match task {
            WorkerTask::WaitForWake => Activity::WaitingForWake,
            WorkerTask::CaptureSymptoms => Activity::Listening,
            WorkerTask::Predict { .. } => Activity::Predicting,
            WorkerTask::Speak(_) => Activity::Speaking,
        };
        self.pending_worker = Some(AssistantWorker::spawn(
            task,
            Arc::clone(&self.checker),
            self.assistant.clone(),
        ));
    }

    /// Poll the background worker for progress updates.
    pub fn poll_worker(&mut self) {
        while let Some(progress) = self
            .pending_worker
            .as_ref()
            .and_then(WorkerHandle::try_recv)
        {
            match progress {
                WorkerProgress::Listening => {}
                WorkerProgress::Awake => {
                    self.dashboard_state.notice = None;
                    if self.queued_task.is_none() {
                        self.open_symptom_input();
                    }
                }
                WorkerProgress::WakeUnavailable(message) => {
                    self.dashboard_state.notice =
                        Some(format!("{message}. Type your symptoms instead."));
                    if self.queued_task.is_none() {
                        self.open_symptom_input();
                    }
                }
                WorkerProgress::Heard(transcript) => {
                    self.symptom_state.heard = Some(transcript);
                    self.symptom_state.clear();
                }
                WorkerProgress::RecognitionFailed(message) => {
                    self.symptom_state.clear();
                    self.symptom_state.error_message = Some(message);
                }
                WorkerProgress::Predicting => self.activity = Activity::Predicting,
                WorkerProgress::Complete(record) => {
                    self.history.push((*record).clone());
                    if self.history.len() > HISTORY_LIMIT {
                        self.history.remove(0);
                    }
                    self.report = Some(*record);
                    self.screen = Screen::Report;
                }
                WorkerProgress::Speaking => self.activity = Activity::Speaking,
                WorkerProgress::Error(message) => {
                    self.symptom_state.error_message = Some(message);
                    self.screen = Screen::Symptoms;
                }
                WorkerProgress::Done => {
                    self.pending_worker = None;
                    self.activity = Activity::Idle;
                    if let Some(task) = self.queued_task.take() {
                        self.start(task);
                    }
                }
            }
        }
    }

    fn open_symptom_input(&mut self) {
        self.symptom_state = SymptomInputState::default();
        self.screen = Screen::Symptoms;
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if matches!(key, KeyCode::Char('c') | KeyCode::Char('q'))
            && modifiers.contains(KeyModifiers::CONTROL)
        {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Symptoms => self.handle_symptom_key(key),
            Screen::Report => self.handle_report_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n' | 'N') => self.open_symptom_input(),
            KeyCode::Char('w' | 'W') if self.voice_enabled => {
                self.start(WorkerTask::WaitForWake);
            }
            KeyCode::Esc => self.cancel_worker(),
            KeyCode::Char('q' | 'Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_symptom_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.cancel_worker();
                self.screen = Screen::Dashboard;
            }
            KeyCode::Enter => self.submit_symptoms(),
            KeyCode::Backspace => self.symptom_state.delete_char(),
            KeyCode::Char(c) => self.symptom_state.input_char(c),
            _ => {}
        }
    }

    fn handle_report_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n' | 'N') | KeyCode::Enter => self.open_symptom_input(),
            KeyCode::Char('r' | 'R') => {
                if let Some(record) = &self.report {
                    let text = record.prediction.report_text();
                    self.start(WorkerTask::Speak(text));
                }
            }
            KeyCode::Esc => self.screen = Screen::Dashboard,
            _ => {}
        }
    }

    fn submit_symptoms(&mut self) {
        let task = if self.symptom_state.wants_audio() {
            self.symptom_state.error_message = None;
            WorkerTask::CaptureSymptoms
        } else {
            let raw = self.symptom_state.input.trim().to_string();
            if raw.is_empty() {
                self.symptom_state.error_message =
                    Some("Enter at least one symptom, or type 'audio' to speak.".to_string());
                return;
            }
            self.symptom_state.heard = None;
            WorkerTask::Predict { raw }
        };

        if !self.is_busy() {
            self.start(task);
            return;
        }

        // Typed input takes over from wake phrase listening.
        if self.activity == Activity::WaitingForWake || self.queued_task.is_some() {
            tracing::debug!("Stopping wake phrase listening for {:?}", task);
            self.cancel_worker();
            self.queued_task = Some(task);
        } else {
            self.symptom_state.error_message =
                Some("Still busy with the last request. Press Esc to stop it.".to_string());
        }
    }

    fn cancel_worker(&mut self) {
        self.queued_task = None;
        if let Some(worker) = &self.pending_worker {
            worker.cancel();
            self.activity = Activity::Stopping;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{checker_with, StubClassifier};
    use crate::ports::{RecognitionError, SpeechError};
    use ratatui::backend::TestBackend;
    use std::time::Instant;

    struct FixedRecognizer(Result<String, RecognitionError>);

    impl SpeechRecognizer for FixedRecognizer {
        fn listen(&self) -> Result<String, RecognitionError> {
            self.0.clone()
        }
    }

    struct Mute;

    impl SpeechSynthesizer for Mute {
        fn speak(&self, _text: &str) -> Result<(), SpeechError> {
            Ok(())
        }
    }

    fn app_with(heard: Result<String, RecognitionError>) -> App {
        let checker = Arc::new(checker_with(StubClassifier::always(15)));
        let assistant =
            VoiceAssistant::new(Arc::new(FixedRecognizer(heard)), Arc::new(Mute), "wake up dobby");
        App::with_dependencies(checker, assistant, true)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    fn wait_idle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.is_busy() {
            assert!(Instant::now() < deadline, "worker did not finish");
            app.poll_worker();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).expect("terminal");
        terminal.draw(|f| app.render(f)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_typed_symptoms_produce_report() {
        let mut app = app_with(Err(RecognitionError::Unintelligible));
        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        assert_eq!(app.screen(), &Screen::Symptoms);

        type_text(&mut app, "itching, skin rash");
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        wait_idle(&mut app);

        assert_eq!(app.screen(), &Screen::Report);
        assert_eq!(app.history().len(), 1);
        assert!(!app.history()[0].voice_input);
        assert!(screen_text(&app).contains("Fungal infection"));
    }

    #[test]
    fn test_audio_command_uses_transcript() {
        let mut app = app_with(Ok("itching, nodal skin eruptions".into()));
        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        type_text(&mut app, "audio");
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        wait_idle(&mut app);

        assert_eq!(app.screen(), &Screen::Report);
        let record = &app.history()[0];
        assert!(record.voice_input);
        assert_eq!(record.recognized, ["itching", "nodal skin eruptions"]);
    }

    #[test]
    fn test_recognition_failure_is_shown_inline() {
        let mut app = app_with(Err(RecognitionError::Unintelligible));
        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        type_text(&mut app, "audio");
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        wait_idle(&mut app);

        assert_eq!(app.screen(), &Screen::Symptoms);
        assert!(app.history().is_empty());
        assert!(screen_text(&app).contains("Sorry, I did not understand that"));
    }

    #[test]
    fn test_wake_service_failure_falls_back_to_typing() {
        let mut app = app_with(Err(RecognitionError::ServiceUnavailable("offline".into())));
        app.handle_key(KeyCode::Char('w'), KeyModifiers::NONE);
        wait_idle(&mut app);

        assert_eq!(app.screen(), &Screen::Symptoms);
        let notice = app.dashboard_state.notice.clone().expect("notice");
        assert!(notice.starts_with("Sorry, I could not request results"));
    }

    struct SlowUnintelligible;

    impl SpeechRecognizer for SlowUnintelligible {
        fn listen(&self) -> Result<String, RecognitionError> {
            std::thread::sleep(Duration::from_millis(300));
            Err(RecognitionError::Unintelligible)
        }
    }

    #[test]
    fn test_typed_symptoms_interrupt_wake_listening() {
        let checker = Arc::new(checker_with(StubClassifier::always(15)));
        let assistant =
            VoiceAssistant::new(Arc::new(SlowUnintelligible), Arc::new(Mute), "wake up dobby");
        let mut app = App::with_dependencies(checker, assistant, true);

        app.handle_key(KeyCode::Char('w'), KeyModifiers::NONE);
        assert_eq!(app.activity(), Activity::WaitingForWake);
        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        type_text(&mut app, "itching");
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.activity(), Activity::Stopping);
        wait_idle(&mut app);

        assert_eq!(app.screen(), &Screen::Report);
        assert_eq!(app.history().len(), 1);
        assert_eq!(app.history()[0].recognized, ["itching"]);
    }

    #[test]
    fn test_busy_submission_is_explained() {
        let mut app = app_with(Err(RecognitionError::Unintelligible));
        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        type_text(&mut app, "itching");
        app.start(WorkerTask::Speak("hello".into()));
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        assert!(app
            .symptom_state
            .error_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Still busy")));
        wait_idle(&mut app);
        assert!(app.history().is_empty());
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let mut app = app_with(Err(RecognitionError::Unintelligible));
        app.handle_key(KeyCode::Char('n'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        assert!(!app.is_busy());
        assert!(screen_text(&app).contains("Enter at least one symptom"));
    }

    #[test]
    fn test_dashboard_renders() {
        let app = app_with(Err(RecognitionError::Unintelligible));
        let text = screen_text(&app);
        assert!(text.contains("Dobby"));
        assert!(text.contains("No checks yet"));
    }
}
