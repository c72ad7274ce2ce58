//! Speech adapters: Implementations of the speech ports.
//!
//! Recognition and synthesis engines are external programs:
//! - `CommandRecognizer` runs a capture command and reads the transcript
//!   from its stdout (`DOBBY_STT_COMMAND`)
//! - `CommandSynthesizer` runs a voice command with the text as its final
//!   argument (`DOBBY_TTS_COMMAND`, default `say` on macOS, `espeak`
//!   elsewhere)
//! - `SilentSynthesizer` and `DisabledRecognizer` stand in when voice is off
//!
//! Commands are split on whitespace; no shell is involved.

use std::io::ErrorKind;
use std::process::{Command, Stdio};

use crate::ports::{RecognitionError, SpeechError, SpeechRecognizer, SpeechSynthesizer};

/// Default text-to-speech program for this platform.
#[must_use]
pub fn default_tts_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "say"
    } else {
        "espeak"
    }
}

/// Program and leading arguments parsed from a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

/// Speech recognizer backed by an external capture program.
///
/// The program records one utterance and prints the transcript. A zero
/// exit with blank output means nothing intelligible was heard; failing to
/// start or a non-zero exit means the service is unavailable.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    command: CommandLine,
}

impl CommandRecognizer {
    /// Returns `None` for an empty command line.
    #[must_use]
    pub fn new(command: &str) -> Option<Self> {
        CommandLine::parse(command).map(|command| Self { command })
    }
}

impl SpeechRecognizer for CommandRecognizer {
    fn listen(&self) -> Result<String, RecognitionError> {
        tracing::debug!("Listening via {:?}", self.command.program);

        let output = self
            .command
            .command()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                RecognitionError::ServiceUnavailable(format!("{}: {e}", self.command.program))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::ServiceUnavailable(format!(
                "{} exited with {}: {}",
                self.command.program,
                output.status,
                stderr.trim()
            )));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if transcript.is_empty() {
            return Err(RecognitionError::Unintelligible);
        }

        tracing::debug!("Transcript: {}", transcript);
        Ok(transcript)
    }
}

/// Recognizer used when voice input is off. Always unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRecognizer;

impl SpeechRecognizer for DisabledRecognizer {
    fn listen(&self) -> Result<String, RecognitionError> {
        Err(RecognitionError::ServiceUnavailable(
            "speech input is disabled".into(),
        ))
    }
}

/// Speech synthesizer backed by an external voice program.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    command: CommandLine,
}

impl CommandSynthesizer {
    /// Returns `None` for an empty command line.
    #[must_use]
    pub fn new(command: &str) -> Option<Self> {
        CommandLine::parse(command).map(|command| Self { command })
    }

    /// `say` on macOS, `espeak` elsewhere.
    #[must_use]
    pub fn platform_default() -> Self {
        Self {
            command: CommandLine {
                program: default_tts_command().to_string(),
                args: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.command.program
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let status = self
            .command
            .command()
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SpeechError::Unavailable(self.command.program.clone()),
                _ => SpeechError::Failed(format!("{}: {e}", self.command.program)),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(SpeechError::Failed(format!(
                "{} exited with {status}",
                self.command.program
            )))
        }
    }
}

/// Synthesizer that speaks nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSynthesizer;

impl SpeechSynthesizer for SilentSynthesizer {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        tracing::debug!("Speech disabled, not speaking {} byte(s)", text.len());
        Ok(())
    }
}
