//! Symptom entry view.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{key_hint, render_activity, render_header, Activity};
use crate::tui::styles::MedicalTheme;

/// Typing this instead of symptoms captures them by voice.
pub const AUDIO_COMMAND: &str = "audio";

/// Symptom input state.
#[derive(Debug, Clone, Default)]
pub struct SymptomInputState {
    pub input: String,
    pub error_message: Option<String>,
    /// Last voice transcript, shown until the next submission
    pub heard: Option<String>,
}

impl SymptomInputState {
    pub fn input_char(&mut self, c: char) {
        self.input.push(c);
        self.error_message = None;
    }

    pub fn delete_char(&mut self) {
        self.input.pop();
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.error_message = None;
    }

    /// Whether the input asks for voice capture.
    #[must_use]
    pub fn wants_audio(&self) -> bool {
        self.input.trim().eq_ignore_ascii_case(AUDIO_COMMAND)
    }
}

pub fn render_symptom_input(
    f: &mut Frame,
    area: Rect,
    state: &SymptomInputState,
    activity: Activity,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Instructions
            Constraint::Length(3), // Input
            Constraint::Min(0),    // Feedback
            Constraint::Length(1), // Status
        ])
        .split(area);

    render_header(f, chunks[0], "Symptoms", "Type or speak what you feel");

    let instructions = Paragraph::new(vec![
        Line::from(Span::styled(
            "Enter your symptoms separated by commas, e.g. itching, skin rash",
            MedicalTheme::text_secondary(),
        )),
        Line::from(vec![
            Span::styled("or type ", MedicalTheme::text_secondary()),
            Span::styled(AUDIO_COMMAND, MedicalTheme::focused()),
            Span::styled(" to speak them.", MedicalTheme::text_secondary()),
        ]),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::NONE));
    f.render_widget(instructions, chunks[1]);

    let border = if activity.is_busy() {
        MedicalTheme::border()
    } else {
        MedicalTheme::border_focused()
    };
    let input = Paragraph::new(Line::from(vec![
        Span::styled(state.input.clone(), MedicalTheme::text()),
        Span::styled("▏", MedicalTheme::focused()),
    ]))
    .block(
        Block::default()
            .title(Span::styled(" Symptoms ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(border),
    );
    f.render_widget(input, chunks[2]);

    let mut feedback = Vec::new();
    if let Some(heard) = &state.heard {
        feedback.push(Line::from(vec![
            Span::styled("Heard: ", MedicalTheme::text_secondary()),
            Span::styled(heard.clone(), MedicalTheme::text()),
        ]));
    }
    if let Some(err) = &state.error_message {
        feedback.push(Line::from(Span::styled(err.clone(), MedicalTheme::danger())));
    }
    feedback.push(Line::from(""));
    feedback.push(key_hint("Enter", "Check"));
    feedback.push(key_hint("Esc", "Back"));
    f.render_widget(Paragraph::new(feedback).wrap(Wrap { trim: true }), chunks[3]);

    render_activity(f, chunks[4], activity);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_command_detection() {
        let mut state = SymptomInputState::default();
        for c in " Audio ".chars() {
            state.input_char(c);
        }
        assert!(state.wants_audio());
        state.delete_char();
        state.delete_char();
        assert!(!state.wants_audio());
    }

    #[test]
    fn test_typing_clears_error() {
        let mut state = SymptomInputState {
            error_message: Some("Sorry, I did not understand that".into()),
            ..Default::default()
        };
        state.input_char('i');
        assert!(state.error_message.is_none());
    }
}
