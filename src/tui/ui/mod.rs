//! UI module: View components for the TUI.

pub mod dashboard;
pub mod report;
pub mod symptoms;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![Span::styled(
        "DISCLAIMER: Predictions come from a statistical model and are not a diagnosis. See a doctor.",
        MedicalTheme::text_muted(),
    )])];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// One-line header used by every screen.
pub(crate) fn render_header(f: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(title.to_string(), MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled(subtitle.to_string(), MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

/// `[K] description` hint line.
pub(crate) fn key_hint(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("[{key}] "), MedicalTheme::key_hint()),
        Span::styled(desc.to_string(), MedicalTheme::key_desc()),
    ])
}

/// What the background worker is doing, for status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    WaitingForWake,
    Listening,
    Predicting,
    Speaking,
    Stopping,
}

impl Activity {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::WaitingForWake => "Listening for the wake phrase...",
            Self::Listening => "Listening for symptoms...",
            Self::Predicting => "Predicting...",
            Self::Speaking => "Speaking...",
            Self::Stopping => "Stopping...",
        }
    }

    #[must_use]
    pub fn is_busy(self) -> bool {
        self != Self::Idle
    }
}

pub(crate) fn render_activity(f: &mut Frame, area: Rect, activity: Activity) {
    let style = if activity.is_busy() {
        MedicalTheme::info()
    } else {
        MedicalTheme::success()
    };
    let line = Line::from(vec![
        Span::styled(" Status: ", MedicalTheme::text_secondary()),
        Span::styled(activity.label(), style),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
