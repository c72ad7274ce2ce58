//! Dashboard view: Main overview screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{key_hint, render_activity, render_header, Activity};
use crate::domain::PredictionRecord;
use crate::tui::styles::{MedicalTheme, LOGO_SMALL};

/// Entries shown in the history panel.
pub const HISTORY_VISIBLE: usize = 10;

/// Dashboard state for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub symptom_count: usize,
    pub disease_count: usize,
    pub voice_enabled: bool,
    pub wake_phrase: String,
    pub notice: Option<String>,
}

/// Render the main dashboard view.
pub fn render_dashboard(
    f: &mut Frame,
    area: Rect,
    state: &DashboardState,
    history: &[PredictionRecord],
    activity: Activity,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status
        ])
        .split(area);

    render_header(f, chunks[0], LOGO_SMALL, "Voice-Activated Symptom Checker");

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_status_panels(f, columns[0], state);
    render_history(f, columns[1], history);
    render_activity(f, chunks[2], activity);
}

fn render_status_panels(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Status
            Constraint::Min(0),    // Actions
        ])
        .margin(1)
        .split(area);

    let mut status = vec![
        Line::from(vec![
            Span::styled("  OK ", MedicalTheme::success()),
            Span::styled("Model and reference data loaded", MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("  Symptoms: ", MedicalTheme::text_secondary()),
            Span::styled(state.symptom_count.to_string(), MedicalTheme::text()),
            Span::styled("  Diseases: ", MedicalTheme::text_secondary()),
            Span::styled(state.disease_count.to_string(), MedicalTheme::text()),
        ]),
    ];
    status.push(if state.voice_enabled {
        Line::from(vec![
            Span::styled("  Voice: ", MedicalTheme::text_secondary()),
            Span::styled(format!("say \"{}\"", state.wake_phrase), MedicalTheme::info()),
        ])
    } else {
        Line::from(vec![
            Span::styled("  Voice: ", MedicalTheme::text_secondary()),
            Span::styled("off", MedicalTheme::text_muted()),
        ])
    });
    if let Some(notice) = &state.notice {
        status.push(Line::from(Span::styled(
            format!("  {notice}"),
            MedicalTheme::warning(),
        )));
    }

    let status_block = Block::default()
        .title(Span::styled(" System Status ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    f.render_widget(
        Paragraph::new(status)
            .block(status_block)
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let mut actions = vec![key_hint("N", "Check Symptoms")];
    if state.voice_enabled {
        actions.push(key_hint("W", "Listen for Wake Phrase"));
    }
    actions.push(key_hint("Q", "Quit"));

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    f.render_widget(Paragraph::new(actions).block(actions_block), chunks[1]);
}

fn render_history(f: &mut Frame, area: Rect, history: &[PredictionRecord]) {
    let block = Block::default()
        .title(Span::styled(" This Session ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    if history.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No checks yet. Press [N] to start.",
            MedicalTheme::text_muted(),
        )))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let lines: Vec<Line> = history
        .iter()
        .rev()
        .take(HISTORY_VISIBLE)
        .map(|record| {
            let source = if record.voice_input { "voice" } else { "typed" };
            Line::from(vec![
                Span::styled(
                    record.created_at.format("%H:%M:%S ").to_string(),
                    MedicalTheme::text_muted(),
                ),
                Span::styled(record.prediction.disease.clone(), MedicalTheme::text()),
                Span::styled(
                    format!(
                        "  ({} symptom(s), {source})",
                        record.recognized.len()
                    ),
                    MedicalTheme::text_secondary(),
                ),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}
