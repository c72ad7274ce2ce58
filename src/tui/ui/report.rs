//! Prediction report view.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{key_hint, render_activity, render_header, Activity};
use crate::domain::PredictionRecord;
use crate::tui::styles::MedicalTheme;

pub fn render_report(f: &mut Frame, area: Rect, record: &PredictionRecord, activity: Activity) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Disease banner
            Constraint::Min(0),    // Details
            Constraint::Length(3), // Footer
            Constraint::Length(1), // Status
        ])
        .split(area);

    render_header(f, chunks[0], "Disease Prediction", "Based on the symptoms you gave");

    let banner = Paragraph::new(Line::from(vec![
        Span::styled(" Predicted Disease: ", MedicalTheme::text_secondary()),
        Span::styled(
            format!(" {} ", record.prediction.disease.trim_end()),
            MedicalTheme::highlight(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );
    f.render_widget(banner, chunks[1]);

    let p = &record.prediction;
    let mut lines = vec![
        Line::from(Span::styled("Description", MedicalTheme::subtitle())),
        Line::from(Span::styled(p.description.clone(), MedicalTheme::detail(&p.description))),
        Line::from(""),
    ];
    for (title, values) in [
        ("Precautions", &p.precautions),
        ("Medications", &p.medications),
        ("Diets", &p.diet),
        ("Workout", &p.workout),
    ] {
        lines.push(Line::from(Span::styled(title, MedicalTheme::subtitle())));
        for value in values {
            lines.push(Line::from(vec![
                Span::styled("  • ", MedicalTheme::text_muted()),
                Span::styled(value.clone(), MedicalTheme::detail(value)),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("Recognized: ", MedicalTheme::text_secondary()),
        Span::styled(
            if record.recognized.is_empty() {
                "none".to_string()
            } else {
                record.recognized.join(", ")
            },
            MedicalTheme::text(),
        ),
    ]));
    if !record.unrecognized.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Ignored: ", MedicalTheme::text_secondary()),
            Span::styled(record.unrecognized.join(", "), MedicalTheme::warning()),
        ]));
    }

    let details = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(details, chunks[2]);

    let footer = Paragraph::new(vec![Line::from(
        [key_hint("N", "New Check"), key_hint("R", "Read Aloud"), key_hint("Esc", "Dashboard")]
            .into_iter()
            .flat_map(|l| {
                let mut spans = l.spans;
                spans.push(Span::raw("  "));
                spans
            })
            .collect::<Vec<_>>(),
    )])
    .block(Block::default().borders(Borders::TOP).border_style(MedicalTheme::border()));
    f.render_widget(footer, chunks[3]);

    render_activity(f, chunks[4], activity);
}
