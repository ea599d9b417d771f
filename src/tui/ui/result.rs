//! Result view: verdict, score and the malaria summary.

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::application::{ScreeningOutcome, SummaryOutcome};
use crate::domain::{Language, SymptomCatalog};
use crate::tui::styles::MedicalTheme;

use super::UiText;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Result screen state
#[derive(Debug, Clone)]
pub enum ResultState {
    /// Nothing evaluated yet
    Idle,
    /// Worker running
    Working { language: Language, started: Instant },
    Complete(Box<ScreeningOutcome>),
    Error { language: Language, message: String },
}

impl Default for ResultState {
    fn default() -> Self {
        Self::Idle
    }
}

impl ResultState {
    /// Language the result is displayed in.
    #[must_use]
    pub fn language(&self) -> Language {
        match self {
            Self::Idle => Language::English,
            Self::Working { language, .. } | Self::Error { language, .. } => *language,
            Self::Complete(outcome) => outcome.assessment.language,
        }
    }

    #[must_use]
    pub fn is_working(&self) -> bool {
        matches!(self, Self::Working { .. })
    }
}

/// Render the result screen
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState, catalog: &SymptomCatalog) {
    let text = UiText::for_language(state.language());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(2), // Key hints
        ])
        .split(area);

    match state {
        ResultState::Idle => {}
        ResultState::Working { started, .. } => render_working(f, chunks[0], text, *started),
        ResultState::Complete(outcome) => render_outcome(f, chunks[0], outcome, catalog, text),
        ResultState::Error { message, .. } => render_error(f, chunks[0], message),
    }

    if !state.is_working() {
        super::render_key_hints(
            f,
            chunks[1],
            &[
                ("Esc", text.hint_back),
                ("N", text.hint_new),
                ("Q", text.hint_quit),
            ],
        );
    }
}

fn render_working(f: &mut Frame, area: Rect, text: &UiText, started: Instant) {
    let frame = (started.elapsed().as_millis() / 120) as usize % SPINNER.len();
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(SPINNER[frame], MedicalTheme::subtitle()),
            Span::styled(format!(" {}", text.evaluating), MedicalTheme::text_secondary()),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_outcome(
    f: &mut Frame,
    area: Rect,
    outcome: &ScreeningOutcome,
    catalog: &SymptomCatalog,
    text: &UiText,
) {
    let assessment = &outcome.assessment;
    let verdict_style = MedicalTheme::verdict(assessment.verdict);

    let block = Block::default()
        .title(Span::styled(format!(" {} ", text.results_title), MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Headline
            Constraint::Length(3), // Score
            Constraint::Length(4), // Selected symptoms
            Constraint::Min(0),    // Summary
        ])
        .margin(1)
        .split(inner);

    let headline = Paragraph::new(Line::from(Span::styled(
        assessment.verdict.headline(assessment.language),
        verdict_style,
    )))
    .alignment(Alignment::Center);
    f.render_widget(headline, chunks[0]);

    let score = assessment.score.value();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    format!(
                        " {} │ {} {:.2} ",
                        text.score_label, text.threshold_label, assessment.threshold
                    ),
                    MedicalTheme::text_secondary(),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(verdict_style)
        .ratio(score)
        .label(format!("{:.1}%", score * 100.0));
    f.render_widget(gauge, chunks[1]);

    let names: Vec<&str> = assessment
        .features
        .selected_positions()
        .into_iter()
        .filter_map(|i| catalog.display_name(i, assessment.language))
        .collect();
    let selected = if names.is_empty() {
        Span::styled(text.nothing_selected, MedicalTheme::text_muted())
    } else {
        Span::styled(names.join(", "), MedicalTheme::text())
    };
    let selected = Paragraph::new(vec![
        Line::from(Span::styled(text.selected_title, MedicalTheme::text_secondary())),
        Line::from(selected),
    ])
    .wrap(Wrap { trim: true });
    f.render_widget(selected, chunks[2]);

    let summary = match &outcome.summary {
        None => return,
        Some(SummaryOutcome::Text(body)) => Paragraph::new(vec![
            Line::from(Span::styled(text.summary_title, MedicalTheme::subtitle())),
            Line::from(Span::styled(body.as_str(), MedicalTheme::text())),
        ]),
        Some(SummaryOutcome::Unavailable(reason)) => Paragraph::new(vec![
            Line::from(Span::styled(text.summary_unavailable, MedicalTheme::warning())),
            Line::from(Span::styled(reason.as_str(), MedicalTheme::text_muted())),
        ]),
    };
    f.render_widget(summary.wrap(Wrap { trim: true }), chunks[3]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}
