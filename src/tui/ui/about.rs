//! About view: what the app does and how it is configured.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::Language;
use crate::tui::styles::MedicalTheme;

use super::UiText;

/// Runtime facts shown next to the description.
#[derive(Debug, Clone)]
pub struct AboutInfo {
    pub bundle: String,
    pub symptoms: usize,
    pub threshold: f64,
    pub model_path: String,
    pub reporting_enabled: bool,
}

fn description(language: Language) -> [&'static str; 6] {
    match language {
        Language::English => [
            "DiagAI is a rapid screening aid based on the symptoms and signs you select.",
            "A neural network model estimates the likelihood of malaria from your selection.",
            "1. Select the symptoms and signs you are experiencing.",
            "2. Press Enter to check the disease status for malaria.",
            "3. The app indicates whether you are probably positive or negative for malaria.",
            "This is a rapid diagnostic tool and not a substitute for professional medical advice.",
        ],
        Language::Swahili => [
            "DiagAI ni kifaa cha uchunguzi wa haraka kinachotumia dalili na ishara unazochagua.",
            "Modeli ya mtandao wa neva inakadiria uwezekano wa malaria kutokana na uchaguzi wako.",
            "1. Chagua dalili na ishara unazopata.",
            "2. Bonyeza Enter kuangalia hali ya malaria.",
            "3. Programu itaonyesha kama huenda una malaria au huna.",
            "Hiki ni kifaa cha uchunguzi wa haraka, si mbadala wa ushauri wa daktari.",
        ],
    }
}

pub fn render_about(f: &mut Frame, area: Rect, language: Language, info: &AboutInfo) {
    let text = UiText::for_language(language);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(9),    // Description
            Constraint::Length(7), // Status
            Constraint::Length(2), // Key hints
        ])
        .split(area);

    let lines: Vec<Line> = description(language)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, MedicalTheme::text())))
        .collect();
    let desc = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(Span::styled(format!(" {} ", text.about_title), MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );
    f.render_widget(desc, chunks[0]);

    let status = Paragraph::new(status_lines(info, text)).block(
        Block::default()
            .title(Span::styled(format!(" {} ", text.status_title), MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(status, chunks[1]);

    super::render_key_hints(f, chunks[2], &[("Esc", text.hint_back), ("Q", text.hint_quit)]);
}

fn status_lines(info: &AboutInfo, text: &UiText) -> Vec<Line<'static>> {
    let reporting = if info.reporting_enabled {
        Span::styled(text.reports_enabled, MedicalTheme::success())
    } else {
        Span::styled(text.reports_disabled, MedicalTheme::warning())
    };
    vec![
        status_line(text.label_bundle, info.bundle.clone()),
        status_line(text.label_symptoms, info.symptoms.to_string()),
        status_line(text.threshold_label, format!("{:.2}", info.threshold)),
        status_line(text.label_model_file, info.model_path.clone()),
        Line::from(vec![
            Span::styled(format!("{}: ", text.label_reports), MedicalTheme::text_secondary()),
            reporting,
        ]),
    ]
}

fn status_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), MedicalTheme::text_secondary()),
        Span::styled(value, MedicalTheme::text()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> AboutInfo {
        AboutInfo {
            bundle: "malaria-v1".into(),
            symptoms: 11,
            threshold: 0.33,
            model_path: "models/malaria_v1.json".into(),
            reporting_enabled: false,
        }
    }

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_status_labels_follow_language() {
        let sw = plain(&status_lines(&info(), UiText::for_language(Language::Swahili)));
        assert_eq!(sw[0], "Kifurushi cha modeli: malaria-v1");
        assert_eq!(sw[2], "Kizingiti: 0.33");
        assert_eq!(sw[4], "Ripoti za dalili: zimezimwa");

        let en = plain(&status_lines(&info(), UiText::for_language(Language::English)));
        assert_eq!(en[0], "Model bundle: malaria-v1");
        assert_eq!(en[4], "Symptom reports: disabled");
    }
}
