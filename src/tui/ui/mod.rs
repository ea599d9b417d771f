//! UI module: View components for the TUI.

pub mod about;
pub mod checklist;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::domain::Language;
use crate::tui::styles::MedicalTheme;

/// Application title shown above the tabs.
pub const APP_TITLE: &str = "DiagAI/1.0 for Rapid Malaria Diagnosis";

/// Localized interface strings for one tab.
pub struct UiText {
    pub prompt: &'static str,
    pub free_text_title: &'static str,
    pub free_text_placeholder: &'static str,
    pub free_text_locked: &'static str,
    pub results_title: &'static str,
    pub summary_title: &'static str,
    pub summary_unavailable: &'static str,
    pub selected_title: &'static str,
    pub nothing_selected: &'static str,
    pub score_label: &'static str,
    pub threshold_label: &'static str,
    pub evaluating: &'static str,
    pub sending: &'static str,
    pub busy: &'static str,
    pub report_sent: &'static str,
    pub report_failed: &'static str,
    pub report_empty: &'static str,
    pub reporting_disabled: &'static str,
    pub hint_toggle: &'static str,
    pub hint_results: &'static str,
    pub hint_describe: &'static str,
    pub hint_send: &'static str,
    pub hint_language: &'static str,
    pub hint_back: &'static str,
    pub hint_new: &'static str,
    pub hint_about: &'static str,
    pub hint_quit: &'static str,
    pub about_title: &'static str,
    pub status_title: &'static str,
    pub label_bundle: &'static str,
    pub label_symptoms: &'static str,
    pub label_model_file: &'static str,
    pub label_reports: &'static str,
    pub reports_enabled: &'static str,
    pub reports_disabled: &'static str,
}

pub const ENGLISH: UiText = UiText {
    prompt: "Select the symptoms and signs you have:",
    free_text_title: "Please list any other symptoms you are experiencing:",
    free_text_placeholder: "Type additional symptoms here...",
    free_text_locked: "Select \"Others\" to describe additional symptoms.",
    results_title: "Malaria Results",
    summary_title: "Malaria Summary",
    summary_unavailable: "Summary unavailable",
    selected_title: "Selected symptoms",
    nothing_selected: "No symptoms selected",
    score_label: "Score",
    threshold_label: "Threshold",
    evaluating: "Checking symptoms...",
    sending: "Sending your symptoms...",
    busy: "Please wait for the current request to finish.",
    report_sent: "Your symptoms have been sent successfully! Thank you.",
    report_failed: "There was an issue sending your symptoms. Please try again.",
    report_empty: "Please describe additional symptoms before sending.",
    reporting_disabled: "Symptom reports are not configured on this installation.",
    hint_toggle: "Select",
    hint_results: "Results",
    hint_describe: "Describe",
    hint_send: "Submit",
    hint_language: "Language",
    hint_back: "Back",
    hint_new: "New checklist",
    hint_about: "About",
    hint_quit: "Quit",
    about_title: "About This App",
    status_title: "Status",
    label_bundle: "Model bundle",
    label_symptoms: "Symptoms",
    label_model_file: "Model file",
    label_reports: "Symptom reports",
    reports_enabled: "enabled",
    reports_disabled: "disabled",
};

pub const SWAHILI: UiText = UiText {
    prompt: "Chagua dalili na ishara ulizonazo:",
    free_text_title: "Tafadhali orodhesha dalili nyingine unazopata:",
    free_text_placeholder: "Andika dalili za ziada hapa...",
    free_text_locked: "Chagua \"Mengineyo\" kueleza dalili za ziada.",
    results_title: "Matokeo ya Malaria",
    summary_title: "Muhtasari wa Malaria",
    summary_unavailable: "Muhtasari haupatikani",
    selected_title: "Dalili zilizochaguliwa",
    nothing_selected: "Hakuna dalili iliyochaguliwa",
    score_label: "Alama",
    threshold_label: "Kizingiti",
    evaluating: "Inachambua dalili...",
    sending: "Inatuma dalili zako...",
    busy: "Tafadhali subiri ombi la sasa likamilike.",
    report_sent: "Dalili zako zimetumwa. Asante!",
    report_failed: "Kulikuwa na tatizo la kutuma dalili zako. Tafadhali jaribu tena.",
    report_empty: "Tafadhali eleza dalili za ziada kabla ya kutuma.",
    reporting_disabled: "Utumaji wa ripoti haujawekwa kwenye usakinishaji huu.",
    hint_toggle: "Chagua",
    hint_results: "Matokeo",
    hint_describe: "Eleza",
    hint_send: "Tuma",
    hint_language: "Lugha",
    hint_back: "Rudi",
    hint_new: "Orodha mpya",
    hint_about: "Kuhusu",
    hint_quit: "Funga",
    about_title: "Kuhusu Programu Hii",
    status_title: "Hali",
    label_bundle: "Kifurushi cha modeli",
    label_symptoms: "Dalili",
    label_model_file: "Faili la modeli",
    label_reports: "Ripoti za dalili",
    reports_enabled: "zimewezeshwa",
    reports_disabled: "zimezimwa",
};

impl UiText {
    #[must_use]
    pub fn for_language(language: Language) -> &'static UiText {
        match language {
            Language::English => &ENGLISH,
            Language::Swahili => &SWAHILI,
        }
    }
}

/// Severity of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

/// One-line status message shown under the checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub(crate) fn line(&self) -> Line<'_> {
        let style = match self.kind {
            NoticeKind::Info => MedicalTheme::info(),
            NoticeKind::Success => MedicalTheme::success(),
            NoticeKind::Warning => MedicalTheme::warning(),
            NoticeKind::Error => MedicalTheme::danger(),
        };
        Line::from(Span::styled(self.text.as_str(), style))
    }
}

/// Title row and language tabs.
pub fn render_tabs(f: &mut Frame, area: Rect, active: Language) {
    let titles: Vec<Line> = Language::ALL
        .iter()
        .map(|l| Line::from(format!(" {} ", l.label())))
        .collect();
    let selected = Language::ALL.iter().position(|l| *l == active).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(MedicalTheme::text_secondary())
        .highlight_style(MedicalTheme::header())
        .divider(Span::styled("│", MedicalTheme::text_muted()))
        .block(
            Block::default()
                .title(Span::styled(format!(" {APP_TITLE} "), MedicalTheme::title()))
                .borders(Borders::BOTTOM)
                .border_style(MedicalTheme::border()),
        );

    f.render_widget(tabs, area);
}

/// Key hint footer from `(key, description)` pairs.
pub fn render_key_hints(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, desc) in hints {
        spans.push(Span::styled(format!("[{key}] "), MedicalTheme::key_hint()));
        spans.push(Span::styled(format!("{desc}  "), MedicalTheme::key_desc()));
    }

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: This is a rapid screening aid and not a substitute for professional medical advice.",
            MedicalTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "TAHADHARI: Hiki ni kifaa cha uchunguzi wa haraka, si mbadala wa ushauri wa daktari.",
            MedicalTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
