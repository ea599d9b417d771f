//! Symptom checklist view: one per language tab.

use std::collections::BTreeSet;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{Language, Selection, SymptomCatalog, MAX_REPORT_CHARS};
use crate::tui::styles::MedicalTheme;

use super::{Notice, UiText};

/// Which widget receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    FreeText,
}

/// Checklist state for one language tab.
pub struct ChecklistState {
    pub language: Language,
    /// Symptoms in catalog order, followed by the sentinel
    pub options: Vec<String>,
    pub checked: BTreeSet<usize>,
    pub cursor: usize,
    pub focus: Focus,
    pub free_text: String,
    pub notice: Option<Notice>,
}

impl ChecklistState {
    #[must_use]
    pub fn new(catalog: &SymptomCatalog, language: Language) -> Self {
        Self {
            language,
            options: catalog.options(language).into_iter().map(String::from).collect(),
            checked: BTreeSet::new(),
            cursor: 0,
            focus: Focus::List,
            free_text: String::new(),
            notice: None,
        }
    }

    fn sentinel_index(&self) -> usize {
        self.options.len().saturating_sub(1)
    }

    pub fn next(&mut self) {
        if !self.options.is_empty() {
            self.cursor = (self.cursor + 1) % self.options.len();
        }
    }

    pub fn prev(&mut self) {
        if self.cursor == 0 {
            self.cursor = self.options.len().saturating_sub(1);
        } else {
            self.cursor -= 1;
        }
    }

    /// Toggle the option under the cursor.
    pub fn toggle(&mut self) {
        if !self.checked.remove(&self.cursor) {
            self.checked.insert(self.cursor);
        }
        if !self.sentinel_selected() {
            self.focus = Focus::List;
        }
        self.notice = None;
    }

    #[must_use]
    pub fn sentinel_selected(&self) -> bool {
        !self.options.is_empty() && self.checked.contains(&self.sentinel_index())
    }

    /// Move focus to the free-text box. Returns `false` while the sentinel
    /// is not selected.
    pub fn focus_free_text(&mut self) -> bool {
        if self.sentinel_selected() {
            self.focus = Focus::FreeText;
            true
        } else {
            false
        }
    }

    pub fn input_char(&mut self, c: char) {
        if self.focus == Focus::FreeText && self.free_text.chars().count() < MAX_REPORT_CHARS {
            self.free_text.push(c);
            self.notice = None;
        }
    }

    pub fn delete_char(&mut self) {
        if self.focus == Focus::FreeText {
            self.free_text.pop();
        }
    }

    /// Wipe the report text after it has been handed to the worker.
    pub fn clear_free_text(&mut self) {
        self.free_text.zeroize();
        self.focus = Focus::List;
    }

    /// Current choices as a selection, sentinel included.
    #[must_use]
    pub fn selection(&self) -> Selection {
        let choices = self
            .checked
            .iter()
            .filter_map(|&i| self.options.get(i))
            .map(String::as_str);
        Selection::from_choices(choices, self.language)
    }

    /// Start over: nothing checked, no text, cursor on top.
    pub fn reset(&mut self) {
        self.checked.clear();
        self.cursor = 0;
        self.clear_free_text();
        self.notice = None;
    }
}

/// Render the checklist and the free-text box.
pub fn render_checklist(f: &mut Frame, area: Rect, state: &ChecklistState) {
    let text = UiText::for_language(state.language);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Checklist
            Constraint::Length(6), // Free text
            Constraint::Length(1), // Notice
            Constraint::Length(2), // Key hints
        ])
        .split(area);

    render_options(f, chunks[0], state, text);
    render_free_text(f, chunks[1], state, text);

    if let Some(notice) = &state.notice {
        f.render_widget(Paragraph::new(notice.line()), chunks[2]);
    }

    let hints: Vec<(&str, &str)> = match state.focus {
        Focus::List => vec![
            ("Space", text.hint_toggle),
            ("Enter", text.hint_results),
            ("T", text.hint_describe),
            ("←/→", text.hint_language),
            ("?", text.hint_about),
            ("Q", text.hint_quit),
        ],
        Focus::FreeText => vec![
            ("Ctrl+S", text.hint_send),
            ("Esc", text.hint_back),
        ],
    };
    super::render_key_hints(f, chunks[3], &hints);
}

fn render_options(f: &mut Frame, area: Rect, state: &ChecklistState, text: &UiText) {
    let items: Vec<ListItem> = state
        .options
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let checked = state.checked.contains(&i);
            let mark = if checked { "[x] " } else { "[ ] " };
            ListItem::new(Line::from(vec![
                Span::styled(mark, MedicalTheme::checkbox(checked)),
                Span::styled(name.as_str(), MedicalTheme::text()),
            ]))
        })
        .collect();

    let border = if state.focus == Focus::List {
        MedicalTheme::border_focused()
    } else {
        MedicalTheme::border()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(format!(" {} ", text.prompt), MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(border),
        )
        .highlight_style(MedicalTheme::selected());

    let mut list_state = ListState::default();
    list_state.select(Some(state.cursor));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_free_text(f: &mut Frame, area: Rect, state: &ChecklistState, text: &UiText) {
    let (body, border) = if !state.sentinel_selected() {
        (
            vec![Line::from(Span::styled(text.free_text_locked, MedicalTheme::text_muted()))],
            MedicalTheme::border(),
        )
    } else if state.free_text.is_empty() && state.focus == Focus::List {
        (
            vec![Line::from(Span::styled(text.free_text_placeholder, MedicalTheme::text_muted()))],
            focus_border(state.focus),
        )
    } else {
        let mut lines: Vec<Line> = state
            .free_text
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), MedicalTheme::text())))
            .collect();
        if state.focus == Focus::FreeText {
            if let Some(last) = lines.last_mut() {
                last.push_span(Span::styled("▏", MedicalTheme::subtitle()));
            }
        }
        (lines, focus_border(state.focus))
    };

    let p = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" {} ", text.free_text_title),
                    MedicalTheme::text_secondary(),
                ))
                .borders(Borders::ALL)
                .border_style(border),
        );
    f.render_widget(p, area);
}

fn focus_border(focus: Focus) -> ratatui::style::Style {
    if focus == Focus::FreeText {
        MedicalTheme::border_focused()
    } else {
        MedicalTheme::border()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelBundle;

    fn state(language: Language) -> ChecklistState {
        let bundle = ModelBundle::builtin("malaria-v1").expect("v1");
        ChecklistState::new(bundle.catalog(), language)
    }

    #[test]
    fn test_options_end_with_sentinel() {
        let s = state(Language::Swahili);
        assert_eq!(s.options.len(), 12);
        assert_eq!(s.options.last().map(String::as_str), Some("Mengineyo"));
    }

    #[test]
    fn test_free_text_requires_sentinel() {
        let mut s = state(Language::English);
        assert!(!s.focus_free_text());
        s.input_char('x');
        assert!(s.free_text.is_empty());

        s.cursor = s.options.len() - 1;
        s.toggle();
        assert!(s.focus_free_text());
        s.input_char('r');
        s.input_char('a');
        assert_eq!(s.free_text, "ra");

        // Unselecting the sentinel returns focus to the list
        s.toggle();
        assert_eq!(s.focus, Focus::List);
    }

    #[test]
    fn test_selection_reflects_checks() {
        let mut s = state(Language::English);
        s.toggle(); // Fever
        s.cursor = 7;
        s.toggle(); // Body Pain
        s.cursor = s.options.len() - 1;
        s.toggle(); // Others

        let selection = s.selection();
        assert!(selection.wants_free_text());
        assert_eq!(selection.symptoms().collect::<Vec<_>>(), vec!["Body Pain", "Fever"]);
    }

    #[test]
    fn test_cursor_wraps() {
        let mut s = state(Language::English);
        s.prev();
        assert_eq!(s.cursor, 11);
        s.next();
        assert_eq!(s.cursor, 0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut s = state(Language::English);
        s.cursor = 11;
        s.toggle();
        s.focus_free_text();
        s.input_char('a');
        s.reset();
        assert!(s.checked.is_empty());
        assert!(s.free_text.is_empty());
        assert_eq!(s.focus, Focus::List);
    }
}
