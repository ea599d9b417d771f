//! Free-text symptom reports sent when the sentinel entry is chosen.

use serde::{Deserialize, Serialize};

use super::catalog::Language;

/// Subject line of every report mail.
pub const REPORT_SUBJECT: &str = "Additional Symptoms Submitted via App";

/// Upper bound on report length, in characters.
pub const MAX_REPORT_CHARS: usize = 4000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("Please describe additional symptoms before sending")]
    Empty,

    #[error("Report is too long ({actual} characters, limit {max})")]
    TooLong { max: usize, actual: usize },
}

/// A validated, non-empty free-text report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomReport {
    text: String,
    language: Language,
}

impl SymptomReport {
    /// Trim and validate user text.
    ///
    /// # Errors
    /// `ReportError::Empty` for blank input, `ReportError::TooLong` past
    /// [`MAX_REPORT_CHARS`].
    pub fn new(text: &str, language: Language) -> Result<Self, ReportError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ReportError::Empty);
        }
        let chars = text.chars().count();
        if chars > MAX_REPORT_CHARS {
            return Err(ReportError::TooLong {
                max: MAX_REPORT_CHARS,
                actual: chars,
            });
        }

        Ok(Self {
            text: text.to_string(),
            language,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn subject(&self) -> &'static str {
        REPORT_SUBJECT
    }

    /// Mail body wrapping the user's text.
    #[must_use]
    pub fn body(&self) -> String {
        format!(
            "The user has submitted the following additional symptoms:\n\n{}",
            self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_reports_rejected() {
        assert_eq!(SymptomReport::new("", Language::English), Err(ReportError::Empty));
        assert_eq!(
            SymptomReport::new("  \n\t ", Language::Swahili),
            Err(ReportError::Empty)
        );
    }

    #[test]
    fn test_body_contains_text() {
        let report = SymptomReport::new("  rash on both arms \n", Language::English).expect("valid");
        assert_eq!(report.text(), "rash on both arms");
        assert!(report.subject().contains("Additional Symptoms"));
        assert_eq!(
            report.body(),
            "The user has submitted the following additional symptoms:\n\nrash on both arms"
        );
        assert_eq!(report.language(), Language::English);
    }

    #[test]
    fn test_length_limit() {
        let long = "a".repeat(MAX_REPORT_CHARS + 1);
        assert!(matches!(
            SymptomReport::new(&long, Language::English),
            Err(ReportError::TooLong { .. })
        ));
        let exact = "b".repeat(MAX_REPORT_CHARS);
        assert!(SymptomReport::new(&exact, Language::English).is_ok());
    }
}
