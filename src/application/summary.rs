//! Summary service: short encyclopedia text for a positive verdict.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::domain::Language;
use crate::ports::KnowledgeSource;
use crate::DiagaiError;

/// Sentence end: terminal punctuation followed by whitespace.
static SENTENCE_END: OnceLock<Regex> = OnceLock::new();

fn sentence_end() -> &'static Regex {
    SENTENCE_END.get_or_init(|| Regex::new(r"[.!?]\s+").expect("Valid regex"))
}

/// Keep the first `max_sentences` sentences of `text`, joined by single spaces.
#[must_use]
pub fn first_sentences(text: &str, max_sentences: usize) -> String {
    let mut sentences = Vec::with_capacity(max_sentences);
    let mut start = 0;

    for m in sentence_end().find_iter(text) {
        if sentences.len() == max_sentences {
            break;
        }
        // Keep the punctuation, drop the whitespace.
        let sentence = text[start..m.start() + 1].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = m.end();
    }

    if sentences.len() < max_sentences {
        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail);
        }
    }

    sentences.join(" ")
}

/// Informational text for a topic with no page.
#[must_use]
pub fn not_found_message(topic: &str, language: Language) -> String {
    match language {
        Language::English => format!("No information found for {topic}."),
        Language::Swahili => format!("Hakuna taarifa iliyopatikana kuhusu {topic}."),
    }
}

/// Fetches and trims topic summaries from a knowledge source.
pub struct SummaryService<K: KnowledgeSource> {
    source: Arc<K>,
    max_sentences: usize,
}

impl<K: KnowledgeSource> SummaryService<K> {
    pub fn new(source: Arc<K>, max_sentences: usize) -> Self {
        Self {
            source,
            max_sentences,
        }
    }

    /// Summary of `topic` using the configured sentence limit.
    ///
    /// # Errors
    /// See [`SummaryService::fetch_sentences`].
    pub fn fetch(&self, topic: &str, language: Language) -> Result<String, DiagaiError> {
        self.fetch_sentences(topic, language, self.max_sentences)
    }

    /// First `max_sentences` sentences of the topic summary, or a
    /// not-found message naming the topic.
    ///
    /// # Errors
    /// Returns `DiagaiError::KnowledgeLookup` only for transport or protocol
    /// failures; a missing page is a normal result.
    pub fn fetch_sentences(
        &self,
        topic: &str,
        language: Language,
        max_sentences: usize,
    ) -> Result<String, DiagaiError> {
        match self.source.summary(topic, language)? {
            Some(text) => Ok(first_sentences(&text, max_sentences)),
            None => Ok(not_found_message(topic, language)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::KnowledgeError;

    struct StaticSource;

    impl KnowledgeSource for StaticSource {
        fn summary(&self, topic: &str, _language: Language) -> Result<Option<String>, KnowledgeError> {
            match topic {
                "malaria" => Ok(Some(
                    "Malaria is a mosquito-borne disease. It causes fever!  Is it treatable? Yes. Sixth.".into(),
                )),
                "offline" => Err(KnowledgeError::Transport("connection refused".into())),
                _ => Ok(None),
            }
        }
    }

    fn service() -> SummaryService<StaticSource> {
        SummaryService::new(Arc::new(StaticSource), 2)
    }

    #[test]
    fn test_first_sentences() {
        let text = "One. Two! Three? Four.";
        assert_eq!(first_sentences(text, 2), "One. Two!");
        assert_eq!(first_sentences(text, 10), "One. Two! Three? Four.");
        assert_eq!(first_sentences(text, 0), "");
    }

    #[test]
    fn test_decimal_points_are_not_boundaries() {
        let text = "Incidence fell by 2.5 percent. Mortality fell too.";
        assert_eq!(first_sentences(text, 1), "Incidence fell by 2.5 percent.");
    }

    #[test]
    fn test_newlines_count_as_whitespace() {
        assert_eq!(first_sentences("First.\nSecond.\n\nThird.", 2), "First. Second.");
    }

    #[test]
    fn test_fetch_trims_to_limit() {
        let text = service().fetch("malaria", Language::English).expect("found");
        assert_eq!(text, "Malaria is a mosquito-borne disease. It causes fever!");
    }

    #[test]
    fn test_missing_topic_is_not_an_error() {
        let en = service().fetch("Xyzzy fever", Language::English).expect("miss");
        assert!(en.contains("Xyzzy fever"));
        assert!(en.starts_with("No information found"));

        let sw = service().fetch("Xyzzy fever", Language::Swahili).expect("miss");
        assert!(sw.contains("Xyzzy fever"));
    }

    #[test]
    fn test_transport_failure_is_reported() {
        let err = service().fetch("offline", Language::English).expect_err("offline");
        assert!(matches!(err, DiagaiError::KnowledgeLookup(_)));
    }
}
