//! Knowledge source port: Trait for encyclopedia lookups.

use crate::domain::Language;

/// Errors that can occur while contacting a knowledge source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KnowledgeError {
    #[error("Knowledge source unreachable: {0}")]
    Transport(String),

    #[error("Knowledge source returned HTTP {status} for '{topic}'")]
    Status { status: u16, topic: String },

    #[error("Unexpected knowledge source response: {0}")]
    Parse(String),

    #[error("Invalid knowledge source URL: {0}")]
    InvalidUrl(String),
}

/// Trait for summary lookups by topic and language.
pub trait KnowledgeSource: Send + Sync {
    /// Fetch the summary text of `topic` in `language`.
    ///
    /// # Returns
    /// `None` when no page exists for the topic. A miss is not an error.
    ///
    /// # Errors
    /// Returns `KnowledgeError` on transport or protocol failures.
    fn summary(&self, topic: &str, language: Language) -> Result<Option<String>, KnowledgeError>;
}
