//! Mailer port: Trait for delivering symptom reports.

/// A fully addressed plain-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub subject: String,
    pub body: String,
    pub recipient: String,
}

/// Errors that can occur while delivering mail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailError {
    #[error("Invalid mail address '{0}'")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Message(String),

    #[error("Mail relay error: {0}")]
    Transport(String),

    #[error("Mail credential unavailable: {0}")]
    Credential(String),
}

/// Trait for sending mail through a relay.
///
/// Implementations make exactly one delivery attempt per call.
pub trait Mailer: Send + Sync {
    /// # Errors
    /// Returns `MailError` if the message could not be handed to the relay.
    fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}
