//! Report service: deliver free-text symptom reports to the fixed inbox.

use std::sync::Arc;

use crate::domain::{Language, SymptomReport};
use crate::ports::{Mailer, OutgoingMail};
use crate::DiagaiError;

/// Sends validated reports through a [`Mailer`].
pub struct ReportService<M: Mailer> {
    mailer: Arc<M>,
    recipient: String,
}

impl<M: Mailer> ReportService<M> {
    pub fn new(mailer: Arc<M>, recipient: impl Into<String>) -> Self {
        Self {
            mailer,
            recipient: recipient.into(),
        }
    }

    /// Validate and send one report. Exactly one delivery attempt is made;
    /// blank text makes none.
    ///
    /// The report text and addresses are never logged.
    ///
    /// # Errors
    /// Returns `DiagaiError::Report` for blank or oversized text and
    /// `DiagaiError::MailDelivery` if the relay rejects the message.
    pub fn submit(&self, text: &str, language: Language) -> Result<(), DiagaiError> {
        let report = SymptomReport::new(text, language)?;
        let mail = OutgoingMail {
            subject: report.subject().to_string(),
            body: report.body(),
            recipient: self.recipient.clone(),
        };

        match self.mailer.send(&mail) {
            Ok(()) => {
                tracing::info!(
                    language = language.code(),
                    chars = report.text().chars().count(),
                    "Symptom report delivered"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(language = language.code(), "Symptom report not delivered: {}", e);
                Err(e.into())
            }
        }
    }
}
