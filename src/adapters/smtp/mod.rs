//! SMTP adapter: Implementation of Mailer using lettre.
//!
//! Opens an implicit-TLS session (SMTPS, port 465 by default) and
//! authenticates with the sender account. The password is resolved from an
//! out-of-band secret source at construction time; it is never read from
//! the configuration file.

use std::time::Duration;

use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::adapters::secrets::{self, SecretSource};
use crate::ports::{MailError, Mailer, OutgoingMail};

/// Connection settings for the relay.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub sender: String,
    pub timeout_secs: u64,
}

/// Authenticated SMTPS mailer.
pub struct SmtpMailer {
    transport: SmtpTransport,
    sender: Mailbox,
    host: String,
}

impl SmtpMailer {
    /// Build a mailer, resolving the password from `secret`.
    ///
    /// # Errors
    /// Returns `MailError::Credential` when the secret is unavailable,
    /// `MailError::Address` for an invalid sender, or `MailError::Transport`
    /// when the relay host cannot be configured.
    pub fn from_secret(settings: &SmtpSettings, secret: &SecretSource) -> Result<Self, MailError> {
        let password =
            secrets::read_secret(secret).map_err(|e| MailError::Credential(e.to_string()))?;
        Self::new(settings, password.as_str())
    }

    /// Build a mailer with an explicit password.
    ///
    /// # Errors
    /// See [`SmtpMailer::from_secret`].
    pub fn new(settings: &SmtpSettings, password: &str) -> Result<Self, MailError> {
        let sender: Mailbox = settings
            .sender
            .parse()
            .map_err(|_| MailError::Address(settings.sender.clone()))?;

        // The relay authenticates the bare address, not the display form.
        let credentials = Credentials::new(sender.email.to_string(), password.to_string());

        let transport = SmtpTransport::relay(&settings.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(settings.port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(settings.timeout_secs)))
            .build();

        tracing::info!("SMTP relay configured ({}:{})", settings.host, settings.port);

        Ok(Self {
            transport,
            sender,
            host: settings.host.clone(),
        })
    }
}

/// Assemble a plain-text message.
///
/// # Errors
/// Returns `MailError::Address` for an unparsable recipient and
/// `MailError::Message` if the message cannot be built.
pub fn build_message(sender: &Mailbox, mail: &OutgoingMail) -> Result<Message, MailError> {
    let recipient: Mailbox = mail
        .recipient
        .parse()
        .map_err(|_| MailError::Address(mail.recipient.clone()))?;

    Message::builder()
        .from(sender.clone())
        .to(recipient)
        .subject(mail.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body.clone())
        .map_err(|e| MailError::Message(e.to_string()))
}

impl Mailer for SmtpMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = build_message(&self.sender, mail)?;

        // Single attempt; the caller reports failure to the user.
        self.transport.send(&message).map_err(|e| {
            tracing::error!("Mail delivery via {} failed: {}", self.host, e);
            MailError::Transport(e.to_string())
        })?;

        tracing::info!("Report delivered via {}", self.host);
        Ok(())
    }
}
