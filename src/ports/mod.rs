//! Ports layer: Trait definitions for external collaborators.
//!
//! These traits are the boundaries between the screening logic and the
//! model runtime, the encyclopedia and the mail relay.

mod classifier;
mod knowledge;
mod mailer;

pub use classifier::{Classifier, ClassifierError};
pub use knowledge::{KnowledgeError, KnowledgeSource};
pub use mailer::{MailError, Mailer, OutgoingMail};
