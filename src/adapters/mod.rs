//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external systems:
//! - `model`: JSON-exported dense network for the screening classifier
//! - `wikipedia`: reqwest client for encyclopedia summaries
//! - `smtp`: lettre transport for report mail
//! - `secrets`: out-of-band credential lookup
//! - `sanitize`: redaction of contact details and credentials in logs

pub mod model;
pub mod sanitize;
pub mod secrets;
pub mod smtp;
pub mod wikipedia;
