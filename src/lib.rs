//! # DiagAI
//!
//! Malaria symptom checklist with a pretrained screening model.
//!
//! This crate provides:
//! - English and Swahili symptom catalogs aligned to one feature order
//! - A fixed-threshold decision over a versioned model bundle
//! - Encyclopedia summaries for positive results
//! - Free-text symptom reports delivered by mail
//! - Terminal UI for local use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (catalog, features, verdicts, bundles, reports)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (dense model, Wikipedia, SMTP)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: TOML configuration with environment overrides
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Assessment, Language, Verdict};

/// Result type for DiagAI operations
pub type Result<T> = std::result::Result<T, DiagaiError>;

/// Main error type for DiagAI
#[derive(Debug, thiserror::Error)]
pub enum DiagaiError {
    #[error("{0}")]
    Catalog(#[from] domain::CatalogError),

    #[error("Invalid model bundle: {0}")]
    Bundle(#[from] domain::BundleError),

    #[error("Model load failed: {0}")]
    ModelLoad(String),

    #[error("Model accepts {actual} inputs but the bundle defines {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Model feature order does not match the '{0}' catalog")]
    FeatureOrder(String),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ports::ClassifierError),

    #[error("Summary lookup failed: {0}")]
    KnowledgeLookup(#[from] ports::KnowledgeError),

    #[error("Report delivery failed: {0}")]
    MailDelivery(#[from] ports::MailError),

    #[error("{0}")]
    Report(#[from] domain::ReportError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
