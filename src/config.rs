//! Configuration for DiagAI
//!
//! Read from a TOML file (`DIAGAI_CONFIG`, default `diagai.toml`). A missing
//! file yields the defaults. A few deployment settings can be overridden
//! from the environment:
//!
//! - `DIAGAI_BUNDLE`: bundle name
//! - `DIAGAI_MODEL_PATH`: model artifact path
//! - `DIAGAI_SMTP_SENDER`: sender mailbox for reports

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::adapters::smtp::SmtpSettings;
use crate::adapters::wikipedia::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use crate::domain::{BundleError, ModelBundle};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "diagai.toml";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Cannot parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("{0}")]
    Invalid(String),
}

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub bundle: BundleConfig,
    pub knowledge: KnowledgeConfig,
    pub mail: MailConfig,
}

/// Model bundle selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleConfig {
    /// Built-in bundle name
    pub name: String,
    /// Replaces the bundle's default artifact path
    pub model_path: Option<PathBuf>,
    /// Expected SHA-256 of the artifact (hex)
    pub sha256: Option<String>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            name: "malaria-v1".into(),
            model_path: None,
            sha256: None,
        }
    }
}

/// Encyclopedia lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KnowledgeConfig {
    /// Endpoint template; `{lang}` becomes the language code
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Sentences kept from the summary
    pub max_sentences: usize,
    /// Topic looked up on a positive verdict
    pub disease_topic: String,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            timeout_secs: 10,
            max_sentences: 5,
            disease_topic: "malaria".into(),
        }
    }
}

/// Report delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MailConfig {
    pub enabled: bool,
    pub host: String,
    /// Implicit-TLS port
    pub port: u16,
    pub sender: Option<String>,
    /// The single inbox receiving every report
    pub recipient: Option<String>,
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "smtp.gmail.com".into(),
            port: 465,
            sender: None,
            recipient: None,
            timeout_secs: 20,
        }
    }
}

impl AppConfig {
    /// Load from `DIAGAI_CONFIG` (or `diagai.toml`) and apply environment
    /// overrides.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file exists but cannot be read or parsed,
    /// or if the result fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("DIAGAI_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            tracing::info!("No configuration at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load config from file
    ///
    /// # Errors
    /// Returns `ConfigError::Read` or `ConfigError::Parse`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// # Errors
    /// Returns `ConfigError::Parse` for malformed TOML or unknown keys.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })
    }

    /// Apply `DIAGAI_*` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(name) = set("DIAGAI_BUNDLE") {
            self.bundle.name = name.trim().to_string();
        }
        if let Some(path) = set("DIAGAI_MODEL_PATH") {
            self.bundle.model_path = Some(PathBuf::from(path));
        }
        if let Some(sender) = set("DIAGAI_SMTP_SENDER") {
            self.mail.sender = Some(sender.trim().to_string());
        }
    }

    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bundle().map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if let Some(digest) = &self.bundle.sha256 {
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::Invalid(
                    "bundle.sha256 must be 64 hex characters".into(),
                ));
            }
        }

        let k = &self.knowledge;
        if k.timeout_secs == 0 {
            return Err(ConfigError::Invalid("knowledge.timeout_secs must be > 0".into()));
        }
        if k.max_sentences == 0 {
            return Err(ConfigError::Invalid("knowledge.max_sentences must be > 0".into()));
        }
        if k.disease_topic.trim().is_empty() {
            return Err(ConfigError::Invalid("knowledge.disease_topic must not be empty".into()));
        }
        if !k.base_url.starts_with("https://") && !k.base_url.starts_with("http://") {
            return Err(ConfigError::Invalid("knowledge.base_url must be an http(s) URL".into()));
        }

        let m = &self.mail;
        if m.enabled {
            if m.host.trim().is_empty() || m.port == 0 {
                return Err(ConfigError::Invalid("mail.host and mail.port are required".into()));
            }
            if m.timeout_secs == 0 {
                return Err(ConfigError::Invalid("mail.timeout_secs must be > 0".into()));
            }
            for (key, value) in [("mail.sender", &m.sender), ("mail.recipient", &m.recipient)] {
                match value {
                    Some(v) if v.contains('@') => {}
                    _ => return Err(ConfigError::Invalid(format!("{key} must be a mail address"))),
                }
            }
        }

        Ok(())
    }

    /// Build the configured model bundle.
    ///
    /// # Errors
    /// Returns `BundleError::UnknownBundle` for an unknown name.
    pub fn bundle(&self) -> Result<ModelBundle, BundleError> {
        let mut bundle = ModelBundle::builtin(&self.bundle.name)?
            .with_disease_topic(self.knowledge.disease_topic.trim());
        if let Some(path) = &self.bundle.model_path {
            bundle = bundle.with_model_path(path);
        }
        if let Some(digest) = &self.bundle.sha256 {
            bundle = bundle.with_model_sha256(digest);
        }
        Ok(bundle)
    }

    /// SMTP settings and recipient, or `None` when reporting is disabled.
    #[must_use]
    pub fn smtp(&self) -> Option<(SmtpSettings, String)> {
        let m = &self.mail;
        if !m.enabled {
            return None;
        }
        let sender = m.sender.clone()?;
        let recipient = m.recipient.clone()?;
        Some((
            SmtpSettings {
                host: m.host.clone(),
                port: m.port,
                sender,
                timeout_secs: m.timeout_secs,
            },
            recipient,
        ))
    }
}
