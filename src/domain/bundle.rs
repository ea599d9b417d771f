//! Versioned model bundles.
//!
//! Catalog order, decision threshold, model artifact and input width are
//! calibrated together. A bundle keeps them in one record that is validated
//! as a unit before anything is served.

use std::path::{Path, PathBuf};

use super::catalog::{CatalogError, SymptomCatalog, MALARIA_V1_SYMPTOMS, MALARIA_V2_SYMPTOMS};
use super::verdict::{DecisionError, DecisionPolicy};

/// Names of the bundles compiled into the binary.
pub const BUILTIN_BUNDLES: [&str; 2] = ["malaria-v1", "malaria-v2"];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BundleError {
    #[error("Unknown model bundle '{0}' (expected one of: malaria-v1, malaria-v2)")]
    UnknownBundle(String),

    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Invalid threshold: {0}")]
    Threshold(#[from] DecisionError),

    #[error("Bundle '{bundle}' expects {expected} inputs but {source_name} has {actual}")]
    DimensionMismatch {
        bundle: String,
        source_name: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Catalog, threshold, artifact path and expected width of one model version.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    name: String,
    catalog: SymptomCatalog,
    policy: DecisionPolicy,
    model_path: PathBuf,
    expected_width: usize,
    model_sha256: Option<String>,
    disease_topic: String,
}

impl ModelBundle {
    /// Assemble and validate a bundle.
    ///
    /// # Errors
    /// Returns `BundleError::DimensionMismatch` when the catalog length and
    /// the expected width disagree.
    pub fn new(
        name: impl Into<String>,
        catalog: SymptomCatalog,
        policy: DecisionPolicy,
        model_path: impl Into<PathBuf>,
        expected_width: usize,
    ) -> Result<Self, BundleError> {
        let bundle = Self {
            name: name.into(),
            catalog,
            policy,
            model_path: model_path.into(),
            expected_width,
            model_sha256: None,
            disease_topic: "malaria".to_string(),
        };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Look up a bundle shipped with the application.
    ///
    /// - `malaria-v1`: 11 symptoms, threshold 0.33
    /// - `malaria-v2`: 23 symptoms, threshold 0.24
    ///
    /// # Errors
    /// Returns `BundleError::UnknownBundle` for any other name.
    pub fn builtin(name: &str) -> Result<Self, BundleError> {
        match name {
            "malaria-v1" => Self::new(
                name,
                SymptomCatalog::from_rows(&MALARIA_V1_SYMPTOMS)?,
                DecisionPolicy::new(0.33)?,
                "models/malaria_v1.json",
                MALARIA_V1_SYMPTOMS.len(),
            ),
            "malaria-v2" => Self::new(
                name,
                SymptomCatalog::from_rows(&MALARIA_V2_SYMPTOMS)?,
                DecisionPolicy::new(0.24)?,
                "models/malaria_v2.json",
                MALARIA_V2_SYMPTOMS.len(),
            ),
            other => Err(BundleError::UnknownBundle(other.to_string())),
        }
    }

    /// Point the bundle at a different artifact (deployment override).
    #[must_use]
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// Pin the artifact to a SHA-256 digest (lowercase hex).
    #[must_use]
    pub fn with_model_sha256(mut self, digest: impl Into<String>) -> Self {
        self.model_sha256 = Some(digest.into().to_ascii_lowercase());
        self
    }

    /// Encyclopedia topic fetched on a positive verdict.
    #[must_use]
    pub fn with_disease_topic(mut self, topic: impl Into<String>) -> Self {
        self.disease_topic = topic.into();
        self
    }

    /// # Errors
    /// Returns `BundleError::DimensionMismatch` if the catalog does not have
    /// `expected_width` entries.
    pub fn validate(&self) -> Result<(), BundleError> {
        self.check_width("catalog", self.catalog.len())
    }

    /// Reject a loaded model whose input width differs from the bundle's.
    ///
    /// # Errors
    /// Returns `BundleError::DimensionMismatch`.
    pub fn check_model_width(&self, actual: usize) -> Result<(), BundleError> {
        self.check_width("model", actual)
    }

    fn check_width(&self, source_name: &'static str, actual: usize) -> Result<(), BundleError> {
        if actual == self.expected_width {
            Ok(())
        } else {
            Err(BundleError::DimensionMismatch {
                bundle: self.name.clone(),
                source_name,
                expected: self.expected_width,
                actual,
            })
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn catalog(&self) -> &SymptomCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    #[must_use]
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    #[must_use]
    pub fn expected_width(&self) -> usize {
        self.expected_width
    }

    #[must_use]
    pub fn model_sha256(&self) -> Option<&str> {
        self.model_sha256.as_deref()
    }

    #[must_use]
    pub fn disease_topic(&self) -> &str {
        &self.disease_topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_bundles() {
        let v1 = ModelBundle::builtin("malaria-v1").expect("v1");
        assert_eq!(v1.expected_width(), 11);
        assert!((v1.policy().threshold() - 0.33).abs() < f64::EPSILON);

        let v2 = ModelBundle::builtin("malaria-v2").expect("v2");
        assert_eq!(v2.expected_width(), 23);
        assert!((v2.policy().threshold() - 0.24).abs() < f64::EPSILON);
        assert_eq!(v2.disease_topic(), "malaria");
    }

    #[test]
    fn test_unknown_bundle() {
        assert!(matches!(
            ModelBundle::builtin("malaria-v3"),
            Err(BundleError::UnknownBundle(_))
        ));
    }

    #[test]
    fn test_catalog_width_must_match() {
        let catalog = SymptomCatalog::from_rows(&MALARIA_V1_SYMPTOMS).expect("aligned");
        let policy = DecisionPolicy::new(0.24).expect("valid");
        let err = ModelBundle::new("mixed", catalog, policy, "m.json", 23).expect_err("mismatch");
        assert!(matches!(
            err,
            BundleError::DimensionMismatch {
                expected: 23,
                actual: 11,
                ..
            }
        ));
    }

    #[test]
    fn test_model_width_check() {
        let v1 = ModelBundle::builtin("malaria-v1").expect("v1");
        assert!(v1.check_model_width(11).is_ok());
        assert!(v1.check_model_width(23).is_err());
    }

    #[test]
    fn test_sha_pin_is_lowercased() {
        let v1 = ModelBundle::builtin("malaria-v1")
            .expect("v1")
            .with_model_sha256("ABCDEF");
        assert_eq!(v1.model_sha256(), Some("abcdef"));
    }
}
