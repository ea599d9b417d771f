//! Dense network adapter: Implementation of Classifier.
//!
//! Loads a feed-forward network exported to JSON by the training pipeline
//! and evaluates it in plain Rust. The artifact is read once at startup and
//! never mutated afterwards.
//!
//! # Artifact format
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "input_width": 11,
//!   "feature_names": ["fever", "vomiting", "..."],
//!   "layers": [
//!     { "weights": [[0.1, "..."]], "bias": [0.0], "activation": "sigmoid" }
//!   ]
//! }
//! ```
//!
//! `weights` is row-major `[outputs][inputs]`. The last layer must have a
//! single output.
//!
//! # Integrity
//!
//! When the deployment pins a SHA-256 digest, the raw bytes are hashed and
//! compared before the JSON is parsed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{FeatureVector, Score};
use crate::ports::{Classifier, ClassifierError};

/// Highest artifact format this adapter understands.
const FORMAT_VERSION: u32 = 1;

/// Upper bound on any layer dimension, as a sanity check on the artifact.
const MAX_LAYER_WIDTH: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::Relu => x.max(0.0),
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Tanh => x.tanh(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

/// Network parameters as exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseModelArtifact {
    pub format_version: u32,
    pub input_width: usize,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    pub layers: Vec<DenseLayer>,
}

impl DenseModelArtifact {
    fn validate(&self) -> Result<(), ClassifierError> {
        let invalid = |msg: String| Err(ClassifierError::Load(msg));

        if self.format_version != FORMAT_VERSION {
            return invalid(format!(
                "Unsupported format_version {} (expected {FORMAT_VERSION})",
                self.format_version
            ));
        }
        if self.input_width == 0 || self.input_width > MAX_LAYER_WIDTH {
            return invalid(format!("Invalid input_width {}", self.input_width));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.input_width {
                return invalid(format!(
                    "feature_names has {} entries, input_width is {}",
                    names.len(),
                    self.input_width
                ));
            }
        }
        if self.layers.is_empty() {
            return invalid("Model has no layers".into());
        }

        let mut width = self.input_width;
        for (i, layer) in self.layers.iter().enumerate() {
            let outputs = layer.weights.len();
            if outputs == 0 || outputs > MAX_LAYER_WIDTH {
                return invalid(format!("Layer {i} has invalid output count {outputs}"));
            }
            if layer.bias.len() != outputs {
                return invalid(format!(
                    "Layer {i}: {} biases for {outputs} outputs",
                    layer.bias.len()
                ));
            }
            if let Some(row) = layer.weights.iter().find(|row| row.len() != width) {
                return invalid(format!(
                    "Layer {i}: weight row has {} inputs, expected {width}",
                    row.len()
                ));
            }
            let all_finite = layer
                .weights
                .iter()
                .flatten()
                .chain(layer.bias.iter())
                .all(|v| v.is_finite());
            if !all_finite {
                return invalid(format!("Layer {i} contains non-finite parameters"));
            }
            width = outputs;
        }

        if width != 1 {
            return invalid(format!("Final layer must have 1 output, has {width}"));
        }
        Ok(())
    }
}

/// Feed-forward classifier backed by a JSON artifact.
#[derive(Debug, Clone)]
pub struct DenseClassifier {
    artifact: DenseModelArtifact,
    source: Option<PathBuf>,
}

impl DenseClassifier {
    /// Load and validate an artifact from disk.
    ///
    /// # Errors
    /// Returns `ClassifierError::Load` if the file is unreadable, does not
    /// match `expected_sha256`, or fails validation.
    pub fn load(path: &Path, expected_sha256: Option<&str>) -> Result<Self, ClassifierError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ClassifierError::Load(format!("{}: {e}", path.display())))?;

        if let Some(expected) = expected_sha256 {
            let actual = sha256_hex(&bytes);
            if !actual.eq_ignore_ascii_case(expected.trim()) {
                tracing::error!(path = %path.display(), "Model digest does not match the pinned value");
                return Err(ClassifierError::Load(format!(
                    "SHA-256 mismatch for {}",
                    path.display()
                )));
            }
        }

        let artifact: DenseModelArtifact = serde_json::from_slice(&bytes)
            .map_err(|e| ClassifierError::Load(format!("{}: {e}", path.display())))?;

        let mut classifier = Self::from_artifact(artifact)?;
        classifier.source = Some(path.to_path_buf());

        tracing::info!(
            "Loaded model from {:?} (layers={}, input_width={})",
            path,
            classifier.artifact.layers.len(),
            classifier.artifact.input_width
        );
        Ok(classifier)
    }

    /// Build a classifier from in-memory parameters.
    ///
    /// # Errors
    /// Returns `ClassifierError::Load` if the parameters are inconsistent.
    pub fn from_artifact(artifact: DenseModelArtifact) -> Result<Self, ClassifierError> {
        artifact.validate()?;
        Ok(Self {
            artifact,
            source: None,
        })
    }

    #[must_use]
    pub fn artifact(&self) -> &DenseModelArtifact {
        &self.artifact
    }

    /// File the model was loaded from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn forward(&self, input: Vec<f64>) -> f64 {
        let mut activations = input;
        for layer in &self.artifact.layers {
            activations = layer
                .weights
                .iter()
                .zip(&layer.bias)
                .map(|(row, b)| {
                    let z = row.iter().zip(&activations).map(|(w, x)| w * x).sum::<f64>() + b;
                    layer.activation.apply(z)
                })
                .collect();
        }
        activations.first().copied().unwrap_or(f64::NAN)
    }
}

impl Classifier for DenseClassifier {
    fn input_width(&self) -> usize {
        self.artifact.input_width
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.artifact.feature_names.as_deref()
    }

    fn score(&self, features: &FeatureVector) -> Result<Score, ClassifierError> {
        if features.len() != self.artifact.input_width {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.artifact.input_width,
                actual: features.len(),
            });
        }

        let raw = self.forward(features.to_f64());
        tracing::debug!("Model output {:.4} for {} selected symptoms", raw, features.count_selected());
        Score::from_raw(raw).ok_or(ClassifierError::NonFinite)
    }
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
