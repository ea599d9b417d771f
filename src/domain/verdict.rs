//! Scores, verdicts and the decision threshold.
//!
//! Represents the output of the malaria classifier once it has been
//! compared against the calibrated threshold of its model version.

use serde::{Deserialize, Serialize};

use super::catalog::Language;
use super::features::FeatureVector;

/// Classifier output, always finite and inside [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    /// Wrap a raw model output.
    ///
    /// Returns `None` for NaN or infinite values; finite values are clamped
    /// into [0, 1].
    #[must_use]
    pub fn from_raw(value: f64) -> Option<Self> {
        if value.is_finite() {
            Some(Self(value.clamp(0.0, 1.0)))
        } else {
            None
        }
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Score {
    type Error = DecisionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DecisionError::InvalidScore(value))
        }
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

/// Binary screening outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Score above the threshold
    Positive,
    /// Score at or below the threshold
    Negative,
}

impl Verdict {
    /// Result line shown to the user.
    #[must_use]
    pub fn headline(&self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Positive, Language::English) => "Probably positive for malaria",
            (Self::Negative, Language::English) => "Probably negative for malaria",
            (Self::Positive, Language::Swahili) => "Huenda una malaria",
            (Self::Negative, Language::Swahili) => "Huenda huna malaria",
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Negative => (16, 185, 129), // Emerald (#10B981)
            Self::Positive => (244, 63, 94),  // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "POSITIVE"),
            Self::Negative => write!(f, "NEGATIVE"),
        }
    }
}

/// Errors for an invalid decision threshold.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecisionError {
    #[error("Threshold {0} must be a finite value strictly between 0 and 1")]
    InvalidThreshold(f64),

    #[error("Score {0} is not a probability")]
    InvalidScore(f64),
}

/// Fixed-threshold decision rule.
///
/// `Positive` iff `score > threshold`. The boundary itself is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DecisionPolicy {
    threshold: f64,
}

impl DecisionPolicy {
    /// # Errors
    /// Returns `DecisionError::InvalidThreshold` outside the open interval (0, 1).
    pub fn new(threshold: f64) -> Result<Self, DecisionError> {
        if threshold.is_finite() && threshold > 0.0 && threshold < 1.0 {
            Ok(Self { threshold })
        } else {
            Err(DecisionError::InvalidThreshold(threshold))
        }
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn decide(&self, score: Score) -> Verdict {
        if score.value() > self.threshold {
            Verdict::Positive
        } else {
            Verdict::Negative
        }
    }
}

impl TryFrom<f64> for DecisionPolicy {
    type Error = DecisionError;

    fn try_from(threshold: f64) -> Result<Self, Self::Error> {
        Self::new(threshold)
    }
}

impl From<DecisionPolicy> for f64 {
    fn from(policy: DecisionPolicy) -> Self {
        policy.threshold
    }
}

/// One evaluated checklist, kept only while its result is on screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Unique identifier
    pub id: String,

    /// Model bundle that produced the score
    pub bundle: String,

    /// Language the symptoms were selected in
    pub language: Language,

    /// Encoded selection
    pub features: FeatureVector,

    pub score: Score,

    pub verdict: Verdict,

    /// Threshold the score was compared against
    pub threshold: f64,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    #[must_use]
    pub fn new(
        bundle: impl Into<String>,
        language: Language,
        features: FeatureVector,
        score: Score,
        policy: &DecisionPolicy,
    ) -> Self {
        Self {
            id: uuid_v4(),
            bundle: bundle.into(),
            language,
            features,
            score,
            verdict: policy.decide(score),
            threshold: policy.threshold(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Generate a random UUID v4 using a ChaCha20 CSPRNG seeded from the OS.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(v: f64) -> Score {
        Score::from_raw(v).expect("finite")
    }

    #[test]
    fn test_strict_threshold() {
        let policy = DecisionPolicy::new(0.33).expect("valid");
        let eps = 1e-9;
        assert_eq!(policy.decide(score(0.33 + eps)), Verdict::Positive);
        assert_eq!(policy.decide(score(0.33 - eps)), Verdict::Negative);
        assert_eq!(policy.decide(score(0.33)), Verdict::Negative);
    }

    #[test]
    fn test_v2_threshold() {
        let policy = DecisionPolicy::new(0.24).expect("valid");
        assert_eq!(policy.decide(score(0.25)), Verdict::Positive);
        assert_eq!(policy.decide(score(0.24)), Verdict::Negative);
        assert_eq!(policy.decide(score(0.0)), Verdict::Negative);
        assert_eq!(policy.decide(score(1.0)), Verdict::Positive);
    }

    #[test]
    fn test_invalid_thresholds() {
        for t in [0.0, 1.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
            assert!(DecisionPolicy::new(t).is_err(), "threshold {t} accepted");
        }
    }

    #[test]
    fn test_score_from_raw() {
        assert!(Score::from_raw(f64::NAN).is_none());
        assert!(Score::from_raw(f64::NEG_INFINITY).is_none());
        assert_eq!(score(1.2).value(), 1.0);
        assert_eq!(score(-0.2).value(), 0.0);
    }

    #[test]
    fn test_deserialize_validates() {
        let policy: DecisionPolicy = serde_json::from_str("0.24").expect("valid");
        assert!((policy.threshold() - 0.24).abs() < f64::EPSILON);
        assert!(serde_json::from_str::<DecisionPolicy>("1.5").is_err());
        assert!(serde_json::from_str::<DecisionPolicy>("0.0").is_err());

        let s: Score = serde_json::from_str("0.7").expect("valid");
        assert!((s.value() - 0.7).abs() < f64::EPSILON);
        assert!(serde_json::from_str::<Score>("1.2").is_err());
        assert!(serde_json::from_str::<Score>("-0.1").is_err());
        assert_eq!(serde_json::to_string(&s).expect("serialize"), "0.7");
    }

    #[test]
    fn test_assessment_creation() {
        let policy = DecisionPolicy::new(0.33).expect("valid");
        let a = Assessment::new(
            "malaria-v1",
            Language::Swahili,
            FeatureVector::from_positions(11, [0, 7]),
            score(0.8),
            &policy,
        );
        assert_eq!(a.verdict, Verdict::Positive);
        assert_eq!(a.verdict.headline(a.language), "Huenda una malaria");
        assert!((a.threshold - 0.33).abs() < f64::EPSILON);
    }

    #[test]
    fn test_uuid_generation() {
        let id1 = uuid_v4();
        let id2 = uuid_v4();
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36);
    }
}
