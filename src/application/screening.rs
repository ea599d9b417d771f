//! Screening service: checklist selection to verdict.
//!
//! This service coordinates:
//! - Feature encoding against the bundle's catalog
//! - Classifier scoring
//! - The bundle's threshold decision
//! - Summary lookup for positive verdicts

use std::sync::Arc;

use crate::application::summary::SummaryService;
use crate::domain::{Assessment, BundleError, ModelBundle, Selection, Verdict};
use crate::ports::{Classifier, KnowledgeSource};
use crate::DiagaiError;

/// Summary attached to a positive result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// Summary text, or the not-found message for the topic
    Text(String),
    /// Lookup failed; the message is safe to display
    Unavailable(String),
}

/// Verdict plus the optional summary.
#[derive(Debug, Clone)]
pub struct ScreeningOutcome {
    pub assessment: Assessment,
    /// Present only for positive verdicts
    pub summary: Option<SummaryOutcome>,
}

/// Service running one checklist through the bundle's model.
///
/// The model, catalog and threshold are checked against each other once in
/// [`ScreeningService::new`]; `evaluate` never sees a mismatched pair.
pub struct ScreeningService<C, K>
where
    C: Classifier,
    K: KnowledgeSource,
{
    classifier: Arc<C>,
    bundle: Arc<ModelBundle>,
    summaries: SummaryService<K>,
}

impl<C, K> ScreeningService<C, K>
where
    C: Classifier,
    K: KnowledgeSource,
{
    /// Pair a loaded classifier with its bundle.
    ///
    /// # Errors
    /// Returns `DiagaiError::DimensionMismatch` when the model input width is
    /// not the bundle's width, and `DiagaiError::FeatureOrder` when the model
    /// records a feature order different from the catalog's.
    pub fn new(
        classifier: Arc<C>,
        bundle: Arc<ModelBundle>,
        summaries: SummaryService<K>,
    ) -> Result<Self, DiagaiError> {
        bundle
            .check_model_width(classifier.input_width())
            .map_err(|e| match e {
                BundleError::DimensionMismatch {
                    expected, actual, ..
                } => DiagaiError::DimensionMismatch { expected, actual },
                other => DiagaiError::Bundle(other),
            })?;

        if let Some(names) = classifier.feature_names() {
            if names != bundle.catalog().canonical() {
                return Err(DiagaiError::FeatureOrder(bundle.name().to_string()));
            }
        }

        tracing::info!(
            bundle = bundle.name(),
            width = bundle.expected_width(),
            threshold = bundle.policy().threshold(),
            "Screening service ready"
        );

        Ok(Self {
            classifier,
            bundle,
            summaries,
        })
    }

    #[must_use]
    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    /// Encode, score and decide.
    ///
    /// # Errors
    /// Returns `DiagaiError::Catalog` for a name outside the selection's
    /// language table and `DiagaiError::Classifier` if scoring fails.
    pub fn assess(&self, selection: &Selection) -> Result<Assessment, DiagaiError> {
        let features = selection.encode(self.bundle.catalog())?;
        let score = self.classifier.score(&features)?;
        let assessment = Assessment::new(
            self.bundle.name(),
            selection.language(),
            features,
            score,
            self.bundle.policy(),
        );

        tracing::info!(
            bundle = %assessment.bundle,
            selected = assessment.features.count_selected(),
            score = format_args!("{:.4}", assessment.score.value()),
            verdict = %assessment.verdict,
            "Assessment complete"
        );

        Ok(assessment)
    }

    /// Full evaluation: assessment, and for a positive verdict a summary of
    /// the bundle's disease topic.
    ///
    /// A failed lookup never changes the verdict; it is reported as
    /// [`SummaryOutcome::Unavailable`].
    ///
    /// # Errors
    /// See [`ScreeningService::assess`].
    pub fn evaluate(&self, selection: &Selection) -> Result<ScreeningOutcome, DiagaiError> {
        let assessment = self.assess(selection)?;

        let summary = match assessment.verdict {
            Verdict::Negative => None,
            Verdict::Positive => {
                let topic = self.bundle.disease_topic();
                Some(match self.summaries.fetch(topic, selection.language()) {
                    Ok(text) => SummaryOutcome::Text(text),
                    Err(e) => {
                        tracing::warn!(topic, "Summary lookup failed: {}", e);
                        SummaryOutcome::Unavailable(e.to_string())
                    }
                })
            }
        };

        Ok(ScreeningOutcome {
            assessment,
            summary,
        })
    }
}
