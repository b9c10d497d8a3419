//! Prediction service: Turns one form submission into a verdict and a chart.
//!
//! This service coordinates:
//! - Feature vector assembly (fixed order)
//! - A single classifier call
//! - Verdict branch selection
//! - Chart construction

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Label, MetricsChart, PatientFeatures, Verdict, FEATURE_NAMES};
use crate::ports::{Classifier, PredictError};

/// Everything shown for one submission.
#[derive(Debug)]
pub struct Submission {
    /// Verdict, or the error that prevented one.
    pub verdict: Result<Verdict, PredictError>,

    /// Chart of glucose and BMI, built regardless of the verdict.
    pub chart: MetricsChart,

    pub submitted_at: DateTime<Utc>,
}

/// Service holding the loaded classifier for the lifetime of the session.
///
/// The classifier is shared read-only state; nothing mutates it after load.
#[derive(Clone)]
pub struct PredictionService {
    classifier: Arc<dyn Classifier>,
}

impl PredictionService {
    /// Create a new prediction service.
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        tracing::info!("Prediction service ready ({})", classifier.describe());
        Self { classifier }
    }

    /// Short description of the loaded model.
    #[must_use]
    pub fn model_description(&self) -> String {
        self.classifier.describe()
    }

    /// Assemble the classifier input in fit order.
    ///
    /// # Errors
    /// Returns `PredictError::NonFinite` naming the first bad metric.
    pub fn assemble(features: &PatientFeatures) -> Result<Vec<f64>, PredictError> {
        let vector = features.to_vec();
        if let Some(i) = vector.iter().position(|v| !v.is_finite()) {
            return Err(PredictError::NonFinite {
                name: FEATURE_NAMES[i],
            });
        }
        Ok(vector)
    }

    /// Run the classifier once and return the first label.
    ///
    /// # Errors
    /// Returns error if assembly or the model fails, or the model returns
    /// no labels.
    pub fn predict(&self, features: &PatientFeatures) -> Result<Label, PredictError> {
        let vector = Self::assemble(features)?;
        let labels = self.classifier.predict(&vector)?;
        let label = labels
            .first()
            .copied()
            .map(Label)
            .ok_or(PredictError::EmptyOutput)?;

        if !label.is_binary() {
            tracing::warn!(
                "Model returned label {} outside {{0, 1}}; treating as negative",
                label
            );
        }
        Ok(label)
    }

    /// Handle one form submission.
    ///
    /// Prediction failures are captured in the returned `Submission`; the
    /// service itself stays usable.
    pub fn submit(&self, features: &PatientFeatures) -> Submission {
        let verdict = self.predict(features).map(Verdict::from_label);

        match &verdict {
            Ok(v) => tracing::info!("Prediction complete: verdict={}", v),
            Err(e) => tracing::error!("Prediction failed: {}", e),
        }

        Submission {
            verdict,
            chart: MetricsChart::from_features(features),
            submitted_at: Utc::now(),
        }
    }
}
