//! Classifier port: Trait for the pretrained diabetes model.
//!
//! This trait abstracts the serialized model format from the application logic.

/// Errors raised while turning a feature vector into a label.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PredictError {
    #[error("expected {expected} features, got {got}")]
    FeatureCount { expected: usize, got: usize },

    #[error("feature '{name}' is not a finite number")]
    NonFinite { name: &'static str },

    #[error("model returned no labels")]
    EmptyOutput,

    #[error("model failed: {0}")]
    Model(String),
}

/// Trait for binary classifiers.
///
/// Implementations receive one feature vector in classifier order
/// (glucose, blood_pressure, insulin, bmi, age) and return the label
/// collection for that single row.
pub trait Classifier: Send + Sync {
    /// Classify one feature vector.
    ///
    /// # Errors
    /// Returns `PredictError` if the vector is malformed or the model fails.
    fn predict(&self, features: &[f64]) -> Result<Vec<i64>, PredictError>;

    /// Short description for logs and the status bar.
    fn describe(&self) -> String {
        "classifier".to_string()
    }
}
