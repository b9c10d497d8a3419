//! # Glycoscope
//!
//! Terminal dashboard for diabetes risk screening.
//!
//! This crate provides:
//! - Loading of a pretrained binary classifier from a JSON artifact
//! - A five-field patient form with range-clamped inputs
//! - A verdict (with precautions) and a glucose/BMI chart per submission
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (patient metrics, verdicts, chart data)
//! - `ports`: Trait definitions for external operations (the classifier)
//! - `adapters`: Concrete implementations (JSON model file, log sanitizing)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Label, PatientFeatures, Verdict};

/// Result type for Glycoscope operations
pub type Result<T> = std::result::Result<T, GlycoscopeError>;

/// Main error type for Glycoscope
#[derive(Debug, thiserror::Error)]
pub enum GlycoscopeError {
    #[error("Error loading model: {0}")]
    Load(#[from] adapters::LoadError),

    #[error("Error during prediction: {0}")]
    Predict(#[from] ports::PredictError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
