//! Adapters layer: Concrete implementations of ports.
//!
//! - `model_file`: JSON model artifact behind the `Classifier` port
//! - `sanitize`: patient-metric filtering for logs

pub mod model_file;
pub mod sanitize;

// Re-export load error for lib.rs
pub use model_file::LoadError;
