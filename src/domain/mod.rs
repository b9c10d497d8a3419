//! Domain layer: Core screening types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! Everything here is deterministic and covered by unit tests.

mod chart;
mod patient;
mod verdict;

pub use chart::{ChartBar, MetricsChart, ReferenceLine};
pub use patient::{FieldKind, FieldSpec, PatientFeatures, FEATURE_COUNT, FEATURE_NAMES, FIELD_SPECS};
pub use verdict::{Label, Verdict, ENCOURAGEMENT, PRECAUTIONS};
