//! Patient metrics collected by the screening form.
//!
//! Based on the Pima Indians diabetes feature set, reduced to the five
//! metrics the classifier was fit on.

use serde::{Deserialize, Serialize};

/// Number of features the classifier expects.
pub const FEATURE_COUNT: usize = 5;

/// Feature names in the order the classifier was fit on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["glucose", "blood_pressure", "insulin", "bmi", "age"];

/// How a field's value is entered and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Whole numbers only.
    Integer,
    /// Real numbers shown (and rounded) to a fixed number of decimals.
    Real { decimals: u8 },
}

/// Bounds and default for a single input control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Whether `value` lies inside the control's range.
    #[must_use]
    pub fn accepts(&self, value: f64) -> bool {
        value.is_finite() && (self.min..=self.max).contains(&value)
    }

    /// Clamp to the range and round to the control's precision.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        let clamped = if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        };
        self.round(clamped)
    }

    /// Round to the control's precision.
    #[must_use]
    pub fn round(&self, value: f64) -> f64 {
        match self.kind {
            FieldKind::Integer => value.round(),
            FieldKind::Real { decimals } => {
                let factor = 10f64.powi(i32::from(decimals));
                (value * factor).round() / factor
            }
        }
    }

    /// Increment used by the step keys.
    #[must_use]
    pub fn step(&self) -> f64 {
        match self.kind {
            FieldKind::Integer => 1.0,
            FieldKind::Real { decimals } => 10f64.powi(-i32::from(decimals)),
        }
    }

    /// Render a value with the control's precision.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match self.kind {
            FieldKind::Integer => format!("{value:.0}"),
            FieldKind::Real { decimals } => format!("{value:.*}", usize::from(decimals)),
        }
    }
}

/// Input controls in feature order.
pub const FIELD_SPECS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec {
        name: "glucose",
        label: "Glucose Level",
        hint: "mg/dL (0-300)",
        min: 0.0,
        max: 300.0,
        default: 120.0,
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "blood_pressure",
        label: "Blood Pressure",
        hint: "mmHg (0-200)",
        min: 0.0,
        max: 200.0,
        default: 70.0,
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "insulin",
        label: "Insulin Level",
        hint: "µU/mL (0-900)",
        min: 0.0,
        max: 900.0,
        default: 80.0,
        kind: FieldKind::Integer,
    },
    FieldSpec {
        name: "bmi",
        label: "BMI",
        hint: "kg/m² (0.0-70.0)",
        min: 0.0,
        max: 70.0,
        default: 25.0,
        kind: FieldKind::Real { decimals: 1 },
    },
    FieldSpec {
        name: "age",
        label: "Age",
        hint: "years (0-120)",
        min: 0.0,
        max: 120.0,
        default: 30.0,
        kind: FieldKind::Integer,
    },
];

/// The five committed metrics of one form submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientFeatures {
    /// Plasma glucose concentration in mg/dL
    pub glucose: f64,

    /// Diastolic blood pressure in mmHg
    pub blood_pressure: f64,

    /// Two-hour serum insulin in µU/mL
    pub insulin: f64,

    /// Body mass index in kg/m²
    pub bmi: f64,

    /// Age in years
    pub age: f64,
}

impl Default for PatientFeatures {
    fn default() -> Self {
        Self {
            glucose: FIELD_SPECS[0].default,
            blood_pressure: FIELD_SPECS[1].default,
            insulin: FIELD_SPECS[2].default,
            bmi: FIELD_SPECS[3].default,
            age: FIELD_SPECS[4].default,
        }
    }
}

impl PatientFeatures {
    /// Convert features to the classifier input vector.
    /// Order: glucose, blood_pressure, insulin, bmi, age
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.glucose,
            self.blood_pressure,
            self.insulin,
            self.bmi,
            self.age,
        ]
    }

    /// Create features from a vector in classifier order.
    ///
    /// # Errors
    /// Returns error if vector length is not 5.
    pub fn from_vec(v: &[f64]) -> Result<Self, String> {
        if v.len() != FEATURE_COUNT {
            return Err(format!(
                "Expected {FEATURE_COUNT} features, got {}",
                v.len()
            ));
        }

        Ok(Self {
            glucose: v[0],
            blood_pressure: v[1],
            insulin: v[2],
            bmi: v[3],
            age: v[4],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_controls() {
        let features = PatientFeatures::default();
        assert_eq!(features.to_vec(), vec![120.0, 70.0, 80.0, 25.0, 30.0]);
    }

    #[test]
    fn test_to_vec_preserves_field_order() {
        let features = PatientFeatures {
            glucose: 1.0,
            blood_pressure: 2.0,
            insulin: 3.0,
            bmi: 4.5,
            age: 5.0,
        };
        assert_eq!(features.to_vec(), vec![1.0, 2.0, 3.0, 4.5, 5.0]);
    }

    #[test]
    fn test_order_holds_across_ranges() {
        // Walk each control's range and check the slot it lands in.
        for (slot, spec) in FIELD_SPECS.iter().enumerate() {
            let mut value = spec.min;
            while value <= spec.max {
                let mut v = PatientFeatures::default().to_vec();
                v[slot] = value;
                let features = PatientFeatures::from_vec(&v).expect("Should parse");
                assert_eq!(features.to_vec()[slot], value, "{}", spec.name);
                value += (spec.max - spec.min) / 7.0;
            }
        }
    }

    #[test]
    fn test_names_follow_specs() {
        for (name, spec) in FEATURE_NAMES.iter().zip(FIELD_SPECS.iter()) {
            assert_eq!(*name, spec.name);
        }
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert!(PatientFeatures::from_vec(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_clamp_and_round() {
        let glucose = FIELD_SPECS[0];
        assert_eq!(glucose.clamp(-5.0), 0.0);
        assert_eq!(glucose.clamp(301.0), 300.0);
        assert_eq!(glucose.clamp(99.6), 100.0);

        let bmi = FIELD_SPECS[3];
        assert_eq!(bmi.clamp(70.4), 70.0);
        assert!((bmi.clamp(22.34) - 22.3).abs() < 1e-9);
        assert_eq!(bmi.format(25.0), "25.0");
        assert!((bmi.step() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_accepts_bounds_inclusive() {
        let age = FIELD_SPECS[4];
        assert!(age.accepts(0.0));
        assert!(age.accepts(120.0));
        assert!(!age.accepts(121.0));
        assert!(!age.accepts(f64::NAN));
    }
}
