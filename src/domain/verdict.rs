//! Verdict types.
//!
//! Maps the classifier's label onto one of two presentation branches.

use serde::{Deserialize, Serialize};

/// Lifestyle precautions shown with a positive verdict.
pub const PRECAUTIONS: [&str; 5] = [
    "Maintain a healthy, balanced diet",
    "Exercise regularly",
    "Monitor blood sugar frequently",
    "Avoid sugary foods and drinks",
    "Consult your doctor regularly",
];

/// Encouragement shown with a negative verdict.
pub const ENCOURAGEMENT: &str = "Continue maintaining a healthy lifestyle!";

/// Raw class label produced by the classifier.
///
/// The model is binary (0 = unlikely, 1 = likely) but the artifact is
/// external, so any integer can come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Label(pub i64);

impl Label {
    pub const NEGATIVE: Self = Self(0);
    pub const POSITIVE: Self = Self(1);

    /// Whether the label is one the binary model is documented to emit.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        matches!(self.0, 0 | 1)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Presentation branch selected by the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Patient is likely to have diabetes.
    Likely,
    /// Patient is unlikely to have diabetes.
    Unlikely,
}

impl Verdict {
    /// Select the branch for a label.
    ///
    /// Only an exact `1` is positive; every other value, including labels
    /// outside {0, 1}, lands on `Unlikely`.
    #[must_use]
    pub fn from_label(label: Label) -> Self {
        if label == Label::POSITIVE {
            Self::Likely
        } else {
            Self::Unlikely
        }
    }

    /// Headline message.
    #[must_use]
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Likely => "The patient is likely to have diabetes.",
            Self::Unlikely => "The patient is unlikely to have diabetes.",
        }
    }

    /// Lines shown under the headline.
    #[must_use]
    pub fn details(&self) -> &'static [&'static str] {
        match self {
            Self::Likely => &PRECAUTIONS,
            Self::Unlikely => std::slice::from_ref(&ENCOURAGEMENT),
        }
    }

    /// Whether the details are rendered as a bulleted list.
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::Likely)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Likely => write!(f, "LIKELY"),
            Self::Unlikely => write!(f, "UNLIKELY"),
        }
    }
}
