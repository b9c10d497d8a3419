//! Metrics chart data: two bars and two fixed reference lines.
//!
//! Purely illustrative. Does not take part in prediction.

use super::PatientFeatures;

/// One category bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBar {
    pub category: &'static str,
    pub value: f64,
    /// RGB fill colour
    pub color: (u8, u8, u8),
}

/// A dashed horizontal reference line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceLine {
    pub value: f64,
    pub label: &'static str,
    /// RGB stroke colour
    pub color: (u8, u8, u8),
}

/// Glucose reference line (mg/dL).
pub const HIGH_GLUCOSE_RISK: ReferenceLine = ReferenceLine {
    value: 140.0,
    label: "High Glucose Risk",
    color: (255, 0, 0),
};

/// BMI reference line (kg/m²).
pub const HEALTHY_BMI: ReferenceLine = ReferenceLine {
    value: 25.0,
    label: "Healthy BMI",
    color: (0, 0, 255),
};

/// Chart built from one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsChart {
    pub title: &'static str,
    pub y_label: &'static str,
    pub bars: [ChartBar; 2],
    pub reference_lines: [ReferenceLine; 2],
}

impl MetricsChart {
    /// Build the chart from the glucose and BMI of a submission.
    #[must_use]
    pub fn from_features(features: &PatientFeatures) -> Self {
        Self {
            title: "Patient Health Metrics",
            y_label: "Value",
            bars: [
                ChartBar {
                    category: "Glucose",
                    value: features.glucose,
                    color: (0xFF, 0x99, 0x99), // #FF9999
                },
                ChartBar {
                    category: "BMI",
                    value: features.bmi,
                    color: (0x66, 0xB2, 0xFF), // #66B2FF
                },
            ],
            reference_lines: [HIGH_GLUCOSE_RISK, HEALTHY_BMI],
        }
    }

    /// Upper y bound covering every bar and reference line, with headroom.
    #[must_use]
    pub fn y_max(&self) -> f64 {
        let top = self
            .bars
            .iter()
            .map(|b| b.value)
            .chain(self.reference_lines.iter().map(|l| l.value))
            .fold(0.0_f64, f64::max);
        (top * 1.1).max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(glucose: f64, bmi: f64) -> PatientFeatures {
        PatientFeatures {
            glucose,
            bmi,
            ..Default::default()
        }
    }

    #[test]
    fn test_bars_follow_glucose_and_bmi() {
        let chart = MetricsChart::from_features(&features(187.0, 33.6));
        assert_eq!(chart.bars.len(), 2);
        assert_eq!(chart.bars[0].category, "Glucose");
        assert_eq!(chart.bars[0].value, 187.0);
        assert_eq!(chart.bars[1].category, "BMI");
        assert_eq!(chart.bars[1].value, 33.6);
    }

    #[test]
    fn test_reference_lines_are_fixed() {
        for (g, b) in [(0.0, 0.0), (300.0, 70.0), (95.0, 18.2)] {
            let chart = MetricsChart::from_features(&features(g, b));
            let values: Vec<f64> = chart.reference_lines.iter().map(|l| l.value).collect();
            assert_eq!(values, vec![140.0, 25.0]);
            assert_eq!(chart.reference_lines[0].label, "High Glucose Risk");
            assert_eq!(chart.reference_lines[1].label, "Healthy BMI");
        }
    }

    #[test]
    fn test_other_metrics_are_ignored() {
        let a = MetricsChart::from_features(&features(120.0, 25.0));
        let b = MetricsChart::from_features(&PatientFeatures {
            blood_pressure: 180.0,
            insulin: 850.0,
            age: 99.0,
            ..features(120.0, 25.0)
        });
        assert_eq!(a, b);
    }

    #[test]
    fn test_y_max_covers_threshold() {
        let chart = MetricsChart::from_features(&features(10.0, 5.0));
        assert!(chart.y_max() > 140.0);
        let chart = MetricsChart::from_features(&features(300.0, 5.0));
        assert!(chart.y_max() > 300.0);
    }
}
