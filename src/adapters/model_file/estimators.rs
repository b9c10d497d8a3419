//! Estimators that can be stored in a model artifact.
//!
//! Parameters mirror what scikit-learn exposes after fitting, so an export
//! script only has to dump attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::FEATURE_COUNT;

/// Fitted estimator, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression(LogisticRegression),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

/// Standard scaler fitted on the training data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Binary logistic regression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
}

/// Node of a fitted decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Leaf {
        label: i64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// Single decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub root: TreeNode,
}

/// Hard-voting ensemble of decision trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl Estimator {
    /// Short name used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression(_) => "logistic_regression",
            Self::DecisionTree(_) => "decision_tree",
            Self::RandomForest(_) => "random_forest",
        }
    }

    /// Check parameter shapes against the feature count.
    ///
    /// # Errors
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::LogisticRegression(lr) => lr.validate(),
            Self::DecisionTree(tree) => tree.root.validate(),
            Self::RandomForest(forest) => {
                if forest.trees.is_empty() {
                    return Err("random_forest has no trees".into());
                }
                forest
                    .trees
                    .iter()
                    .enumerate()
                    .try_for_each(|(i, t)| t.root.validate().map_err(|e| format!("tree {i}: {e}")))
            }
        }
    }

    /// Label for one validated feature row.
    #[must_use]
    pub fn predict_row(&self, x: &[f64]) -> i64 {
        match self {
            Self::LogisticRegression(lr) => lr.predict_row(x),
            Self::DecisionTree(tree) => tree.root.predict_row(x),
            Self::RandomForest(forest) => forest.predict_row(x),
        }
    }
}

impl LogisticRegression {
    fn validate(&self) -> Result<(), String> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(format!(
                "expected {FEATURE_COUNT} coefficients, got {}",
                self.coefficients.len()
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("coefficients must be finite".into());
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != FEATURE_COUNT || scaler.scale.len() != FEATURE_COUNT {
                return Err("scaler lengths do not match feature count".into());
            }
            if scaler.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
                return Err("scaler scale must be finite and non-zero".into());
            }
        }
        Ok(())
    }

    /// Signed distance to the decision boundary.
    #[must_use]
    pub fn decision_function(&self, x: &[f64]) -> f64 {
        let mut z = self.intercept;
        for (i, (coef, raw)) in self.coefficients.iter().zip(x).enumerate() {
            let value = match &self.scaler {
                Some(s) => (raw - s.mean[i]) / s.scale[i],
                None => *raw,
            };
            z += coef * value;
        }
        z
    }

    fn predict_row(&self, x: &[f64]) -> i64 {
        // Positive class only when strictly past the boundary.
        i64::from(self.decision_function(x) > 0.0)
    }
}

impl TreeNode {
    fn validate(&self) -> Result<(), String> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Self::Split {
                feature,
                threshold,
                left,
                right,
            } = node
            {
                if *feature >= FEATURE_COUNT {
                    return Err(format!(
                        "split on feature {feature}, only {FEATURE_COUNT} available"
                    ));
                }
                if threshold.is_nan() {
                    return Err("split threshold is NaN".into());
                }
                stack.push(&**left);
                stack.push(&**right);
            }
        }
        Ok(())
    }

    fn predict_row(&self, x: &[f64]) -> i64 {
        let mut node = self;
        loop {
            match node {
                Self::Leaf { label } => return *label,
                Self::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { &**left } else { &**right };
                }
            }
        }
    }
}

impl RandomForest {
    fn predict_row(&self, x: &[f64]) -> i64 {
        let mut votes: BTreeMap<i64, usize> = BTreeMap::new();
        for tree in &self.trees {
            *votes.entry(tree.root.predict_row(x)).or_default() += 1;
        }

        // Ascending iteration + strict comparison: ties go to the smallest label.
        let mut best = (0, 0);
        for (label, count) in votes {
            if count > best.1 {
                best = (label, count);
            }
        }
        best.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, below: i64, above: i64) -> DecisionTree {
        DecisionTree {
            root: TreeNode::Split {
                feature,
                threshold,
                left: Box::new(TreeNode::Leaf { label: below }),
                right: Box::new(TreeNode::Leaf { label: above }),
            },
        }
    }

    #[test]
    fn test_logistic_boundary_is_strict() {
        let lr = LogisticRegression {
            coefficients: vec![1.0, 0.0, 0.0, 0.0, 0.0],
            intercept: -140.0,
            scaler: None,
        };
        assert_eq!(lr.predict_row(&[140.0, 0.0, 0.0, 0.0, 0.0]), 0);
        assert_eq!(lr.predict_row(&[141.0, 0.0, 0.0, 0.0, 0.0]), 1);
    }

    #[test]
    fn test_logistic_applies_scaler() {
        let lr = LogisticRegression {
            coefficients: vec![2.0, 0.0, 0.0, 0.0, 0.0],
            intercept: 0.0,
            scaler: Some(StandardScaler {
                mean: vec![100.0, 0.0, 0.0, 0.0, 0.0],
                scale: vec![10.0, 1.0, 1.0, 1.0, 1.0],
            }),
        };
        let z = lr.decision_function(&[120.0, 5.0, 5.0, 5.0, 5.0]);
        assert!((z - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_logistic_validation() {
        let short = LogisticRegression {
            coefficients: vec![1.0; 4],
            intercept: 0.0,
            scaler: None,
        };
        assert!(short.validate().is_err());

        let zero_scale = LogisticRegression {
            coefficients: vec![1.0; 5],
            intercept: 0.0,
            scaler: Some(StandardScaler {
                mean: vec![0.0; 5],
                scale: vec![1.0, 1.0, 0.0, 1.0, 1.0],
            }),
        };
        assert!(zero_scale.validate().is_err());
    }

    #[test]
    fn test_tree_goes_left_on_equal() {
        let tree = stump(0, 140.0, 0, 1);
        assert_eq!(tree.root.predict_row(&[140.0, 0.0, 0.0, 0.0, 0.0]), 0);
        assert_eq!(tree.root.predict_row(&[140.5, 0.0, 0.0, 0.0, 0.0]), 1);
    }

    #[test]
    fn test_tree_rejects_unknown_feature() {
        let tree = stump(5, 1.0, 0, 1);
        assert!(Estimator::DecisionTree(tree).validate().is_err());
    }

    #[test]
    fn test_forest_majority_and_tie() {
        let forest = RandomForest {
            trees: vec![stump(0, 100.0, 0, 1), stump(3, 30.0, 0, 1), stump(4, 50.0, 0, 1)],
        };
        // glucose high, bmi high, age low => 2 votes for 1
        assert_eq!(forest.predict_row(&[150.0, 0.0, 0.0, 35.0, 20.0]), 1);

        let tied = RandomForest {
            trees: vec![stump(0, 100.0, 0, 1), stump(3, 30.0, 0, 1)],
        };
        assert_eq!(tied.predict_row(&[150.0, 0.0, 0.0, 20.0, 20.0]), 0);
    }

    #[test]
    fn test_empty_forest_is_invalid() {
        assert!(Estimator::RandomForest(RandomForest { trees: vec![] })
            .validate()
            .is_err());
    }
}
