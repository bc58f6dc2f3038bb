//! Random forest evaluated from an exported tree-array artifact
//!
//! Each tree uses the flat layout of a fitted decision tree: parallel
//! `children_left`, `children_right`, `feature`, `threshold` and `value`
//! arrays indexed by node id, root at 0, `-1` marking a leaf.

use crate::error::{ArtifactError, SegmentError};
use crate::models::classifier::{argmax, check_width, Classifier};
use serde::{Deserialize, Serialize};

const LEAF: i64 = -1;

/// One decision tree in flat array form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class counts or weights
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self, index: usize, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err(format!("tree {} has no nodes", index));
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(format!("tree {} has arrays of different lengths", index));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                if right != LEAF {
                    return Err(format!("tree {} node {} has only one child", index, node));
                }
                let value = &self.value[node];
                if value.len() != n_classes {
                    return Err(format!(
                        "tree {} leaf {} has {} class values, expected {}",
                        index,
                        node,
                        value.len(),
                        n_classes
                    ));
                }
                if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return Err(format!("tree {} leaf {} has invalid values", index, node));
                }
                continue;
            }

            // children always come after their parent, so traversal terminates
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!(
                        "tree {} node {} has invalid child {}",
                        index, node, child
                    ));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!(
                    "tree {} node {} splits on unknown feature {}",
                    index, node, feature
                ));
            }
            if self.threshold[node].is_nan() {
                return Err(format!("tree {} node {} has NaN threshold", index, node));
            }
        }
        Ok(())
    }

    /// Class distribution of the leaf reached by `features`, normalized to sum 1.
    fn leaf_distribution(&self, features: &[f64]) -> Vec<f64> {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let feature = self.feature[node] as usize;
            // fitted trees split on float32 inputs
            let x = features[feature] as f32 as f64;
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let value = &self.value[node];
        let total: f64 = value.iter().sum();
        if total > 0.0 {
            value.iter().map(|v| v / total).collect()
        } else {
            vec![0.0; value.len()]
        }
    }
}

/// Forest of decision trees voting by averaged class probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub n_classes: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Check the structure after deserialization.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let invalid = |reason: String| ArtifactError::Invalid {
            artifact: "random forest",
            reason,
        };

        if self.trees.is_empty() {
            return Err(invalid("forest has no trees".to_string()));
        }
        if self.n_classes == 0 {
            return Err(invalid("forest has no classes".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.n_features, self.n_classes)
                .map_err(invalid)?;
        }
        Ok(())
    }

    /// Mean class probabilities over all trees.
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, SegmentError> {
        check_width(self.n_features, features)?;

        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (p, v) in proba.iter_mut().zip(tree.leaf_distribution(features)) {
                *p += v;
            }
        }
        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> Option<usize> {
        Some(self.n_classes)
    }

    fn predict(&self, features: &[f64]) -> Result<i64, SegmentError> {
        let proba = self.predict_proba(features)?;
        argmax(&proba)
            .map(|class| class as i64)
            .ok_or_else(|| SegmentError::Model("empty probability vector".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stump splitting on feature 0 at 0.0: left -> class 0, right -> class 1
    fn stump(left: [f64; 2], right: [f64; 2]) -> DecisionTree {
        DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![0.0, -2.0, -2.0],
            value: vec![vec![5.0, 5.0], left.to_vec(), right.to_vec()],
        }
    }

    fn forest(trees: Vec<DecisionTree>) -> RandomForest {
        RandomForest {
            n_features: 2,
            n_classes: 2,
            trees,
        }
    }

    #[test]
    fn test_split_direction() {
        let forest = forest(vec![stump([4.0, 0.0], [0.0, 4.0])]);
        forest.validate().unwrap();

        // equal to threshold goes left
        assert_eq!(forest.predict(&[0.0, 9.0]).unwrap(), 0);
        assert_eq!(forest.predict(&[-1.0, 9.0]).unwrap(), 0);
        assert_eq!(forest.predict(&[0.5, 9.0]).unwrap(), 1);
    }

    #[test]
    fn test_split_compares_in_float32() {
        let threshold = 0.1f32 as f64;
        let mut tree = stump([1.0, 0.0], [0.0, 1.0]);
        tree.threshold[0] = threshold;
        let forest = forest(vec![tree]);

        // rounds to the threshold in float32, so it goes left
        assert_eq!(forest.predict(&[threshold + 1e-12, 0.0]).unwrap(), 0);
        assert_eq!(forest.predict(&[0.2, 0.0]).unwrap(), 1);
    }

    #[test]
    fn test_probabilities_are_averaged() {
        let forest = forest(vec![
            stump([3.0, 1.0], [0.0, 2.0]),
            stump([1.0, 1.0], [2.0, 0.0]),
        ]);

        let proba = forest.predict_proba(&[-1.0, 0.0]).unwrap();
        assert!((proba[0] - 0.625).abs() < 1e-12);
        assert!((proba[1] - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_tie_goes_to_lowest_class() {
        let forest = forest(vec![stump([1.0, 0.0], [0.0, 1.0]), stump([0.0, 1.0], [1.0, 0.0])]);
        assert_eq!(forest.predict(&[-1.0, 0.0]).unwrap(), 0);
    }

    #[test]
    fn test_wrong_width() {
        let forest = forest(vec![stump([1.0, 0.0], [0.0, 1.0])]);
        assert!(matches!(
            forest.predict(&[1.0]),
            Err(SegmentError::FeatureCount { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_rejects_cycles_and_bad_features() {
        let mut cyclic = stump([1.0, 0.0], [0.0, 1.0]);
        cyclic.children_left[0] = 0;
        assert!(forest(vec![cyclic]).validate().is_err());

        let mut bad_feature = stump([1.0, 0.0], [0.0, 1.0]);
        bad_feature.feature[0] = 5;
        assert!(forest(vec![bad_feature]).validate().is_err());

        let mut bad_leaf = stump([1.0, 0.0], [0.0, 1.0]);
        bad_leaf.value[2] = vec![1.0];
        assert!(forest(vec![bad_leaf]).validate().is_err());

        assert!(forest(vec![]).validate().is_err());
    }
}
