//! Multinomial linear classifier

use crate::error::{ArtifactError, SegmentError};
use crate::models::classifier::{argmax, check_width, Classifier};
use serde::{Deserialize, Serialize};

/// One weight row and intercept per class; predicts the class with the
/// highest decision value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearModel {
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let invalid = |reason: String| ArtifactError::Invalid {
            artifact: "linear model",
            reason,
        };

        if self.coef.is_empty() {
            return Err(invalid("no classes".to_string()));
        }
        if self.coef.len() != self.intercept.len() {
            return Err(invalid(format!(
                "{} coefficient rows but {} intercepts",
                self.coef.len(),
                self.intercept.len()
            )));
        }
        let width = self.coef[0].len();
        if width == 0 || self.coef.iter().any(|row| row.len() != width) {
            return Err(invalid("coefficient rows differ in width".to_string()));
        }
        if self
            .coef
            .iter()
            .flatten()
            .chain(self.intercept.iter())
            .any(|v| !v.is_finite())
        {
            return Err(invalid("non-finite parameter".to_string()));
        }
        Ok(())
    }

    /// Decision value per class.
    pub fn decision_function(&self, features: &[f64]) -> Result<Vec<f64>, SegmentError> {
        check_width(self.n_features(), features)?;

        Ok(self
            .coef
            .iter()
            .zip(self.intercept.iter())
            .map(|(row, b)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect())
    }
}

impl Classifier for LinearModel {
    fn name(&self) -> &str {
        "linear"
    }

    fn n_features(&self) -> usize {
        self.coef.first().map(|row| row.len()).unwrap_or(0)
    }

    fn n_classes(&self) -> Option<usize> {
        Some(self.coef.len())
    }

    fn predict(&self, features: &[f64]) -> Result<i64, SegmentError> {
        let scores = self.decision_function(features)?;
        argmax(&scores)
            .map(|class| class as i64)
            .ok_or_else(|| SegmentError::Model("empty decision vector".to_string()))
    }
}
