//! Fitted standard scaler

use crate::error::{ArtifactError, SegmentError};
use serde::{Deserialize, Serialize};

/// Standardizes features with a mean and scale learned at training time.
///
/// `z = (x - mean) / scale`, with a zero scale treated as 1.0 so constant
/// training columns pass through centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Build a scaler from fitted parameters, rejecting unusable ones.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ArtifactError> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Check the parameters after deserialization.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.mean.is_empty() {
            return Err(invalid("scaler has no features".to_string()));
        }
        if self.mean.len() != self.scale.len() {
            return Err(invalid(format!(
                "mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if let Some(i) = self
            .mean
            .iter()
            .chain(self.scale.iter())
            .position(|v| !v.is_finite())
        {
            return Err(invalid(format!("non-finite parameter at position {}", i)));
        }
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Apply the fitted transform to one feature vector.
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, SegmentError> {
        if features.len() != self.n_features() {
            return Err(SegmentError::FeatureCount {
                expected: self.n_features(),
                actual: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(&x, (&mean, &scale))| {
                let scale = if scale == 0.0 { 1.0 } else { scale };
                (x - mean) / scale
            })
            .collect())
    }
}

fn invalid(reason: String) -> ArtifactError {
    ArtifactError::Invalid {
        artifact: "scaler",
        reason,
    }
}
