//! Feature extraction for segmentation model inference.
//!
//! Turns a customer profile into the raw feature vector the scaler was
//! fit on. No engineered features: the artifacts consume the form fields
//! as they are.

use crate::types::profile::{CustomerProfile, FEATURE_COUNT, FIELDS};

/// Feature extractor that transforms profiles into model input features.
///
/// Features are extracted in the exact order the scaler and model were fit on.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the raw feature vector from a profile.
    pub fn extract(&self, profile: &CustomerProfile) -> Vec<f64> {
        profile.values().to_vec()
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names (matching training order).
    pub fn feature_names(&self) -> Vec<&'static str> {
        FIELDS.iter().map(|f| f.name).collect()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
