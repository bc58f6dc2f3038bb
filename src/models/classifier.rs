//! Model seam: anything mapping a scaled feature vector to one class index

use crate::error::SegmentError;

/// A pretrained classifier treated as a black box.
///
/// Implementations must be pure with respect to `predict`: the same input
/// always yields the same class.
pub trait Classifier: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Input width the model was fit on
    fn n_features(&self) -> usize;

    /// Number of classes, when the model format records it
    fn n_classes(&self) -> Option<usize>;

    /// Predict the class index for one scaled feature vector
    fn predict(&self, features: &[f64]) -> Result<i64, SegmentError>;
}

/// Index of the largest value; ties go to the lowest index.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

pub(crate) fn check_width(expected: usize, features: &[f64]) -> Result<(), SegmentError> {
    if features.len() != expected {
        return Err(SegmentError::FeatureCount {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}
