//! Fitted label encoder

use crate::error::{ArtifactError, SegmentError};
use crate::types::report::CategoryLabel;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Bidirectional mapping between class indices and segment names.
///
/// Index `i` decodes to `classes[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, ArtifactError> {
        let encoder = Self { classes };
        encoder.validate()?;
        Ok(encoder)
    }

    /// Check the class list after deserialization.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.classes.is_empty() {
            return Err(ArtifactError::Invalid {
                artifact: "label encoder",
                reason: "no classes".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for class in &self.classes {
            if !seen.insert(class.as_str()) {
                return Err(ArtifactError::Invalid {
                    artifact: "label encoder",
                    reason: format!("duplicate class {:?}", class),
                });
            }
        }
        Ok(())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Label for a predicted class index.
    pub fn inverse_transform(&self, class: i64) -> Result<CategoryLabel, SegmentError> {
        usize::try_from(class)
            .ok()
            .and_then(|i| self.classes.get(i))
            .map(|name| CategoryLabel::new(name.as_str()))
            .ok_or(SegmentError::UnknownClass {
                class,
                known: self.classes.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> LabelEncoder {
        LabelEncoder::new(vec![
            "Balanced".to_string(),
            "Saver".to_string(),
            "Spender".to_string(),
        ])
        .unwrap()
    }

    #[test]
    fn test_inverse_transform() {
        let encoder = encoder();
        assert_eq!(encoder.inverse_transform(0).unwrap().as_str(), "Balanced");
        assert_eq!(encoder.inverse_transform(2).unwrap().as_str(), "Spender");
    }

    #[test]
    fn test_unknown_class() {
        let encoder = encoder();
        assert!(matches!(
            encoder.inverse_transform(3),
            Err(SegmentError::UnknownClass { class: 3, known: 3 })
        ));
        assert!(matches!(
            encoder.inverse_transform(-1),
            Err(SegmentError::UnknownClass { class: -1, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_class_lists() {
        assert!(LabelEncoder::new(vec![]).is_err());
        assert!(LabelEncoder::new(vec!["Saver".to_string(), "Saver".to_string()]).is_err());
    }
}
