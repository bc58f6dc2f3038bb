//! Segmentation results and the static category guide

use crate::types::advisory::Advisory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Segments the shipped models are trained on, with their guide text.
pub const CATEGORY_GUIDE: [(&str, &str); 3] = [
    (
        "Saver",
        "Individuals who maintain low spending, are budget conscious, and manage finances with caution.",
    ),
    (
        "Balanced",
        "Moderate and stable spending patterns with a healthy balance between expenses and savings.",
    ),
    (
        "Spender",
        "High spending tendencies, often linked to premium lifestyle and higher credit utilization.",
    ),
];

/// Segment label decoded from the model's class index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryLabel(String);

impl CategoryLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Guide text for this label, if it is one of the known segments.
    pub fn guide(&self) -> Option<&'static str> {
        CATEGORY_GUIDE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&self.0))
            .map(|(_, text)| *text)
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of segmenting one customer profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentReport {
    /// Unique report identifier
    pub request_id: String,

    /// Predicted segment
    pub label: CategoryLabel,

    /// Advisories raised on the input, in display order
    pub advisories: Vec<Advisory>,

    /// Report generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl SegmentReport {
    pub fn new(label: CategoryLabel) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            label,
            advisories: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Attach advisories to the report
    pub fn with_advisories(mut self, advisories: Vec<Advisory>) -> Self {
        self.advisories = advisories;
        self
    }

    pub fn has_advisory(&self, advisory: Advisory) -> bool {
        self.advisories.contains(&advisory)
    }
}
