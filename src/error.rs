//! Error types for artifact loading and segmentation

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load the pretrained artifacts. Always fatal for the process.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("artifact not found: {}", path.display())]
    Missing { path: PathBuf },
    #[error("failed to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed artifact {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {artifact}: {reason}")]
    Invalid {
        artifact: &'static str,
        reason: String,
    },
    #[error("artifacts are not fit-compatible: {0}")]
    Incompatible(String),
    #[error("model backend unavailable: {0}")]
    Backend(String),
}

/// Failure while running a profile through the pipeline.
#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
    #[error("model predicted class {class}, encoder only knows {known} classes")]
    UnknownClass { class: i64, known: usize },
    #[error("model inference failed: {0}")]
    Model(String),
}
