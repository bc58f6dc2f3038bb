//! Customer Financial Segmentation Library
//!
//! Runs a bank customer's eight numeric attributes through a pretrained
//! scaler, classifier and label encoder, and reports the segment label
//! ("Saver", "Balanced", "Spender") with non-blocking advisories.

pub mod config;
pub mod consumer;
pub mod error;
pub mod feature_extractor;
pub mod form;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod producer;
pub mod service;
pub mod types;

pub use config::AppConfig;
pub use consumer::ProfileConsumer;
pub use error::{ArtifactError, SegmentError};
pub use feature_extractor::FeatureExtractor;
pub use models::inference::InferenceEngine;
pub use models::loader::{ArtifactCache, Artifacts};
pub use producer::ReportProducer;
pub use types::{
    advisory::Advisory,
    profile::{CustomerProfile, ProfileInput},
    report::SegmentReport,
};
