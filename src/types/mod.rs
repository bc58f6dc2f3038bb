//! Type definitions for the segmentation pipeline

pub mod advisory;
pub mod profile;
pub mod report;

pub use advisory::{Advisory, Severity};
pub use profile::{CustomerProfile, FieldSpec, ProfileInput, FEATURE_COUNT, FIELDS};
pub use report::{CategoryLabel, SegmentReport, CATEGORY_GUIDE};
