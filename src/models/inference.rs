//! Segmentation inference engine: scale, predict, decode

use crate::error::{ArtifactError, SegmentError};
use crate::feature_extractor::FeatureExtractor;
use crate::models::loader::{ArtifactCache, Artifacts};
use crate::types::advisory::Advisory;
use crate::types::profile::CustomerProfile;
use crate::types::report::{CategoryLabel, SegmentReport};
use std::sync::Arc;
use tracing::{debug, info};

/// Runs customer profiles through the pretrained artifacts.
///
/// Holds the shared, read-only artifacts; safe to call from many tasks.
pub struct InferenceEngine {
    artifacts: Arc<Artifacts>,
    extractor: FeatureExtractor,
}

impl InferenceEngine {
    pub fn new(artifacts: Arc<Artifacts>) -> Self {
        Self {
            artifacts,
            extractor: FeatureExtractor::new(),
        }
    }

    /// Create an engine over cached artifacts, loading them if needed.
    pub fn from_cache(cache: &ArtifactCache) -> Result<Self, ArtifactError> {
        let engine = Self::new(cache.get()?);
        info!(
            model = %engine.model_name(),
            classes = ?engine.labels(),
            "Inference engine initialized"
        );
        Ok(engine)
    }

    pub fn model_name(&self) -> &str {
        self.artifacts.model.name()
    }

    /// Labels the encoder can produce
    pub fn labels(&self) -> &[String] {
        self.artifacts.encoder.classes()
    }

    /// Predict the segment label for one profile.
    ///
    /// The profile is used as given; clamping is the caller's concern.
    pub fn predict(&self, profile: &CustomerProfile) -> Result<CategoryLabel, SegmentError> {
        let features = self.extractor.extract(profile);
        let scaled = self.artifacts.scaler.transform(&features)?;
        let class = self.artifacts.model.predict(&scaled)?;
        let label = self.artifacts.encoder.inverse_transform(class)?;

        debug!(class = class, label = %label, "Profile segmented");
        Ok(label)
    }

    /// Predict and attach advisories. Advisories never change the label.
    pub fn segment(&self, profile: &CustomerProfile) -> Result<SegmentReport, SegmentError> {
        let advisories = Advisory::check(profile);
        for advisory in &advisories {
            info!(advisory = advisory.as_str(), "Advisory raised");
        }

        let label = self.predict(profile)?;
        Ok(SegmentReport::new(label).with_advisories(advisories))
    }

    /// Run inference on a batch of profiles
    pub fn predict_batch(
        &self,
        profiles: &[CustomerProfile],
    ) -> Vec<Result<CategoryLabel, SegmentError>> {
        profiles.iter().map(|p| self.predict(p)).collect()
    }
}
