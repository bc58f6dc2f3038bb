//! Artifact loader and process-wide artifact cache

use crate::config::{ArtifactsConfig, ModelBackend};
use crate::error::ArtifactError;
use crate::models::classifier::Classifier;
use crate::models::encoder::LabelEncoder;
use crate::models::forest::RandomForest;
use crate::models::linear::LinearModel;
use crate::models::scaler::StandardScaler;
use crate::types::profile::FEATURE_COUNT;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, info};

/// The three pretrained artifacts, fit together. Never mutated after load.
pub struct Artifacts {
    pub scaler: StandardScaler,
    pub model: Box<dyn Classifier>,
    pub encoder: LabelEncoder,
}

impl Artifacts {
    /// Assemble artifacts, checking that they were fit on compatible data.
    pub fn new(
        scaler: StandardScaler,
        model: Box<dyn Classifier>,
        encoder: LabelEncoder,
    ) -> Result<Self, ArtifactError> {
        if scaler.n_features() != FEATURE_COUNT {
            return Err(ArtifactError::Incompatible(format!(
                "scaler expects {} features, profiles have {}",
                scaler.n_features(),
                FEATURE_COUNT
            )));
        }
        if model.n_features() != scaler.n_features() {
            return Err(ArtifactError::Incompatible(format!(
                "model expects {} features, scaler produces {}",
                model.n_features(),
                scaler.n_features()
            )));
        }
        if let Some(n_classes) = model.n_classes() {
            if n_classes != encoder.n_classes() {
                return Err(ArtifactError::Incompatible(format!(
                    "model has {} classes, encoder has {}",
                    n_classes,
                    encoder.n_classes()
                )));
            }
        }

        Ok(Self {
            scaler,
            model,
            encoder,
        })
    }
}

/// Loader for pretrained artifacts
pub struct ModelLoader {
    config: ArtifactsConfig,
}

impl ModelLoader {
    pub fn new(config: ArtifactsConfig) -> Self {
        Self { config }
    }

    /// Load scaler, model and encoder. Any failure is fatal; there is no
    /// partial result.
    pub fn load_all(&self) -> Result<Artifacts, ArtifactError> {
        info!(
            dir = %self.config.dir.display(),
            backend = ?self.config.backend,
            "Loading artifacts"
        );

        let scaler: StandardScaler = read_json(&self.config.scaler_path())?;
        scaler.validate()?;

        let encoder: LabelEncoder = read_json(&self.config.encoder_path())?;
        encoder.validate()?;

        let model = self.load_model()?;

        let artifacts = Artifacts::new(scaler, model, encoder)?;
        info!(
            model = %artifacts.model.name(),
            classes = ?artifacts.encoder.classes(),
            "Artifacts loaded successfully"
        );
        Ok(artifacts)
    }

    fn load_model(&self) -> Result<Box<dyn Classifier>, ArtifactError> {
        let path = self.config.model_path();

        match self.config.backend {
            ModelBackend::Forest => {
                let forest: RandomForest = read_json(&path)?;
                forest.validate()?;
                debug!(trees = forest.trees.len(), "Random forest loaded");
                Ok(Box::new(forest))
            }
            ModelBackend::Linear => {
                let model: LinearModel = read_json(&path)?;
                model.validate()?;
                Ok(Box::new(model))
            }
            ModelBackend::Onnx => self.load_onnx(&path),
        }
    }

    #[cfg(feature = "onnx")]
    fn load_onnx(&self, path: &Path) -> Result<Box<dyn Classifier>, ArtifactError> {
        ensure_exists(path)?;
        let model = crate::models::onnx::OnnxClassifier::load(path, self.config.onnx_threads)?;
        Ok(Box::new(model))
    }

    #[cfg(not(feature = "onnx"))]
    fn load_onnx(&self, _path: &Path) -> Result<Box<dyn Classifier>, ArtifactError> {
        Err(ArtifactError::Backend(
            "onnx backend requires building with the `onnx` feature".to_string(),
        ))
    }
}

/// Caches the artifacts for the lifetime of the process.
///
/// The first `get` loads from disk; later calls return the same `Arc`
/// without I/O. Concurrent first calls load once.
pub struct ArtifactCache {
    loader: ModelLoader,
    artifacts: OnceLock<Arc<Artifacts>>,
    init: Mutex<()>,
    loads: AtomicUsize,
}

impl ArtifactCache {
    pub fn new(config: ArtifactsConfig) -> Self {
        Self {
            loader: ModelLoader::new(config),
            artifacts: OnceLock::new(),
            init: Mutex::new(()),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn get(&self) -> Result<Arc<Artifacts>, ArtifactError> {
        if let Some(artifacts) = self.artifacts.get() {
            return Ok(artifacts.clone());
        }

        // a poisoned guard still serializes loaders; the cell holds the state
        let _guard = self.init.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(artifacts) = self.artifacts.get() {
            return Ok(artifacts.clone());
        }

        self.loads.fetch_add(1, Ordering::Relaxed);
        let loaded = Arc::new(self.loader.load_all()?);
        Ok(self.artifacts.get_or_init(|| loaded).clone())
    }

    /// Number of times artifacts were read from disk
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    pub fn is_loaded(&self) -> bool {
        self.artifacts.get().is_some()
    }
}

fn ensure_exists(path: &Path) -> Result<(), ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    ensure_exists(path)?;
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}
