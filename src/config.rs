//! Configuration management for the segmentation service

use anyhow::{Context, Result};
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Which model artifact format to load
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// Random forest exported to JSON tree arrays
    #[default]
    Forest,
    /// Multinomial linear model in JSON
    Linear,
    /// ONNX model run through ONNX Runtime (needs the `onnx` feature)
    Onnx,
}

impl ModelBackend {
    /// File name used when `model_file` is not configured
    pub fn default_file(&self) -> &'static str {
        match self {
            ModelBackend::Forest => "random_forest.json",
            ModelBackend::Linear => "linear_model.json",
            ModelBackend::Onnx => "model.onnx",
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    pub artifacts: ArtifactsConfig,
    pub nats: NatsConfig,
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
}

/// Pretrained artifact locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactsConfig {
    /// Directory containing the artifact files
    pub dir: PathBuf,
    /// Model format
    #[serde(default)]
    pub backend: ModelBackend,
    pub scaler_file: String,
    pub encoder_file: String,
    /// Model file name; defaults per backend
    #[serde(default)]
    pub model_file: Option<String>,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

impl ArtifactsConfig {
    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(&self.scaler_file)
    }

    pub fn encoder_path(&self) -> PathBuf {
        self.dir.join(&self.encoder_file)
    }

    pub fn model_path(&self) -> PathBuf {
        let file = self
            .model_file
            .as_deref()
            .unwrap_or_else(|| self.backend.default_file());
        self.dir.join(file)
    }

    /// Artifacts of the given backend in `dir`, default file names.
    pub fn in_dir<P: AsRef<Path>>(dir: P, backend: ModelBackend) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            backend,
            ..Self::default()
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("artifacts"),
            backend: ModelBackend::Forest,
            scaler_file: "scaler.json".to_string(),
            encoder_file: "label_encoder.json".to_string(),
            model_file: None,
            onnx_threads: default_onnx_threads(),
        }
    }
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming segmentation requests
    pub request_subject: String,
    /// Subject for reports when a request carries no reply subject
    pub report_subject: String,
    /// Queue group so several service instances share the load
    pub queue_group: String,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            url: "nats://localhost:4222".to_string(),
            request_subject: "finseg.segment".to_string(),
            report_subject: "finseg.reports".to_string(),
            queue_group: "finseg".to_string(),
        }
    }
}

/// Service shell configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Maximum requests processed concurrently
    pub workers: usize,
    /// Seconds between metrics summaries
    pub metrics_interval_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            metrics_interval_secs: 30,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path, layered over the defaults.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(
                Config::try_from(&AppConfig::default())
                    .context("Failed to serialize default configuration")?,
            )
            .add_source(File::from(path.as_ref()).required(false))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
