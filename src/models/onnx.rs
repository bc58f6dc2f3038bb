//! ONNX Runtime classifier backend

use crate::error::{ArtifactError, SegmentError};
use crate::models::classifier::{argmax, check_width, Classifier};
use crate::types::profile::FEATURE_COUNT;
use ort::session::{builder::GraphOptimizationLevel, Session, SessionOutputs};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Classifier exported to ONNX, run through an ORT session.
pub struct OnnxClassifier {
    /// Sessions need exclusive access to run
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxClassifier {
    /// Load an ONNX model from file
    pub fn load<P: AsRef<Path>>(path: P, onnx_threads: usize) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let backend = |e: ort::Error| ArtifactError::Backend(e.to_string());

        ort::init().commit().map_err(backend)?;
        info!(path = %path.display(), threads = onnx_threads, "Loading ONNX model");

        let session = Session::builder()
            .map_err(backend)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(backend)?
            .with_intra_threads(onnx_threads)
            .map_err(backend)?
            .commit_from_file(path)
            .map_err(|e| ArtifactError::Backend(format!("{}: {}", path.display(), e)))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        // classifier exports carry both a label and a probability output
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "output_label".to_string());

        info!(input = %input_name, output = %output_name, "ONNX model loaded");

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    fn extract_class(&self, outputs: &SessionOutputs) -> Result<i64, SegmentError> {
        if let Some(output) = outputs.get(&self.output_name) {
            if let Ok((_, labels)) = output.try_extract_tensor::<i64>() {
                if let Some(&class) = labels.first() {
                    debug!(class = class, "Extracted class from label tensor");
                    return Ok(class);
                }
            }
        }

        // Fallback: argmax over the first probability tensor
        for (name, output) in outputs.iter() {
            if let Ok((_, proba)) = output.try_extract_tensor::<f32>() {
                let proba: Vec<f64> = proba.iter().map(|&p| p as f64).collect();
                if let Some(class) = argmax(&proba) {
                    debug!(output = %name, class = class, "Extracted class from probabilities");
                    return Ok(class as i64);
                }
            }
        }

        Err(SegmentError::Model(
            "no label or probability output found".to_string(),
        ))
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn n_classes(&self) -> Option<usize> {
        None
    }

    fn predict(&self, features: &[f64]) -> Result<i64, SegmentError> {
        check_width(FEATURE_COUNT, features)?;
        let model_err = |e: ort::Error| SegmentError::Model(e.to_string());

        let shape = vec![1_i64, features.len() as i64];
        let data: Vec<f32> = features.iter().map(|&x| x as f32).collect();
        let input_tensor = Tensor::from_array((shape, data)).map_err(model_err)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| SegmentError::Model(format!("Lock error: {}", e)))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(model_err)?;

        self.extract_class(&outputs)
    }
}
