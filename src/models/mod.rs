//! Pretrained artifacts and the inference engine

pub mod classifier;
pub mod encoder;
pub mod forest;
pub mod inference;
pub mod linear;
pub mod loader;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod scaler;

pub use classifier::Classifier;
pub use encoder::LabelEncoder;
pub use forest::{DecisionTree, RandomForest};
pub use inference::InferenceEngine;
pub use linear::LinearModel;
pub use loader::{ArtifactCache, Artifacts, ModelLoader};
pub use scaler::StandardScaler;
