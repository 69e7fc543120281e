//! Stroke model boundary: artifact loading, feature encoding, inference.

pub mod artifact;
mod encoder;
mod error;
mod invoker;
mod linear;
mod loader;
mod model;
#[cfg(feature = "onnx")]
mod onnx;
mod session;
#[cfg(test)]
mod testing;

pub use artifact::{EstimatorSpec, FeatureSpec, ModelArtifact};
pub use encoder::FeatureEncoder;
pub use error::{InferenceError, LoadError};
pub use invoker::{Label, Prediction, predict, predict_table};
pub use linear::LinearDiscriminant;
pub use loader::{MODEL_FILE_NAME, ModelLoader, default_model_path, model_path_beside};
pub use model::{ClassScore, Model, ModelInfo, StrokeClassifier};
pub use session::{Session, SessionError};
