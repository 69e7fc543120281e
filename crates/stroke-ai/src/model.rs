//! The model boundary: anything that turns a patient table into class labels.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use arrow::record_batch::RecordBatch;
use tracing::info;

use crate::artifact::{EstimatorSpec, ModelArtifact};
use crate::encoder::FeatureEncoder;
use crate::error::{InferenceError, LoadError};
use crate::linear::LinearDiscriminant;

/// Raw estimator output for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassScore {
    pub class: i64,
    /// Probability of class 1, when the estimator exposes one.
    pub probability: Option<f64>,
}

/// Descriptive metadata for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub name: String,
    pub estimator: String,
    pub features: Vec<String>,
}

/// A loaded, immutable classifier.
///
/// `predict` receives the raw patient table (one row per patient) and
/// returns one [`ClassScore`] per row. Implementations must not mutate
/// observable state, so a single instance can serve every request of a
/// session behind an `Arc`.
pub trait Model: Send + Sync {
    fn name(&self) -> &str;

    fn predict(&self, batch: &RecordBatch) -> Result<Vec<ClassScore>, InferenceError>;

    fn info(&self) -> ModelInfo {
        ModelInfo {
            name: self.name().to_string(),
            estimator: "opaque".to_string(),
            features: Vec::new(),
        }
    }
}

enum Estimator {
    Linear(LinearDiscriminant),
    #[cfg(feature = "onnx")]
    Onnx(crate::onnx::OnnxEstimator),
}

/// Encoder + estimator pipeline loaded from a JSON artifact.
pub struct StrokeClassifier {
    name: String,
    encoder: FeatureEncoder,
    estimator: Estimator,
    threshold: Option<f64>,
    estimator_kind: &'static str,
}

impl StrokeClassifier {
    /// Load an artifact from `path`.
    ///
    /// ONNX estimators are resolved relative to the artifact's directory.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
            _ => LoadError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let artifact: ModelArtifact =
            serde_json::from_str(&text).map_err(|source| LoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_artifact(artifact, path)
    }

    /// Build from an already-parsed artifact. `path` locates relative
    /// estimator files and names the artifact in errors.
    pub fn from_artifact(artifact: ModelArtifact, path: &Path) -> Result<Self, LoadError> {
        artifact
            .check()
            .map_err(|reason| LoadError::Incompatible {
                path: path.to_path_buf(),
                reason,
            })?;

        let estimator_kind = artifact.estimator.kind();
        let encoder = FeatureEncoder::new(artifact.features);

        let estimator = match artifact.estimator {
            EstimatorSpec::LinearDiscriminant {
                coefficients,
                intercept,
            } => Estimator::Linear(LinearDiscriminant::new(coefficients, intercept)),
            EstimatorSpec::Onnx { path: rel, input } => {
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                open_onnx(path, base.join(rel), input, encoder.width())?
            }
        };

        info!(
            name = %artifact.name,
            estimator = estimator_kind,
            features = encoder.width(),
            path = %path.display(),
            "loaded stroke model"
        );

        Ok(Self {
            name: artifact.name,
            encoder,
            estimator,
            threshold: artifact.threshold,
            estimator_kind,
        })
    }

    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }
}

#[cfg(feature = "onnx")]
fn open_onnx(
    _artifact: &Path,
    model_path: PathBuf,
    input: String,
    width: usize,
) -> Result<Estimator, LoadError> {
    if !model_path.exists() {
        return Err(LoadError::NotFound(model_path));
    }
    crate::onnx::OnnxEstimator::load(&model_path, input, width)
        .map(Estimator::Onnx)
        .map_err(LoadError::Onnx)
}

#[cfg(not(feature = "onnx"))]
fn open_onnx(
    artifact: &Path,
    _model_path: PathBuf,
    _input: String,
    _width: usize,
) -> Result<Estimator, LoadError> {
    Err(LoadError::CapabilityUnavailable {
        path: artifact.to_path_buf(),
        capability: "onnx",
    })
}

impl Model for StrokeClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, batch: &RecordBatch) -> Result<Vec<ClassScore>, InferenceError> {
        let rows = self.encoder.encode(batch)?;
        let mut scores = match &self.estimator {
            Estimator::Linear(lda) => lda.predict(&rows)?,
            #[cfg(feature = "onnx")]
            Estimator::Onnx(onnx) => onnx
                .predict(&rows)
                .map_err(|e| InferenceError::Runtime(format!("{e:#}")))?,
        };

        if let Some(t) = self.threshold {
            for score in &mut scores {
                if let Some(p) = score.probability {
                    score.class = i64::from(p >= t);
                }
            }
        }

        Ok(scores)
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            name: self.name.clone(),
            estimator: self.estimator_kind.to_string(),
            features: self.encoder.feature_names(),
        }
    }
}
