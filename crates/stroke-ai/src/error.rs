use std::path::PathBuf;

use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use thiserror::Error;

/// Failure to bring a model artifact into memory. Fatal for the session.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("model file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("incompatible model {}: {reason}", path.display())]
    Incompatible { path: PathBuf, reason: String },

    #[error(
        "model {} requires the `{capability}` capability, which this build does not include",
        path.display()
    )]
    CapabilityUnavailable {
        path: PathBuf,
        capability: &'static str,
    },

    #[cfg(feature = "onnx")]
    #[error("onnx runtime: {0:#}")]
    Onnx(anyhow::Error),
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Failure of a single prediction call. The session stays usable.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("building input table: {0}")]
    Arrow(#[from] ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' has type {actual:?}, expected {expected}")]
    ColumnType {
        column: String,
        actual: DataType,
        expected: &'static str,
    },

    #[error("column '{column}' is null at row {row}")]
    NullValue { column: String, row: usize },

    #[error("column '{column}' has unknown category {value:?} (known: {known})")]
    UnknownCategory {
        column: String,
        value: String,
        known: String,
    },

    #[error("estimator expects {expected} features, got {actual}")]
    FeatureWidth { expected: usize, actual: usize },

    #[error("model returned no prediction")]
    EmptyOutput,

    #[error("model returned class {0}, expected 0 or 1")]
    UnexpectedClass(i64),

    #[error("{0}")]
    Runtime(String),
}
