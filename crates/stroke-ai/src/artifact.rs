//! On-disk model artifact format.
//!
//! An artifact is a JSON document that bundles the preprocessing contract
//! (how each column of the patient table becomes one or more features)
//! with the fitted estimator. Keeping the encoding in the artifact means the
//! form never guesses how categories were encoded at training time.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Artifact format version this build understands.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub format_version: u32,
    /// Probability cut-off for class 1. Without it the estimator's own
    /// decision rule applies.
    #[serde(default)]
    pub threshold: Option<f64>,
    pub features: Vec<FeatureSpec>,
    pub estimator: EstimatorSpec,
}

/// One input column and how it is encoded. Order matters: features are laid
/// out in the order listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSpec {
    /// `(x - mean) / scale`, one output.
    Numeric {
        column: String,
        #[serde(default)]
        mean: f64,
        #[serde(default = "unit_scale")]
        scale: f64,
    },
    /// One output per category, 1.0 for the matching one.
    OneHot {
        column: String,
        categories: Vec<String>,
        /// Encode unseen values as all zeros instead of failing.
        #[serde(default)]
        ignore_unknown: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorSpec {
    #[serde(alias = "logistic_regression")]
    LinearDiscriminant { coefficients: Vec<f64>, intercept: f64 },
    /// Path is relative to the artifact file.
    Onnx {
        path: PathBuf,
        #[serde(default = "default_onnx_input")]
        input: String,
    },
}

fn unit_scale() -> f64 {
    1.0
}

fn default_onnx_input() -> String {
    "float_input".to_string()
}

impl FeatureSpec {
    pub fn column(&self) -> &str {
        match self {
            Self::Numeric { column, .. } | Self::OneHot { column, .. } => column,
        }
    }

    /// Number of encoded outputs.
    pub fn width(&self) -> usize {
        match self {
            Self::Numeric { .. } => 1,
            Self::OneHot { categories, .. } => categories.len(),
        }
    }
}

impl EstimatorSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LinearDiscriminant { .. } => "linear_discriminant",
            Self::Onnx { .. } => "onnx",
        }
    }
}

impl ModelArtifact {
    /// Structural checks that do not depend on the estimator runtime.
    pub fn check(&self) -> Result<(), String> {
        if self.format_version != FORMAT_VERSION {
            return Err(format!(
                "format_version {} is not supported (expected {FORMAT_VERSION})",
                self.format_version
            ));
        }
        if self.features.is_empty() {
            return Err("artifact declares no features".to_string());
        }
        if let Some(t) = self.threshold
            && !(0.0..=1.0).contains(&t)
        {
            return Err(format!("threshold {t} is outside [0, 1]"));
        }

        let mut seen = HashSet::new();
        for feature in &self.features {
            if !seen.insert(feature.column()) {
                return Err(format!("column '{}' is encoded twice", feature.column()));
            }
            match feature {
                FeatureSpec::Numeric {
                    column,
                    mean,
                    scale,
                } => {
                    if !mean.is_finite() || !scale.is_finite() || *scale == 0.0 {
                        return Err(format!(
                            "column '{column}' has invalid scaling (mean {mean}, scale {scale})"
                        ));
                    }
                }
                FeatureSpec::OneHot {
                    column, categories, ..
                } => {
                    if categories.is_empty() {
                        return Err(format!("column '{column}' has no categories"));
                    }
                    let distinct: HashSet<&str> = categories.iter().map(|c| c.as_str()).collect();
                    if distinct.len() != categories.len() {
                        return Err(format!("column '{column}' repeats a category"));
                    }
                }
            }
        }

        if let EstimatorSpec::LinearDiscriminant {
            coefficients,
            intercept,
        } = &self.estimator
        {
            let width = self.width();
            if coefficients.len() != width {
                return Err(format!(
                    "estimator has {} coefficients but the features encode to {width}",
                    coefficients.len()
                ));
            }
            if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                return Err("estimator has non-finite weights".to_string());
            }
        }

        Ok(())
    }

    /// Total encoded width across all features.
    pub fn width(&self) -> usize {
        self.features.iter().map(FeatureSpec::width).sum()
    }
}
