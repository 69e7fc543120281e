//! Two-class linear discriminant.
//!
//! Covers fitted LDA and logistic-regression models: both reduce to a
//! weight vector and an intercept for the binary case.

use crate::error::InferenceError;
use crate::model::ClassScore;

#[derive(Debug, Clone)]
pub struct LinearDiscriminant {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearDiscriminant {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub fn width(&self) -> usize {
        self.coefficients.len()
    }

    /// Signed distance from the decision boundary; positive means class 1.
    pub fn decision(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.coefficients.len() {
            return Err(InferenceError::FeatureWidth {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }
        let dot: f64 = features
            .iter()
            .zip(&self.coefficients)
            .map(|(x, w)| x * w)
            .sum();
        Ok(dot + self.intercept)
    }

    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<ClassScore>, InferenceError> {
        rows.iter()
            .map(|row| {
                let d = self.decision(row)?;
                Ok(ClassScore {
                    class: i64::from(d > 0.0),
                    probability: Some(sigmoid(d)),
                })
            })
            .collect()
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
