//! Prediction requests against a loaded model.

use std::fmt;

use arrow::record_batch::RecordBatch;
use stroke_core::PatientRecord;
use tracing::{debug, warn};

use crate::error::InferenceError;
use crate::model::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    NoStroke,
    Stroke,
}

impl Label {
    pub fn from_class(class: i64) -> Result<Self, InferenceError> {
        match class {
            0 => Ok(Self::NoStroke),
            1 => Ok(Self::Stroke),
            other => Err(InferenceError::UnexpectedClass(other)),
        }
    }

    pub fn class(&self) -> i64 {
        match self {
            Self::NoStroke => 0,
            Self::Stroke => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoStroke => "No Stroke",
            Self::Stroke => "Stroke",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one prediction request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: Label,
    /// Probability of stroke, when the model exposes one.
    pub probability: Option<f64>,
}

/// Run one prediction for `record`. Every call hits the model; nothing is cached.
pub fn predict(model: &dyn Model, record: &PatientRecord) -> Result<Prediction, InferenceError> {
    let table = record.to_record_batch()?;
    predict_table(model, &table)
}

/// Run one prediction for the first row of an already-assembled patient table.
pub fn predict_table(model: &dyn Model, table: &RecordBatch) -> Result<Prediction, InferenceError> {
    let result = model.predict(table).and_then(|scores| {
        let score = scores.first().ok_or(InferenceError::EmptyOutput)?;
        Ok(Prediction {
            label: Label::from_class(score.class)?,
            probability: score.probability,
        })
    });

    match &result {
        Ok(p) => debug!(model = model.name(), label = %p.label, probability = ?p.probability, "prediction"),
        Err(e) => warn!(model = model.name(), error = %e, "prediction failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingModel, FixedModel, boundary_max, boundary_min, sample_model};
    use stroke_core::schema::SMOKING_STATUS;

    #[test]
    fn label_mapping() {
        assert_eq!(Label::from_class(0).unwrap(), Label::NoStroke);
        assert_eq!(Label::from_class(1).unwrap(), Label::Stroke);
        assert_eq!(Label::Stroke.to_string(), "Stroke");
        assert_eq!(Label::NoStroke.class(), 0);
        assert!(matches!(
            Label::from_class(2),
            Err(InferenceError::UnexpectedClass(2))
        ));
    }

    #[test]
    fn minimum_boundary_record_predicts() {
        let model = sample_model();
        let p = predict(model.as_ref(), &boundary_min()).unwrap();
        assert_eq!(p.label, Label::NoStroke);
        assert!(p.probability.unwrap() < 0.5);
    }

    #[test]
    fn maximum_boundary_record_predicts() {
        let model = sample_model();
        let p = predict(model.as_ref(), &boundary_max()).unwrap();
        assert_eq!(p.label, Label::Stroke);
        assert!(p.probability.unwrap() > 0.5);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let model = sample_model();
        let record = PatientRecord {
            age: 58,
            hypertension: true,
            avg_glucose_level: 187.3,
            bmi: 31.4,
            ..PatientRecord::default()
        };
        let a = predict(model.as_ref(), &record).unwrap();
        let b = predict(model.as_ref(), &record).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn table_missing_encoded_column_fails() {
        let model = sample_model();
        let mut table = PatientRecord::default().to_record_batch().unwrap();
        let idx = table.schema().index_of(SMOKING_STATUS).unwrap();
        table.remove_column(idx);

        let err = predict_table(model.as_ref(), &table).unwrap_err();
        assert!(matches!(err, InferenceError::MissingColumn(ref c) if c == SMOKING_STATUS));
    }

    #[test]
    fn unexpected_class_is_an_error() {
        let model = FixedModel::new(7);
        let err = predict(&model, &PatientRecord::default()).unwrap_err();
        assert!(matches!(err, InferenceError::UnexpectedClass(7)));
    }

    #[test]
    fn empty_output_is_an_error() {
        let model = FixedModel::empty();
        let err = predict(&model, &PatientRecord::default()).unwrap_err();
        assert!(matches!(err, InferenceError::EmptyOutput));
    }

    #[test]
    fn model_error_message_is_preserved() {
        let model = FailingModel::new("feature shape mismatch: expected 19, got 10");
        let err = predict(&model, &PatientRecord::default()).unwrap_err();
        assert_eq!(err.to_string(), "feature shape mismatch: expected 19, got 10");
    }
}
