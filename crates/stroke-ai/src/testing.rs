//! Shared fixtures for unit tests.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use arrow::record_batch::RecordBatch;
use stroke_core::{Gender, PatientRecord, ResidenceType, SmokingStatus, WorkType};

use crate::error::InferenceError;
use crate::loader::{MODEL_FILE_NAME, ModelLoader};
use crate::model::{ClassScore, Model};

/// The sample artifact shipped in `models/`.
pub fn sample_artifact() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("models")
        .join(MODEL_FILE_NAME)
}

pub fn sample_model() -> Arc<dyn Model> {
    ModelLoader::new(sample_artifact()).load().unwrap()
}

/// Every widget at its lowest value, every flag off, first option of each list.
pub fn boundary_min() -> PatientRecord {
    PatientRecord {
        age: 1,
        gender: Gender::Female,
        hypertension: false,
        heart_disease: false,
        avg_glucose_level: 0.0,
        bmi: 0.0,
        smoking_status: SmokingStatus::NeverSmoked,
        residence_type: ResidenceType::Urban,
        work_type: WorkType::Private,
        ever_married: false,
    }
}

/// Every widget at its highest value, every flag on.
pub fn boundary_max() -> PatientRecord {
    PatientRecord {
        age: 120,
        gender: Gender::Male,
        hypertension: true,
        heart_disease: true,
        avg_glucose_level: 300.0,
        bmi: 50.0,
        smoking_status: SmokingStatus::Smokes,
        residence_type: ResidenceType::Rural,
        work_type: WorkType::SelfEmployed,
        ever_married: true,
    }
}

/// Returns the same class for every row; `None` returns no rows at all.
pub struct FixedModel {
    class: Option<i64>,
}

impl FixedModel {
    pub fn new(class: i64) -> Self {
        Self { class: Some(class) }
    }

    pub fn empty() -> Self {
        Self { class: None }
    }
}

impl Model for FixedModel {
    fn name(&self) -> &str {
        "fixed"
    }

    fn predict(&self, batch: &RecordBatch) -> Result<Vec<ClassScore>, InferenceError> {
        Ok(match self.class {
            Some(class) => vec![
                ClassScore {
                    class,
                    probability: None,
                };
                batch.num_rows()
            ],
            None => vec![],
        })
    }
}

/// Fails every call with a fixed message.
pub struct FailingModel {
    message: String,
}

impl FailingModel {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl Model for FailingModel {
    fn name(&self) -> &str {
        "failing"
    }

    fn predict(&self, _batch: &RecordBatch) -> Result<Vec<ClassScore>, InferenceError> {
        Err(InferenceError::Runtime(self.message.clone()))
    }
}

/// Fails the first `failures` calls, then predicts class 0.
pub struct FlakyModel {
    failures: usize,
    calls: AtomicUsize,
}

impl FlakyModel {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Model for FlakyModel {
    fn name(&self) -> &str {
        "flaky"
    }

    fn predict(&self, batch: &RecordBatch) -> Result<Vec<ClassScore>, InferenceError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(InferenceError::Runtime(format!("transient failure {}", n + 1)));
        }
        Ok(vec![
            ClassScore {
                class: 0,
                probability: None,
            };
            batch.num_rows()
        ])
    }
}
