//! Arrow schema for the single-row table handed to the model.
//!
//! Column names and value spellings match the training data, so a model
//! artifact can address columns by the names it was fitted with
//! (note `Residence_type`).

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use tracing::trace;

use crate::record::{PatientRecord, yes_no};

pub const AGE: &str = "age";
pub const GENDER: &str = "gender";
pub const HYPERTENSION: &str = "hypertension";
pub const HEART_DISEASE: &str = "heart_disease";
pub const AVG_GLUCOSE_LEVEL: &str = "avg_glucose_level";
pub const BMI: &str = "bmi";
pub const SMOKING_STATUS: &str = "smoking_status";
pub const RESIDENCE_TYPE: &str = "Residence_type";
pub const WORK_TYPE: &str = "work_type";
pub const EVER_MARRIED: &str = "ever_married";

/// Column order of the patient table.
pub const COLUMNS: [&str; 10] = [
    AGE,
    GENDER,
    HYPERTENSION,
    HEART_DISEASE,
    AVG_GLUCOSE_LEVEL,
    BMI,
    SMOKING_STATUS,
    RESIDENCE_TYPE,
    WORK_TYPE,
    EVER_MARRIED,
];

/// Schema for patient records: integer flags, float measurements, Utf8 categories.
pub fn patient_schema() -> Schema {
    Schema::new(vec![
        Field::new(AGE, DataType::Int64, false),
        Field::new(GENDER, DataType::Int64, false),
        Field::new(HYPERTENSION, DataType::Int64, false),
        Field::new(HEART_DISEASE, DataType::Int64, false),
        Field::new(AVG_GLUCOSE_LEVEL, DataType::Float64, false),
        Field::new(BMI, DataType::Float64, false),
        Field::new(SMOKING_STATUS, DataType::Utf8, false),
        Field::new(RESIDENCE_TYPE, DataType::Utf8, false),
        Field::new(WORK_TYPE, DataType::Utf8, false),
        Field::new(EVER_MARRIED, DataType::Utf8, false),
    ])
}

impl PatientRecord {
    /// Build the single-row table the model consumes.
    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let schema: SchemaRef = Arc::new(patient_schema());
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(vec![i64::from(self.age)])),
            Arc::new(Int64Array::from(vec![self.gender.flag()])),
            Arc::new(Int64Array::from(vec![i64::from(self.hypertension)])),
            Arc::new(Int64Array::from(vec![i64::from(self.heart_disease)])),
            Arc::new(Float64Array::from(vec![self.avg_glucose_level])),
            Arc::new(Float64Array::from(vec![self.bmi])),
            Arc::new(StringArray::from(vec![self.smoking_status.as_str()])),
            Arc::new(StringArray::from(vec![self.residence_type.as_str()])),
            Arc::new(StringArray::from(vec![self.work_type.as_str()])),
            Arc::new(StringArray::from(vec![yes_no(self.ever_married)])),
        ];
        trace!(age = self.age, work_type = %self.work_type, "assembled patient table");
        RecordBatch::try_new(schema, columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Gender, WorkType};
    use arrow::array::Array;

    #[test]
    fn schema_has_expected_fields() {
        let schema = patient_schema();
        assert_eq!(schema.fields().len(), 10);
        for name in COLUMNS {
            assert!(schema.field_with_name(name).is_ok(), "missing {name}");
        }
        assert_eq!(
            schema.field_with_name(RESIDENCE_TYPE).unwrap().data_type(),
            &DataType::Utf8
        );
    }

    #[test]
    fn record_batch_is_single_row() {
        let batch = PatientRecord::default().to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.num_columns(), 10);
        let names: Vec<String> = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        assert_eq!(names, COLUMNS);
    }

    #[test]
    fn record_batch_encodes_flags_and_strings() {
        let record = PatientRecord {
            age: 67,
            gender: Gender::Female,
            hypertension: true,
            heart_disease: false,
            avg_glucose_level: 228.69,
            bmi: 36.6,
            work_type: WorkType::SelfEmployed,
            ever_married: true,
            ..PatientRecord::default()
        };
        let batch = record.to_record_batch().unwrap();

        let ints = |name: &str| {
            batch
                .column_by_name(name)
                .unwrap()
                .as_any()
                .downcast_ref::<Int64Array>()
                .unwrap()
                .value(0)
        };
        let text = |name: &str| {
            batch
                .column_by_name(name)
                .unwrap()
                .as_any()
                .downcast_ref::<StringArray>()
                .unwrap()
                .value(0)
                .to_string()
        };

        assert_eq!(ints(AGE), 67);
        assert_eq!(ints(GENDER), 0);
        assert_eq!(ints(HYPERTENSION), 1);
        assert_eq!(ints(HEART_DISEASE), 0);
        assert_eq!(text(WORK_TYPE), "Self-employed");
        assert_eq!(text(EVER_MARRIED), "Yes");

        let glucose = batch.column_by_name(AVG_GLUCOSE_LEVEL).unwrap();
        assert!(!glucose.is_null(0));
    }
}
