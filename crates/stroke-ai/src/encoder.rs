//! Feature encoding: patient table → dense feature rows.

use arrow::array::{Array, Float64Array, LargeStringArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::artifact::FeatureSpec;
use crate::error::InferenceError;

/// Applies an artifact's feature specs to a record batch.
///
/// The patient table arrives with raw values: integer flags, float
/// measurements and the category strings the form shows. Every
/// transformation the estimator relies on happens here.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    features: Vec<FeatureSpec>,
    width: usize,
}

impl FeatureEncoder {
    pub fn new(features: Vec<FeatureSpec>) -> Self {
        let width = features.iter().map(FeatureSpec::width).sum();
        Self { features, width }
    }

    /// Number of values produced per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Human-readable names of the encoded outputs, in order.
    ///
    /// Numeric features keep their column name; one-hot outputs are
    /// `column=category`.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.width);
        for feature in &self.features {
            match feature {
                FeatureSpec::Numeric { column, .. } => names.push(column.clone()),
                FeatureSpec::OneHot {
                    column, categories, ..
                } => names.extend(categories.iter().map(|c| format!("{column}={c}"))),
            }
        }
        names
    }

    /// Encode every row of `batch`. Returns one `Vec` of length [`width`](Self::width) per row.
    pub fn encode(&self, batch: &RecordBatch) -> Result<Vec<Vec<f64>>, InferenceError> {
        let n = batch.num_rows();
        let mut rows = vec![Vec::with_capacity(self.width); n];

        for feature in &self.features {
            let name = feature.column();
            let col = batch
                .column_by_name(name)
                .ok_or_else(|| InferenceError::MissingColumn(name.to_string()))?;

            match feature {
                FeatureSpec::Numeric { mean, scale, .. } => {
                    let values = numeric_column(name, col.as_ref())?;
                    for (row, out) in rows.iter_mut().enumerate() {
                        if values.is_null(row) {
                            return Err(InferenceError::NullValue {
                                column: name.to_string(),
                                row,
                            });
                        }
                        out.push((values.value(row) - mean) / scale);
                    }
                }
                FeatureSpec::OneHot {
                    categories,
                    ignore_unknown,
                    ..
                } => {
                    for (row, out) in rows.iter_mut().enumerate() {
                        let value = get_str(name, col.as_ref(), row)?;
                        let hit = categories.iter().position(|c| c == value);
                        if hit.is_none() && !ignore_unknown {
                            return Err(InferenceError::UnknownCategory {
                                column: name.to_string(),
                                value: value.to_string(),
                                known: categories.join(", "),
                            });
                        }
                        out.extend((0..categories.len()).map(|i| {
                            if Some(i) == hit { 1.0 } else { 0.0 }
                        }));
                    }
                }
            }
        }

        Ok(rows)
    }
}

// ── Arrow extraction helpers ──

/// Cast any numeric column to Float64.
fn numeric_column(name: &str, col: &dyn Array) -> Result<Float64Array, InferenceError> {
    if !col.data_type().is_numeric() {
        return Err(InferenceError::ColumnType {
            column: name.to_string(),
            actual: col.data_type().clone(),
            expected: "a numeric type",
        });
    }
    let values = cast(col, &DataType::Float64)?;
    values
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| InferenceError::ColumnType {
            column: name.to_string(),
            actual: values.data_type().clone(),
            expected: "Float64",
        })
}

/// Extract a string value (handles Utf8 and LargeUtf8).
fn get_str<'a>(name: &str, col: &'a dyn Array, row: usize) -> Result<&'a str, InferenceError> {
    if col.is_null(row) {
        return Err(InferenceError::NullValue {
            column: name.to_string(),
            row,
        });
    }
    if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
        return Ok(arr.value(row));
    }
    if let Some(arr) = col.as_any().downcast_ref::<LargeStringArray>() {
        return Ok(arr.value(row));
    }
    Err(InferenceError::ColumnType {
        column: name.to_string(),
        actual: col.data_type().clone(),
        expected: "Utf8",
    })
}
