//! ONNX Runtime estimator for classifiers exported with skl2onnx.
//!
//! The session takes the already-encoded feature matrix as a single
//! `[batch, width]` float tensor. The first output is the int64 `label`
//! tensor; a `probabilities` output (exported with `zipmap=False`) is read
//! when present.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tracing::info;

use crate::model::ClassScore;

pub struct OnnxEstimator {
    session: Mutex<Session>,
    input: String,
    width: usize,
}

impl OnnxEstimator {
    /// Open an ONNX model file expecting `width` features on input `input`.
    pub fn load(model_path: &Path, input: String, width: usize) -> anyhow::Result<Self> {
        anyhow::ensure!(model_path.exists(), "{model_path:?} not found");

        let session = Session::builder()?.commit_from_file(model_path)?;

        info!(model = %model_path.display(), input = %input, width, "loaded onnx estimator");
        Ok(Self {
            session: Mutex::new(session),
            input,
            width,
        })
    }

    pub fn predict(&self, rows: &[Vec<f64>]) -> anyhow::Result<Vec<ClassScore>> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let batch_size = rows.len();
        let mut data = Vec::with_capacity(batch_size * self.width);
        for row in rows {
            anyhow::ensure!(
                row.len() == self.width,
                "row has {} features, model expects {}",
                row.len(),
                self.width
            );
            data.extend(row.iter().map(|&v| v as f32));
        }

        let shape = [batch_size as i64, self.width as i64];
        let tensor = Tensor::from_array((shape, data.into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("onnx session lock poisoned"))?;
        let outputs = session.run(ort::inputs![self.input.as_str() => tensor])?;

        let (_, labels) = outputs[0].try_extract_tensor::<i64>()?;
        anyhow::ensure!(
            labels.len() == batch_size,
            "model returned {} labels for {batch_size} rows",
            labels.len()
        );

        // [batch, 2] class probabilities; column 1 is the positive class.
        let probabilities = match outputs.get("probabilities") {
            Some(value) => {
                let (_, probs) = value.try_extract_tensor::<f32>()?;
                (probs.len() == batch_size * 2).then(|| probs.to_vec())
            }
            None => None,
        };

        Ok(labels
            .iter()
            .enumerate()
            .map(|(i, &class)| ClassScore {
                class,
                probability: probabilities.as_ref().map(|p| f64::from(p[i * 2 + 1])),
            })
            .collect())
    }
}
