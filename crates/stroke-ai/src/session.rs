//! Interactive session state: a model gate in front of the invoker.
//!
//! A session starts by loading the model. On success it is `Ready` and
//! serves any number of independent prediction requests; on failure it is
//! `Halted` and refuses every request until the process is restarted with a
//! usable artifact.

use std::sync::Arc;

use stroke_core::PatientRecord;
use thiserror::Error;
use tracing::error;

use crate::error::{InferenceError, LoadError};
use crate::invoker::{self, Prediction};
use crate::loader::ModelLoader;
use crate::model::Model;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The model never loaded; no prediction is possible in this session.
    #[error("session halted: {0}")]
    Halted(String),

    /// This request failed; the session is still usable.
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

pub enum Session {
    Ready(Arc<dyn Model>),
    Halted(LoadError),
}

impl Session {
    /// Load the model through `loader` and enter `Ready` or `Halted`.
    pub fn start(loader: &ModelLoader) -> Self {
        match loader.load() {
            Ok(model) => Self::Ready(model),
            Err(e) => {
                error!(path = %loader.path().display(), error = %e, "model load failed, halting session");
                Self::Halted(e)
            }
        }
    }

    /// A ready session over an already-loaded model.
    pub fn with_model(model: Arc<dyn Model>) -> Self {
        Self::Ready(model)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn model(&self) -> Option<&Arc<dyn Model>> {
        match self {
            Self::Ready(model) => Some(model),
            Self::Halted(_) => None,
        }
    }

    pub fn load_error(&self) -> Option<&LoadError> {
        match self {
            Self::Ready(_) => None,
            Self::Halted(e) => Some(e),
        }
    }

    /// Serve one prediction request.
    pub fn predict(&self, record: &PatientRecord) -> Result<Prediction, SessionError> {
        match self {
            Self::Ready(model) => Ok(invoker::predict(model.as_ref(), record)?),
            Self::Halted(e) => Err(SessionError::Halted(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::Label;
    use crate::testing::{FlakyModel, boundary_max, boundary_min, sample_artifact};
    use std::fs;

    #[test]
    fn valid_artifact_starts_ready() {
        let loader = ModelLoader::new(sample_artifact());
        let session = Session::start(&loader);
        assert!(session.is_ready());
        assert!(session.load_error().is_none());
        assert!(session.predict(&boundary_min()).is_ok());
    }

    #[test]
    fn sessions_share_the_loaders_model() {
        let loader = ModelLoader::new(sample_artifact());
        let a = Session::start(&loader);
        let b = Session::start(&loader);
        assert!(Arc::ptr_eq(a.model().unwrap(), b.model().unwrap()));
    }

    #[test]
    fn missing_artifact_halts() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ModelLoader::new(dir.path().join("stroke_model.json"));
        let session = Session::start(&loader);

        assert!(!session.is_ready());
        assert!(session.model().is_none());
        assert!(session.load_error().unwrap().is_not_found());

        for record in [boundary_min(), boundary_max()] {
            let err = session.predict(&record).unwrap_err();
            assert!(matches!(err, SessionError::Halted(_)));
            assert!(err.to_string().contains("stroke_model.json"), "{err}");
        }
    }

    #[test]
    fn corrupt_artifact_halts_with_cause() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stroke_model.json");
        fs::write(&path, b"{\"name\": \"truncated\", \"format_vers").unwrap();

        let session = Session::start(&ModelLoader::new(&path));
        let err = session.load_error().unwrap();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().contains("EOF"), "{err}");
        assert!(session.predict(&boundary_min()).is_err());
    }

    #[test]
    fn inference_failure_keeps_session_usable() {
        let model = Arc::new(FlakyModel::new(1));
        let session = Session::with_model(model.clone());

        let err = session.predict(&boundary_min()).unwrap_err();
        assert!(matches!(err, SessionError::Inference(_)));
        assert_eq!(err.to_string(), "transient failure 1");

        assert!(session.is_ready());
        let p = session.predict(&boundary_min()).unwrap();
        assert_eq!(p.label, Label::NoStroke);
        assert_eq!(model.calls(), 2);
    }

    #[test]
    fn every_request_calls_the_model() {
        let model = Arc::new(FlakyModel::new(0));
        let session = Session::with_model(model.clone());
        let record = boundary_max();
        let a = session.predict(&record).unwrap();
        let b = session.predict(&record).unwrap();
        assert_eq!(a, b);
        assert_eq!(model.calls(), 2);
    }
}
