//! Init-once model loading.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::error::LoadError;
use crate::model::{Model, StrokeClassifier};

/// Artifact file name expected next to the executable.
pub const MODEL_FILE_NAME: &str = "stroke_model.json";

/// Default artifact location: beside the running executable.
pub fn default_model_path() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    Ok(model_path_beside(&exe))
}

/// Artifact location for an entry point at `entry`.
pub fn model_path_beside(entry: &Path) -> PathBuf {
    entry
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(MODEL_FILE_NAME)
}

/// Loads the artifact at a fixed path at most once.
///
/// A successful load is cached for the lifetime of the loader and every
/// later call returns the same `Arc`. A failed load is not cached, so a
/// fixed artifact can be picked up by a new session without a new loader.
pub struct ModelLoader {
    path: PathBuf,
    model: OnceLock<Arc<dyn Model>>,
}

impl ModelLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            model: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    pub fn load(&self) -> Result<Arc<dyn Model>, LoadError> {
        if let Some(model) = self.model.get() {
            return Ok(Arc::clone(model));
        }
        let loaded: Arc<dyn Model> = Arc::new(StrokeClassifier::load(&self.path)?);
        Ok(Arc::clone(self.model.get_or_init(|| loaded)))
    }
}
