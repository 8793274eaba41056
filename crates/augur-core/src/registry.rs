//! Model registry: name → loaded session, with a process-lifetime cache.
//!
//! First load for a name reads the model from disk; every later request for
//! that name reuses the cached handle. The mutex is held across the whole
//! lookup-or-load, so concurrent first loads serialize and exactly one load
//! happens per name. No eviction: the expected cardinality is tens of
//! models per process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{AugurError, AugurResult};
use crate::model::ClassifierModel;

/// Resolves model names to loaded, shared [`ClassifierModel`] handles.
pub struct ModelRegistry {
    model_dir: PathBuf,
    models: Mutex<HashMap<String, Arc<ClassifierModel>>>,
}

impl ModelRegistry {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            models: Mutex::new(HashMap::new()),
        }
    }

    /// Path of the model file for `model_name`.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(format!("{model_name}.onnx"))
    }

    /// The configured model directory.
    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Return the cached handle for `model_name`, loading it on first use.
    pub fn get_or_load(&self, model_name: &str) -> AugurResult<Arc<ClassifierModel>> {
        let path = self.model_path(model_name);
        if !path.exists() {
            return Err(AugurError::model_not_found(model_name));
        }

        let mut models = self
            .models
            .lock()
            .map_err(|_| AugurError::internal("model registry lock poisoned"))?;

        if let Some(model) = models.get(model_name) {
            return Ok(Arc::clone(model));
        }

        let model = Arc::new(ClassifierModel::load(&path)?);
        models.insert(model_name.to_string(), Arc::clone(&model));
        log::info!("loaded model: {model_name}");
        Ok(model)
    }

    /// Number of models currently cached.
    pub fn loaded_count(&self) -> usize {
        self.models.lock().map(|m| m.len()).unwrap_or(0)
    }
}
