//! Model inference service
//!
//! Owns the loaded model and adapts single feature vectors to the model's
//! batch calling convention.

use super::model::{ModelArtifact, ModelError, Regressor};
use crate::config::ModelSettings;
use ndarray::Array2;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors from loading a model or running inference
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Model file '{}' not found", .path.display())]
    ModelNotFound { path: PathBuf },

    #[error("Failed to load model '{}': {source}", .path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("Model is not loaded. Load a model before predicting.")]
    ModelNotLoaded,

    #[error("Prediction failed: {0}")]
    Prediction(#[from] ModelError),
}

/// Summary of the loaded model
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub n_features: usize,
    pub source: Option<PathBuf>,
}

/// Holds the model used to serve predictions.
///
/// Built once at startup and shared read-only between requests. The model
/// reference is either unset or fully loaded, never in between.
#[derive(Debug)]
pub struct ModelInferenceService {
    model_dir: PathBuf,
    model_name: String,
    model: Option<Arc<dyn Regressor>>,
    source: Option<PathBuf>,
}

impl ModelInferenceService {
    /// Create an unloaded service for the configured model location
    pub fn new(settings: &ModelSettings) -> Self {
        Self {
            model_dir: settings.model_path.clone(),
            model_name: settings.model_name.clone(),
            model: None,
            source: None,
        }
    }

    /// Use an already constructed model instead of loading one from disk
    pub fn with_model(mut self, model: Arc<dyn Regressor>) -> Self {
        self.model = Some(model);
        self.source = None;
        self
    }

    /// Full path of the configured model file
    pub fn model_file(&self) -> PathBuf {
        self.model_dir.join(&self.model_name)
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Load the configured model file, replacing any held model.
    ///
    /// On failure the held model is cleared.
    pub fn load_model(&mut self) -> Result<(), InferenceError> {
        self.model = None;
        self.source = None;

        let path = self.model_file();
        if !path.is_file() {
            error!(model = %path.display(), "Model file not found");
            return Err(InferenceError::ModelNotFound { path });
        }

        let artifact = match ModelArtifact::load(&path) {
            Ok(artifact) => artifact,
            Err(source) => {
                error!(model = %path.display(), error = %source, "Failed to load model");
                return Err(InferenceError::ModelLoad { path, source });
            }
        };

        info!(
            model = %path.display(),
            model_type = artifact.name(),
            n_features = artifact.n_features(),
            "Model loaded successfully"
        );
        self.model = Some(Arc::new(artifact));
        self.source = Some(path);
        Ok(())
    }

    /// Predict a single value from one ordered feature vector.
    ///
    /// The vector is passed to the model as a one-row batch and the single
    /// output is unwrapped from the result.
    pub fn predict(&self, features: &[f64]) -> Result<f64, InferenceError> {
        let model = self.model.as_ref().ok_or_else(|| {
            error!("Prediction requested before a model was loaded");
            InferenceError::ModelNotLoaded
        })?;

        debug!(n_features = features.len(), model_type = model.name(), "Making prediction");

        let batch = Array2::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| ModelError::Shape(e.to_string()))?;
        let output = model.predict(&batch)?;

        if output.len() != 1 {
            return Err(ModelError::BatchSize {
                expected: 1,
                actual: output.len(),
            }
            .into());
        }

        let prediction = output[0];
        if !prediction.is_finite() {
            return Err(ModelError::NonFinite(prediction).into());
        }
        Ok(prediction)
    }

    pub fn model_info(&self) -> Option<ModelInfo> {
        self.model.as_ref().map(|model| ModelInfo {
            model_type: model.name().to_string(),
            n_features: model.n_features(),
            source: self.source.clone(),
        })
    }
}
