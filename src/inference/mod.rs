//! Inference module
//!
//! Provides model loading and single-row prediction:
//! - JSON model artifacts (linear regression, constant baseline)
//! - The [`Regressor`] trait for plugging in other models
//! - [`ModelInferenceService`], which owns the loaded model

mod model;
mod service;

pub use model::{ConstantRegressor, LinearRegression, ModelArtifact, ModelError, Regressor};
pub use service::{InferenceError, ModelInferenceService, ModelInfo};
