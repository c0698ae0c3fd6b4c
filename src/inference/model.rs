//! Regression model artifacts
//!
//! A model is anything implementing [`Regressor`]: a batch prediction over
//! the rows of a feature matrix. Artifacts on disk are JSON documents tagged
//! by `model_type`.

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or running a model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Feature count mismatch: model expects {expected}, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("Unexpected batch size: expected {expected} prediction(s), got {actual}")]
    BatchSize { expected: usize, actual: usize },

    #[error("Model produced a non-finite prediction: {0}")]
    NonFinite(f64),

    #[error("Invalid input shape: {0}")]
    Shape(String),

    #[error("{0}")]
    Other(String),
}

/// A fitted regression model.
///
/// `predict` is a batch operation: one output per row of `x`.
pub trait Regressor: Send + Sync + std::fmt::Debug {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError>;

    /// Number of columns `predict` expects
    fn n_features(&self) -> usize;

    /// Short model type name, used in logs and health output
    fn name(&self) -> &str;
}

/// Ordinary linear regression: `x · coefficients + intercept`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl LinearRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }
}

impl Regressor for LinearRegression {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        check_width(x, self.coefficients.len())?;
        let coefficients = ArrayView1::from(&self.coefficients[..]);
        Ok(x.dot(&coefficients) + self.intercept)
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn name(&self) -> &str {
        "linear_regression"
    }
}

/// Predicts the same value for every row. Useful as a baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantRegressor {
    pub value: f64,
    pub n_features: usize,
}

impl ConstantRegressor {
    pub fn new(value: f64, n_features: usize) -> Self {
        Self { value, n_features }
    }
}

impl Regressor for ConstantRegressor {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        check_width(x, self.n_features)?;
        Ok(Array1::from_elem(x.nrows(), self.value))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn name(&self) -> &str {
        "constant"
    }
}

fn check_width(x: &Array2<f64>, expected: usize) -> Result<(), ModelError> {
    if x.ncols() != expected {
        return Err(ModelError::FeatureMismatch {
            expected,
            actual: x.ncols(),
        });
    }
    Ok(())
}

/// Serialized model as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum ModelArtifact {
    LinearRegression(LinearRegression),
    Constant(ConstantRegressor),
}

impl ModelArtifact {
    /// Parse and sanity-check an artifact from JSON text
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: Self = serde_json::from_str(json)?;
        artifact.check()?;
        Ok(artifact)
    }

    /// Load an artifact from a file
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save an artifact to a file
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn check(&self) -> Result<(), ModelError> {
        match self {
            ModelArtifact::LinearRegression(model) => {
                if model.coefficients.is_empty() {
                    return Err(ModelError::InvalidArtifact(
                        "linear regression has no coefficients".to_string(),
                    ));
                }
                if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(ModelError::InvalidArtifact(
                        "linear regression weights must be finite".to_string(),
                    ));
                }
            }
            ModelArtifact::Constant(model) => {
                if model.n_features == 0 {
                    return Err(ModelError::InvalidArtifact(
                        "constant model must declare at least one feature".to_string(),
                    ));
                }
                if !model.value.is_finite() {
                    return Err(ModelError::InvalidArtifact(
                        "constant model value must be finite".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn inner(&self) -> &dyn Regressor {
        match self {
            ModelArtifact::LinearRegression(model) => model,
            ModelArtifact::Constant(model) => model,
        }
    }
}

impl Regressor for ModelArtifact {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        self.inner().predict(x)
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_linear_regression_predicts_each_row() {
        let model = LinearRegression::new(vec![2.0, -1.0], 10.0);
        let x = array![[1.0, 1.0], [3.0, 0.5]];
        let pred = model.predict(&x).unwrap();
        assert_eq!(pred.to_vec(), vec![11.0, 15.5]);
    }

    #[test]
    fn test_feature_mismatch() {
        let model = LinearRegression::new(vec![1.0, 1.0, 1.0], 0.0);
        let x = array![[1.0, 2.0]];
        match model.predict(&x) {
            Err(ModelError::FeatureMismatch { expected, actual }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("expected feature mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_constant_regressor() {
        let model = ConstantRegressor::new(250000.0, 2);
        let pred = model.predict(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert_eq!(pred.to_vec(), vec![250000.0, 250000.0]);
    }

    #[test]
    fn test_artifact_from_json() {
        let artifact = ModelArtifact::from_json(
            r#"{"model_type": "linear_regression", "coefficients": [1.0, 2.0], "intercept": 0.5}"#,
        )
        .unwrap();
        assert_eq!(artifact.name(), "linear_regression");
        assert_eq!(artifact.n_features(), 2);
        let pred = artifact.predict(&array![[1.0, 1.0]]).unwrap();
        assert_eq!(pred[0], 3.5);
    }

    #[test]
    fn test_artifact_rejects_unknown_type() {
        let result = ModelArtifact::from_json(r#"{"model_type": "random_forest", "trees": []}"#);
        assert!(matches!(result, Err(ModelError::Json(_))));
    }

    #[test]
    fn test_artifact_rejects_empty_coefficients() {
        let result =
            ModelArtifact::from_json(r#"{"model_type": "linear_regression", "coefficients": []}"#);
        assert!(matches!(result, Err(ModelError::InvalidArtifact(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let artifact = ModelArtifact::Constant(ConstantRegressor::new(42.0, 9));
        artifact.save(&path).unwrap();
        assert_eq!(ModelArtifact::load(&path).unwrap(), artifact);
    }
}
