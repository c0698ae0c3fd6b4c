//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::inference::InferenceError;
use crate::schema::ValidationError;

/// Everything a prediction request can fail with.
///
/// Variants are ordered by how early in the pipeline they occur.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request payload: {0}")]
    Parse(String),

    #[error("Bad input parameters: {0}")]
    Validation(#[from] ValidationError),

    #[error("An error occurred during prediction: {0}")]
    Inference(#[from] InferenceError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Parse(_) | ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ServerError::Parse(msg) => {
                tracing::warn!(detail = %msg, "Rejected unparseable request");
                json!({ "error": self.to_string() })
            }
            ServerError::Validation(e) => {
                tracing::warn!(detail = %e, "Rejected invalid apartment features");
                json!({
                    "error": self.to_string(),
                    "details": e.errors(),
                })
            }
            ServerError::Inference(e) => {
                tracing::error!(detail = %e, "Prediction failed");
                json!({ "error": self.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
