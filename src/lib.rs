//! Apartment price prediction service
//!
//! Serves predictions from a pre-trained regression model over HTTP:
//! request input is validated against a fixed apartment schema, turned into
//! an ordered feature vector and passed to the model.
//!
//! # Modules
//!
//! - [`schema`] - Apartment feature validation and feature ordering
//! - [`inference`] - Model artifacts and the inference service
//! - [`server`] - HTTP server with the prediction and health endpoints
//! - [`config`] - Environment-driven settings and logging setup
//! - [`cli`] - Command-line interface

pub mod config;
pub mod schema;
pub mod inference;
pub mod server;
pub mod cli;

pub use inference::{InferenceError, ModelInferenceService, Regressor};
pub use schema::{ApartmentFeatures, ValidationError, FEATURE_NAMES};
