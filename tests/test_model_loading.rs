//! Integration test: model artifacts on disk
//! Tests: save artifact → load → serve predictions; missing and corrupt files

use apartment_price::config::ModelSettings;
use apartment_price::inference::{
    InferenceError, LinearRegression, ModelArtifact, ModelInferenceService,
};
use apartment_price::schema::ApartmentFeatures;
use apartment_price::server::{create_router, AppState, ServerConfig};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

fn write_linear_model(dir: &std::path::Path, name: &str) {
    // price = 3000 * area + 15000 * bedrooms + 5000 * garagePresent + 20000
    let coefficients = vec![3000.0, 0.0, 15000.0, 0.0, 0.0, 0.0, 0.0, 5000.0, 0.0];
    ModelArtifact::LinearRegression(LinearRegression::new(coefficients, 20000.0))
        .save(&dir.join(name))
        .unwrap();
}

#[test]
fn test_nonexistent_model_file_leaves_service_unloaded() {
    let dir = tempfile::tempdir().unwrap();
    let settings = ModelSettings::new(dir.path(), "does-not-exist.json");
    let mut service = ModelInferenceService::new(&settings);

    let err = service.load_model().unwrap_err();
    assert!(matches!(err, InferenceError::ModelNotFound { .. }));
    assert!(err.to_string().contains("does-not-exist.json"));
    assert!(!service.is_loaded());

    assert!(matches!(
        service.predict(&[50.0, 2000.0, 2.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]),
        Err(InferenceError::ModelNotLoaded)
    ));
}

#[test]
fn test_directory_named_like_model_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("model.json")).unwrap();
    let mut service = ModelInferenceService::new(&ModelSettings::new(dir.path(), "model.json"));
    assert!(matches!(
        service.load_model(),
        Err(InferenceError::ModelNotFound { .. })
    ));
}

#[test]
fn test_invalid_artifact_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("model.json"),
        r#"{"model_type": "linear_regression", "coefficients": [1.0, "x"]}"#,
    )
    .unwrap();
    let mut service = ModelInferenceService::new(&ModelSettings::new(dir.path(), "model.json"));
    assert!(matches!(
        service.load_model(),
        Err(InferenceError::ModelLoad { .. })
    ));
    assert!(!service.is_loaded());
}

#[test]
fn test_loaded_model_predicts_from_validated_features() {
    let dir = tempfile::tempdir().unwrap();
    write_linear_model(dir.path(), "apartments.json");

    let mut service = ModelInferenceService::new(&ModelSettings::new(dir.path(), "apartments.json"));
    service.load_model().unwrap();

    let raw = match serde_json::json!({
        "area": "80",
        "constructionYear": 1995,
        "bedrooms": 3,
        "gardenArea": 0,
        "balconyPresent": 0,
        "parkingPresent": 1,
        "furnished": 0,
        "garagePresent": true,
        "storagePresent": 0
    }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    let features = ApartmentFeatures::validate(&raw).unwrap();
    let prediction = service.predict(&features.to_feature_vector()).unwrap();
    assert_eq!(prediction, 3000.0 * 80.0 + 15000.0 * 3.0 + 5000.0 + 20000.0);
}

#[tokio::test]
async fn test_serves_predictions_from_model_file() {
    let dir = tempfile::tempdir().unwrap();
    write_linear_model(dir.path(), "model.json");

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        model: ModelSettings::new(dir.path(), "model.json"),
    };
    let mut inference = ModelInferenceService::new(&config.model);
    inference.load_model().unwrap();
    let app = create_router(Arc::new(AppState::new(config, inference)));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/pred/?area=50&constructionYear=2000&bedrooms=2&gardenArea=0&balconyPresent=1&parkingPresent=0&furnished=1&garagePresent=0&storagePresent=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 64).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        json["prediction"].as_f64(),
        Some(3000.0 * 50.0 + 15000.0 * 2.0 + 20000.0)
    );
}
