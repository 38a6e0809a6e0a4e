use axum::Router;
use serde_json::json;
use std::sync::Arc;

use taxi_service::backend::database::DatabaseBackendConfig;
use taxi_service::backend::{Backend, BackendFactory, TaxiBackend};
use taxi_service::config::{ApiConfig, AppConfig, AuthConfig, BasicAuthConfig};
use taxi_service::startup::build_router;

/// Create a backend for testing with an in-memory SQLite database
pub async fn setup_test_backend() -> Arc<dyn TaxiBackend> {
    let backend_config = DatabaseBackendConfig::memory_sqlite();
    let backend = BackendFactory::create(&backend_config)
        .await
        .expect("failed to create test backend");

    backend
        .init_schema()
        .await
        .expect("failed to initialize test schema");

    backend
}

/// Default test configuration: /api base path, anonymous access
pub fn create_test_app_config() -> AppConfig {
    AppConfig::default_config()
}

/// Test configuration guarded by a bearer token
pub fn create_bearer_app_config(token: &str) -> AppConfig {
    let mut config = AppConfig::default_config();
    config.api = ApiConfig {
        base_path: "/api".to_string(),
        auth: AuthConfig {
            auth_type: "bearer".to_string(),
            token: Some(token.to_string()),
            basic: None,
        },
    };
    config
}

/// Test configuration guarded by HTTP Basic credentials
pub fn create_basic_auth_app_config(username: &str, password: &str) -> AppConfig {
    let mut config = AppConfig::default_config();
    config.api.auth = AuthConfig {
        auth_type: "basic".to_string(),
        token: None,
        basic: Some(BasicAuthConfig {
            username: username.to_string(),
            password: password.to_string(),
        }),
    };
    config
}

/// Create a test app with an in-memory database and the given configuration
pub async fn setup_test_app(app_config: AppConfig) -> Router {
    let backend = setup_test_backend().await;
    build_router(backend, Arc::new(app_config))
}

/// Driver creation payload with sensible defaults
pub fn driver_payload(username: &str, license_number: &str) -> serde_json::Value {
    json!({
        "username": username,
        "firstName": "Test",
        "lastName": "Driver",
        "email": format!("{}@example.com", username),
        "password": "Driving123",
        "licenseNumber": license_number
    })
}

/// Car creation payload with a driver assignment set
pub fn car_payload(model: &str, manufacturer: &str, driver_ids: &[&str]) -> serde_json::Value {
    let drivers: Vec<serde_json::Value> = driver_ids.iter().map(|id| json!({"id": id})).collect();

    json!({
        "model": model,
        "manufacturer": manufacturer,
        "drivers": drivers
    })
}
