use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::backend::database::DatabaseBackendConfig;
use crate::backend::{Backend, BackendFactory, DatabaseType, TaxiBackend};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::{auth, logging, resource};

/// Translate the application config into a backend configuration
pub fn backend_config_from_app_config(config: &AppConfig) -> AppResult<DatabaseBackendConfig> {
    if config.backend.backend_type != "database" {
        return Err(AppError::Configuration(format!(
            "Unsupported backend type: {}",
            config.backend.backend_type
        )));
    }

    let database_config = config.backend.database.as_ref().ok_or_else(|| {
        AppError::Configuration(
            "Database configuration is required when backend type is 'database'".to_string(),
        )
    })?;

    let database_type = match database_config.db_type.as_str() {
        "sqlite" => DatabaseType::SQLite,
        other => {
            return Err(AppError::Configuration(format!(
                "Unsupported database type: {}",
                other
            )))
        }
    };

    Ok(
        DatabaseBackendConfig::new(database_type, database_config.url.clone())
            .with_max_connections(database_config.max_connections),
    )
}

/// Create the storage backend and make sure its schema exists
pub async fn setup_backend(config: &AppConfig) -> AppResult<Arc<dyn TaxiBackend>> {
    let backend_config = backend_config_from_app_config(config)?;
    let backend = BackendFactory::create(&backend_config).await?;
    backend.init_schema().await?;
    Ok(backend)
}

/// Assemble the application router: resource routes under the configured
/// base path, wrapped in auth and access-log middleware
pub fn build_router(backend: Arc<dyn TaxiBackend>, app_config: Arc<AppConfig>) -> Router {
    let base_path = app_config.api.resolved_base_path();

    let app = Router::new()
        .route("/health", get(resource::health))
        // Driver routes
        .route(
            &format!("{}/drivers", base_path),
            post(resource::driver::create_driver),
        )
        .route(
            &format!("{}/drivers", base_path),
            get(resource::driver::list_drivers),
        )
        .route(
            &format!("{}/drivers/{{id}}", base_path),
            get(resource::driver::get_driver),
        )
        .route(
            &format!("{}/drivers/{{id}}/license", base_path),
            put(resource::driver::update_driver_license),
        )
        .route(
            &format!("{}/drivers/{{id}}", base_path),
            delete(resource::driver::delete_driver),
        )
        // Car routes
        .route(
            &format!("{}/cars", base_path),
            post(resource::car::create_car),
        )
        .route(
            &format!("{}/cars", base_path),
            get(resource::car::list_cars),
        )
        .route(
            &format!("{}/cars/{{id}}", base_path),
            get(resource::car::get_car),
        )
        .route(
            &format!("{}/cars/{{id}}", base_path),
            put(resource::car::update_car),
        )
        .route(
            &format!("{}/cars/{{id}}", base_path),
            delete(resource::car::delete_car),
        );

    app.layer(middleware::from_fn_with_state(
        app_config.clone(),
        auth::auth_middleware,
    ))
    .layer(middleware::from_fn(logging::logging_middleware))
    .with_state((backend, app_config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_config_from_default_app_config() {
        let config = AppConfig::default_config();
        let backend_config = backend_config_from_app_config(&config).unwrap();

        assert_eq!(backend_config.database_type, DatabaseType::SQLite);
        assert!(backend_config.is_memory_database());
    }

    #[test]
    fn test_unsupported_backend_type_rejected() {
        let mut config = AppConfig::default_config();
        config.backend.backend_type = "redis".to_string();

        assert!(backend_config_from_app_config(&config).is_err());
    }

    #[test]
    fn test_unsupported_database_type_rejected() {
        let mut config = AppConfig::default_config();
        config.backend.database.as_mut().unwrap().db_type = "postgresql".to_string();

        assert!(backend_config_from_app_config(&config).is_err());
    }
}
