use axum::extract::State;
use axum::{http::StatusCode, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::backend::{Backend, TaxiBackend};
use crate::config::AppConfig;

pub mod car;
pub mod driver;

/// Shared handler state: storage backend plus application configuration
pub type AppState = (Arc<dyn TaxiBackend>, Arc<AppConfig>);

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 200;

/// Offset/limit paging parameters for list endpoints
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }
}

/// Location header value for a newly created resource
pub fn build_resource_location(app_config: &AppConfig, resource: &str, id: &str) -> String {
    format!("{}/{}/{}", app_config.api.resolved_base_path(), resource, id)
}

/// Liveness endpoint; also exercises the storage backend
pub async fn health(
    State((backend, _app_config)): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match backend.health_check().await {
        Ok(()) => Ok(Json(json!({ "status": "ok" }))),
        Err(e) => Err(e.to_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_defaults() {
        let params = PageParams {
            offset: None,
            limit: None,
        };
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_page_params_clamped() {
        let params = PageParams {
            offset: Some(-5),
            limit: Some(100_000),
        };
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), MAX_PAGE_LIMIT);

        let params = PageParams {
            offset: Some(10),
            limit: Some(0),
        };
        assert_eq!(params.offset(), 10);
        assert_eq!(params.limit(), 1);
    }

    #[test]
    fn test_build_resource_location() {
        let config = AppConfig::default_config();
        assert_eq!(
            build_resource_location(&config, "drivers", "abc"),
            "/api/drivers/abc"
        );
    }
}
