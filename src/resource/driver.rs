use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::{build_resource_location, AppState, PageParams};
use crate::models::{Driver, DriverLicenseUpdate, ListResponse};
use crate::validation::validate_driver;

pub async fn create_driver(
    State((backend, app_config)): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let driver: Driver = match serde_json::from_value(payload) {
        Ok(driver) => driver,
        Err(e) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({"error": format!("Invalid driver data: {}", e)})),
            ))
        }
    };

    if let Err(e) = validate_driver(&driver) {
        return Err(e.to_response());
    }

    // Presence is a field-level check; strength and hashing happen in the
    // backend so pre-hashed imports take the same path.
    if driver.password.as_deref().unwrap_or("").is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "password is required"})),
        ));
    }

    match backend.create_driver(&driver).await {
        Ok(created) => {
            let location = match &created.id {
                Some(id) => build_resource_location(&app_config, "drivers", id),
                None => {
                    return Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"error": "Created driver missing ID"})),
                    ))
                }
            };

            let mut headers = HeaderMap::new();
            headers.insert(
                "Location",
                HeaderValue::from_str(&location).map_err(|_| {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"error": "Invalid location header"})),
                    )
                })?,
            );

            let mut response = Json(created).into_response();
            *response.status_mut() = StatusCode::CREATED;
            response.headers_mut().extend(headers);

            Ok(response)
        }
        Err(e) => Err(e.to_response()),
    }
}

pub async fn get_driver(
    State((backend, _app_config)): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Driver>, (StatusCode, Json<serde_json::Value>)> {
    match backend.find_driver_by_id(&id).await {
        Ok(Some(driver)) => Ok(Json(driver)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Driver not found"})),
        )),
        Err(e) => Err(e.to_response()),
    }
}

/// List parameters: paging plus an optional exact username filter
#[derive(Debug, serde::Deserialize)]
pub struct DriverListParams {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub username: Option<String>,
}

pub async fn list_drivers(
    State((backend, _app_config)): State<AppState>,
    Query(params): Query<DriverListParams>,
) -> Result<Json<ListResponse>, (StatusCode, Json<serde_json::Value>)> {
    let page = PageParams {
        offset: params.offset,
        limit: params.limit,
    };
    let offset = page.offset();
    let limit = page.limit();

    // Username lookup is an exact, case-insensitive match
    if let Some(username) = &params.username {
        return match backend.find_driver_by_username(username).await {
            Ok(found) => {
                let items: Vec<serde_json::Value> = found
                    .into_iter()
                    .map(|driver| serde_json::to_value(&driver).unwrap_or_default())
                    .collect();

                Ok(Json(ListResponse {
                    total: items.len() as i64,
                    offset: 0,
                    limit,
                    items,
                }))
            }
            Err(e) => Err(e.to_response()),
        };
    }

    match backend.find_all_drivers(offset, limit).await {
        Ok((drivers, total)) => {
            let items = drivers
                .into_iter()
                .map(|driver| serde_json::to_value(&driver).unwrap_or_default())
                .collect();

            Ok(Json(ListResponse {
                total,
                offset,
                limit,
                items,
            }))
        }
        Err(e) => Err(e.to_response()),
    }
}

/// License update endpoint
///
/// Runs the same license rule as driver creation, so a rejected value
/// reports the same message from either entry point.
pub async fn update_driver_license(
    State((backend, _app_config)): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<DriverLicenseUpdate>,
) -> Result<Json<Driver>, (StatusCode, Json<serde_json::Value>)> {
    if let Err(e) = crate::license::validate_license_number(&update.license_number) {
        return Err(crate::error::AppError::from(e).to_response());
    }

    match backend.update_driver_license(&id, &update).await {
        Ok(Some(driver)) => Ok(Json(driver)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Driver not found"})),
        )),
        Err(e) => Err(e.to_response()),
    }
}

pub async fn delete_driver(
    State((backend, _app_config)): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<serde_json::Value>)> {
    match backend.delete_driver(&id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Driver not found"})),
        )),
        Err(e) => Err(e.to_response()),
    }
}
