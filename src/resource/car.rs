use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::{build_resource_location, AppState, PageParams};
use crate::models::{Car, ListResponse};
use crate::validation::validate_car;

pub async fn create_car(
    State((backend, app_config)): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let car: Car = match serde_json::from_value(payload) {
        Ok(car) => car,
        Err(e) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({"error": format!("Invalid car data: {}", e)})),
            ))
        }
    };

    if let Err(e) = validate_car(&car) {
        return Err(e.to_response());
    }

    match backend.create_car(&car).await {
        Ok(created) => {
            let location = match &created.id {
                Some(id) => build_resource_location(&app_config, "cars", id),
                None => {
                    return Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"error": "Created car missing ID"})),
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

pub async fn get_car(
    State((backend, _app_config)): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Car>, (StatusCode, Json<serde_json::Value>)> {
    match backend.find_car_by_id(&id).await {
        Ok(Some(car)) => Ok(Json(car)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Car not found"})),
        )),
        Err(e) => Err(e.to_response()),
    }
}

pub async fn list_cars(
    State((backend, _app_config)): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListResponse>, (StatusCode, Json<serde_json::Value>)> {
    let offset = params.offset();
    let limit = params.limit();

    match backend.find_all_cars(offset, limit).await {
        Ok((cars, total)) => {
            let items = cars
                .into_iter()
                .map(|car| serde_json::to_value(&car).unwrap_or_default())
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

/// Full replacement, including the driver assignment set
pub async fn update_car(
    State((backend, _app_config)): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<Car>, (StatusCode, Json<serde_json::Value>)> {
    let car: Car = match serde_json::from_value(payload) {
        Ok(car) => car,
        Err(e) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({"error": format!("Invalid car data: {}", e)})),
            ))
        }
    };

    if let Err(e) = validate_car(&car) {
        return Err(e.to_response());
    }

    match backend.update_car(&id, &car).await {
        Ok(Some(updated)) => Ok(Json(updated)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Car not found"})),
        )),
        Err(e) => Err(e.to_response()),
    }
}

pub async fn delete_car(
    State((backend, _app_config)): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<serde_json::Value>)> {
    match backend.delete_car(&id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Car not found"})),
        )),
        Err(e) => Err(e.to_response()),
    }
}
