use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::config::{AppConfig, AuthConfig};

/// Authentication middleware for the API routes
///
/// Health checks stay reachable without credentials; everything else is
/// validated against the configured auth scheme.
pub async fn auth_middleware(
    State(app_config): State<Arc<AppConfig>>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let path = request.uri().path();
    if path == "/" || path == "/health" {
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok());

    match validate_authentication(&app_config.api.auth, auth_header) {
        Ok(()) => Ok(next.run(request).await),
        Err(StatusCode::UNAUTHORIZED) => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Authentication required"})),
        )),
        Err(status) => Err((
            status,
            Json(json!({"error": "Authentication misconfigured"})),
        )),
    }
}

/// Validate the Authorization header against the configured scheme
fn validate_authentication(
    auth: &AuthConfig,
    auth_header: Option<&str>,
) -> Result<(), StatusCode> {
    match auth.auth_type.as_str() {
        "unauthenticated" => Ok(()),
        "bearer" => {
            let auth_header = auth_header.ok_or(StatusCode::UNAUTHORIZED)?;

            if !auth_header.starts_with("Bearer ") {
                return Err(StatusCode::UNAUTHORIZED);
            }

            let provided_token = &auth_header[7..];

            match &auth.token {
                Some(expected_token) if provided_token == expected_token => Ok(()),
                _ => Err(StatusCode::UNAUTHORIZED),
            }
        }
        "basic" => {
            let auth_header = auth_header.ok_or(StatusCode::UNAUTHORIZED)?;

            if !auth_header.starts_with("Basic ") {
                return Err(StatusCode::UNAUTHORIZED);
            }

            let encoded_credentials = &auth_header[6..];

            use base64::{engine::general_purpose, Engine as _};
            let decoded = general_purpose::STANDARD
                .decode(encoded_credentials)
                .map_err(|_| StatusCode::UNAUTHORIZED)?;

            let credentials_str =
                String::from_utf8(decoded).map_err(|_| StatusCode::UNAUTHORIZED)?;

            let parts: Vec<&str> = credentials_str.splitn(2, ':').collect();
            if parts.len() != 2 {
                return Err(StatusCode::UNAUTHORIZED);
            }

            let (provided_username, provided_password) = (parts[0], parts[1]);

            match &auth.basic {
                Some(basic_config)
                    if provided_username == basic_config.username
                        && provided_password == basic_config.password =>
                {
                    Ok(())
                }
                _ => Err(StatusCode::UNAUTHORIZED),
            }
        }
        _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}
