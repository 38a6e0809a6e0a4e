use axum::{extract::Request, http::Method, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;

/// Access-log middleware
///
/// One line per request: client, request line, status, latency and
/// user agent, in a format log scrapers already understand.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let remote_addr = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            request
                .headers()
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
        })
        .unwrap_or("-")
        .to_string();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        target: "access_log",
        "{} \"{}\" {} {}ms \"{}\"",
        remote_addr,
        format_request(&method, &uri),
        status.as_u16(),
        duration.as_millis(),
        user_agent,
    );

    response
}

fn format_request(method: &Method, uri: &axum::http::Uri) -> String {
    format!("{} {} HTTP/1.1", method, uri)
}
