use axum::body::to_bytes;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;

use crate::shared::format::format_size;

/// Print one line per request: local time, duration, body size, status,
/// method and path. Successful requests get a cyan timestamp, the rest
/// yellow.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Buffer the body to learn its real size
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("{} {} failed while streaming the body: {}", method, path, e);
            return Response::from_parts(parts, Body::default());
        }
    };

    let status = parts.status.as_u16();
    let color_code = if parts.status.is_success() { "36" } else { "33" };

    println!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>10} | {} {:>6} {}",
        color_code,
        Local::now().format("%H:%M:%S"),
        start.elapsed().as_millis(),
        format_size(bytes.len()),
        status,
        method,
        path
    );

    if parts.status.is_server_error() {
        tracing::error!("{} {} -> {}", method, path, status);
    }

    Response::from_parts(parts, Body::from(bytes))
}
