use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::info;

/// `Started`/`Completed` lines per request. Only the path is logged, never
/// the query string or body.
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    info!("Started {} {}", method, path);

    let response = next.run(request).await;

    info!(
        status = response.status().as_u16(),
        "Completed {} {} in {:?}",
        method,
        path,
        started.elapsed()
    );
    response
}
