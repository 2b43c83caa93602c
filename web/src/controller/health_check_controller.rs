use axum::http::StatusCode;
use axum::response::IntoResponse;

/// GET /health
///
/// Liveness probe. Answers without touching the registry or the upstream API.
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "healthy")
}
