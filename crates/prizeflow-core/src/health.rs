use axum::http::StatusCode;

/// `GET /healthz`: the process is up. Readiness is per service, since only the
/// service knows which backends it needs.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
