//! Liveness endpoint.

use axum::http::StatusCode;

/// Returns 200 `OK` while the process is serving requests.
///
/// It says nothing about Code Climate or GitHub reachability; those are only
/// exercised by polls.
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
