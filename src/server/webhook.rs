//! Webhook endpoint handler.
//!
//! Parses the delivery, hands relevant pull request events to the dispatcher
//! and answers immediately. The response never depends on how polling goes.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::AppState;
use crate::webhooks::{ParseError, parse_webhook};

/// Header name for GitHub event type.
const HEADER_EVENT: &str = "x-github-event";
/// Header name for GitHub delivery ID (logged only).
const HEADER_DELIVERY: &str = "x-github-delivery";

/// JSON body of every webhook response.
#[derive(Debug, Serialize)]
pub struct Acknowledgement {
    pub error: bool,
    pub message: String,
}

impl Acknowledgement {
    fn ok() -> Self {
        Acknowledgement {
            error: false,
            message: "OK".to_string(),
        }
    }
}

/// Errors that reject a webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The payload of a relevant event is malformed.
    #[error("malformed event: {0}")]
    MalformedEvent(#[from] ParseError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let body = Json(Acknowledgement {
            error: true,
            message: self.to_string(),
        });
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

/// Webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Headers:
///   - `X-GitHub-Event`: Event type (only `pull_request` is acted on; absent means ignored)
/// - Body: JSON webhook payload
///
/// # Response
///
/// - 200 OK `{"error": false, "message": "OK"}`: accepted or ignored
/// - 400 Bad Request: malformed `pull_request` payload
pub async fn webhook_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Acknowledgement>), WebhookError> {
    let event_type = get_header(&headers, HEADER_EVENT).unwrap_or_default();
    let delivery_id = get_header(&headers, HEADER_DELIVERY).unwrap_or_default();

    debug!(delivery_id = %delivery_id, event_type = %event_type, "Received webhook");

    let event = parse_webhook(&event_type, &body).inspect_err(|e| {
        warn!(delivery_id = %delivery_id, error = %e, "Rejecting malformed webhook");
    })?;

    match event {
        Some(event) => {
            info!(
                delivery_id = %delivery_id,
                action = ?event.action,
                repo = %event.pull_request.head.repo,
                head = %event.pull_request.head.sha.short(),
                base = %event.pull_request.base.sha.short(),
                "Starting coverage poll"
            );
            app_state.dispatcher().on_pull_request_event(event);
        }
        None => {
            debug!(delivery_id = %delivery_id, event_type = %event_type, "Ignoring webhook");
        }
    }

    Ok((StatusCode::OK, Json(Acknowledgement::ok())))
}

/// Extracts a header value as a string.
fn get_header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
