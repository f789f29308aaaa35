//! HTTP server for the coverage status bot.
//!
//! # Endpoints
//!
//! - `POST /webhook` - Accepts GitHub webhook deliveries (always answers immediately)
//! - `GET /health` - Returns 200 if server is running

use std::sync::Arc;

use crate::webhooks::WebhookDispatcher;

pub mod health;
pub mod webhook;

pub use health::health_handler;
pub use webhook::webhook_handler;

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Receives every relevant pull request event.
    dispatcher: Arc<dyn WebhookDispatcher>,
}

impl AppState {
    /// Creates a new `AppState` dispatching to `dispatcher`.
    pub fn new(dispatcher: Arc<dyn WebhookDispatcher>) -> Self {
        AppState {
            inner: Arc::new(AppStateInner { dispatcher }),
        }
    }

    /// Returns the event dispatcher.
    pub fn dispatcher(&self) -> &dyn WebhookDispatcher {
        self.inner.dispatcher.as_ref()
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router(app_state: AppState) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/webhook", post(webhook_handler))
        .route("/health", get(health_handler))
        .with_state(app_state)
}
