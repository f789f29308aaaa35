use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coverage_status::config::{Config, DEFAULT_LOG_FILTER};
use coverage_status::coverage::CodeClimateClient;
use coverage_status::github::GitHubStatusClient;
use coverage_status::poller::CoveragePoller;
use coverage_status::server::{AppState, build_router};
use coverage_status::webhooks::PollDispatcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("loading configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    let lookup = CodeClimateClient::new(&config.codeclimate_api_url, &config.codeclimate_token)
        .context("building Code Climate client")?;
    let reporter =
        GitHubStatusClient::from_token(&config.github_token, &config.codeclimate_web_url)
            .context("building GitHub client")?;

    let shutdown = CancellationToken::new();
    let poller =
        CoveragePoller::new_with_shutdown(lookup, reporter, config.poll.clone(), shutdown.clone());
    let dispatcher = Arc::new(PollDispatcher::new(Arc::new(poller)));
    let app = build_router(AppState::new(dispatcher));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    tracing::info!("listening on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("serving HTTP")?;

    Ok(())
}

/// Resolves on Ctrl-C, cancelling every in-flight poll first.
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
    shutdown.cancel();
}
