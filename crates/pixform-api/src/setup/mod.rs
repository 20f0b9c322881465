//! Application setup and initialization
//!
//! `initialize_app` is what the binary calls. `build_app` assembles state and
//! routes without touching the global tracing subscriber, so tests can build
//! as many apps as they like.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use pixform_core::ServiceConfig;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: ServiceConfig) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config.environment)
        .context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = %config.environment,
        static_root = %config.static_root.display(),
        upload_dir = %config.upload_dir.display(),
        "Configuration loaded and validated successfully"
    );

    build_app(config).await
}

/// Build shared state and the router from a validated configuration.
pub async fn build_app(config: ServiceConfig) -> Result<(Arc<AppState>, axum::Router)> {
    let storage = storage::setup_storage(&config).await?;
    let state = Arc::new(AppState::new(config.clone(), storage));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
