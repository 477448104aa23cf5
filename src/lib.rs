//! Employee Registry
//!
//! Validated signup, signin and employee forms over a document store:
//! - Declarative per-form validation rules
//! - A `Store` boundary with in-memory, PostgreSQL and HTTP implementations
//! - A submission controller turning results into notifications and navigation
//! - An axum REST API and a CLI client

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::store::DocumentStore;
use tracing::info;

/// Create the application state over the default in-memory store
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state for the configured storage backend
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = config.storage.storage_config()?;
    info!(backend = %storage_config.storage_type(), "Initializing store");

    let store = DocumentStore::connect(&storage_config).await?;

    Ok(AppState::new(Arc::new(store)))
}
