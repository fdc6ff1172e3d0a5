//! # Portfolio Analytics Backend
//!
//! Read-only reporting over an account officer's clients and loan accounts.
//!
//! The backend follows a layered layout:
//! - **Storage**: SQLite record store behind the `RecordStore` trait, plus CSV seeding
//! - **Domain**: parameter validation and report aggregation
//! - **IO**: REST endpoints under `/AO-dashboard`

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use config::Config;
use domain::ReportService;
use storage::{csv::RecordImporter, DbConnection, SqliteRecordStore};

/// Main application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub report_service: ReportService,
}

/// Initialize the backend: open the store, seed it when asked, wire the services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database");
    let db_conn = DbConnection::new(&config.database_url, config.max_connections).await?;

    if let Some(seed_dir) = &config.seed_dir {
        RecordImporter::new(db_conn.clone())
            .import_dir(seed_dir)
            .await
            .with_context(|| format!("failed to seed from {}", seed_dir.display()))?;
    }

    info!("Setting up domain model");
    let store = Arc::new(SqliteRecordStore::new(db_conn));
    let report_service = ReportService::new(store);

    Ok(AppState { report_service })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, allowed_origin: &str) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    let cors = if allowed_origin == "*" {
        cors.allow_origin(Any)
    } else {
        let origin = allowed_origin
            .parse::<HeaderValue>()
            .with_context(|| format!("invalid allowed origin '{}'", allowed_origin))?;
        cors.allow_origin(origin)
    };

    Ok(io::rest::dashboard_apis::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
