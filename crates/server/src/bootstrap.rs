use std::sync::Arc;

use axum::Router;
use commission_core::config::AppConfig;
use commission_core::engine::CommissionEngine;
use commission_core::errors::EngineError;
use commission_core::seed::{SeedDataset, SeedOutcome};
use commission_db::{connect_with_config, migrations, DbPool, SqlSalesLedger};
use thiserror::Error;
use tower_http::services::ServeDir;
use tracing::info;

use crate::{api, health, pages};

/// Directory served under `/static`, relative to the working directory.
pub const STATIC_DIR: &str = "static";

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub engine: CommissionEngine,
    pub seed_outcome: Option<SeedOutcome>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("example data could not be loaded: {0}")]
    Seed(#[source] EngineError),
}

impl Application {
    /// Full HTTP surface: landing page, JSON API, health probe and static assets.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(pages::router())
            .merge(api::router(self.engine.clone()))
            .merge(health::router(self.db_pool.clone()))
            .nest_service("/static", ServeDir::new(STATIC_DIR))
    }
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool =
        connect_with_config(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let engine = CommissionEngine::new(Arc::new(SqlSalesLedger::new(db_pool.clone())));

    let seed_outcome = if config.seed.load_on_start {
        let outcome =
            engine.bootstrap(&SeedDataset::example()).await.map_err(BootstrapError::Seed)?;
        info!(
            event_name = "system.bootstrap.seed_checked",
            correlation_id = "bootstrap",
            loaded = outcome.was_loaded(),
            "{}",
            outcome.summary()
        );
        Some(outcome)
    } else {
        None
    };

    Ok(Application { config, db_pool, engine, seed_outcome })
}
