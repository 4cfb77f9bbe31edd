use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use askledger_agent::{GeminiClient, Pipeline};
use askledger_core::config::{AppConfig, ConfigError, LoadOptions};
use askledger_db::{
    connect_with_settings, fixtures, migrations, DbPool, SqlQueryEngine, SqlSavedSearchStore,
};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub pipeline: Arc<Pipeline>,
    pub saved_searches: Arc<SqlSavedSearchStore>,
    pub credential_configured: bool,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("demo data seeding failed: {0}")]
    Seed(#[source] sqlx::Error),
    #[error("http client construction failed: {0}")]
    HttpClient(#[source] reqwest::Error),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
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

    if config.database.seed_demo_data {
        fixtures::seed_demo_data(&db_pool).await.map_err(BootstrapError::Seed)?;
        info!(
            event_name = "system.bootstrap.demo_data_seeded",
            correlation_id = "bootstrap",
            "demo dataset seeded"
        );
    }

    // A missing key is fatal only for the POST paths: the server still
    // boots, GET paths work, and each pipeline request answers with the
    // missing-credential envelope instead of calling out.
    let credential_configured = config.llm.api_key.is_some();
    if !credential_configured {
        warn!(
            event_name = "system.bootstrap.credential_missing",
            correlation_id = "bootstrap",
            "llm.api_key is not configured; assistant requests will fail until it is set"
        );
    }

    let gemini = GeminiClient::new(&config.llm).map_err(BootstrapError::HttpClient)?;
    let saved_searches = Arc::new(SqlSavedSearchStore::new(db_pool.clone()));
    let pipeline = Arc::new(Pipeline::new(
        Arc::new(gemini),
        Arc::new(SqlQueryEngine::new(db_pool.clone())),
        saved_searches.clone(),
        config.llm.api_key.clone(),
    ));

    Ok(Application { config, db_pool, pipeline, saved_searches, credential_configured })
}
