pub mod api;
pub mod config;
pub mod core_state;
pub mod db;
pub mod models;
pub mod summarization;
pub mod validation;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::core_state::CoreState;
use crate::summarization::SummarizationGateway;

/// Failures that stop the server before or while it runs.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Server error: {0}")]
    Server(String),
}

pub async fn run() -> Result<(), StartupError> {
    // A missing .env file is fine; real env vars still apply
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let gateway = match &config.llm {
        Some(llm) => {
            tracing::info!(base_url = %llm.base_url, model = %llm.model, "AI service configured");
            SummarizationGateway::new(Arc::new(llm.build_client()))
        }
        None => {
            tracing::warn!("No AI API key set; summary and analysis endpoints are unavailable");
            SummarizationGateway::unconfigured()
        }
    };

    let core = Arc::new(CoreState::initialize(config.database_path.clone(), gateway)?);
    tracing::info!(path = %core.db_path().display(), "Database ready");

    let app = api::api_router(core, &config.cors_allowed_origins);
    api::serve_until_ctrl_c(app, config.bind_addr)
        .await
        .map_err(StartupError::Server)
}
