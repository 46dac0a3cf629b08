//! MadSocial API server
//!
//! Main application entry point

use anyhow::Context;
use tracing::info;

use madsocial::{
    config::Settings,
    database::{create_pool, run_migrations, DatabaseService, PoolConfig},
    server::{self, AppState},
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate().context("Invalid configuration")?;

    // Initialize logging; the guard flushes file output on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", madsocial::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool = create_pool(&PoolConfig::from(&settings.database))
        .await
        .context("Failed to connect to database")?;

    // Run database migrations
    run_migrations(&pool).await.context("Failed to run migrations")?;

    let database_service = DatabaseService::new(pool);
    database_service
        .health_check()
        .await
        .context("Database health check failed")?;
    let state = AppState::new(database_service, settings);

    server::serve(state).await?;
    Ok(())
}
