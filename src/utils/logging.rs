//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the MadSocial application.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use uuid::Uuid;
use crate::config::LoggingConfig;
use crate::utils::errors::{MadSocialError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let stdout_layer = if config.format == "json" {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match &config.file_path {
        Some(path) => {
            let file_appender = tracing_appender::rolling::daily(path, "madsocial.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| MadSocialError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: Uuid, action: &str, details: Option<&str>) {
    info!(
        user_id = %user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log pregame membership actions
pub fn log_pregame_action(pregame_id: Uuid, action: &str, user_id: Uuid, details: Option<&str>) {
    info!(
        pregame_id = %pregame_id,
        action = action,
        user_id = %user_id,
        details = details,
        "Pregame action performed"
    );
}

/// Log rejected membership operations
pub fn log_rejected_action(pregame_id: Uuid, action: &str, user_id: Uuid, reason: &str) {
    warn!(
        pregame_id = %pregame_id,
        action = action,
        user_id = %user_id,
        reason = reason,
        "Pregame action rejected"
    );
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}
