//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{MadSocialError, Result};
use super::Settings;

/// Shortest accepted HS256 signing secret
const MIN_JWT_SECRET_LEN: usize = 16;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(MadSocialError::Config(
            "Server host is required".to_string()
        ));
    }

    if config.port == 0 {
        return Err(MadSocialError::Config(
            "Server port must be greater than 0".to_string()
        ));
    }

    let valid_environments = ["development", "production", "test"];
    if !valid_environments.contains(&config.environment.as_str()) {
        return Err(MadSocialError::Config(
            format!("Invalid environment: {}. Valid environments: {:?}", config.environment, valid_environments)
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(MadSocialError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(MadSocialError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(MadSocialError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate token configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.is_empty() {
        return Err(MadSocialError::Config(
            "JWT secret is required".to_string()
        ));
    }

    if config.jwt_secret.len() < MIN_JWT_SECRET_LEN {
        return Err(MadSocialError::Config(
            format!("JWT secret must be at least {} characters", MIN_JWT_SECRET_LEN)
        ));
    }

    if config.token_ttl_hours <= 0 {
        return Err(MadSocialError::Config(
            "Token TTL must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(MadSocialError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(MadSocialError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.format.as_str()) {
        return Err(MadSocialError::Config(
            format!("Invalid log format: {}. Valid formats: {:?}", config.format, valid_formats)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "a-very-long-test-secret".to_string();
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_missing_jwt_secret_rejected() {
        let settings = Settings::default();
        assert!(matches!(validate_settings(&settings), Err(MadSocialError::Config(_))));
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut settings = valid_settings();
        settings.auth.jwt_secret = "short".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_pool_bounds_checked() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        assert!(validate_settings(&settings).is_err());

        settings.database.min_connections = 1;
        settings.database.max_connections = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut settings = valid_settings();
        settings.logging.format = "xml".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_unknown_environment_rejected() {
        let mut settings = valid_settings();
        settings.server.environment = "staging".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
