//! Error handling for MadSocial
//!
//! This module defines the main error type used throughout the application.
//! Business-rule violations are a closed set of variants; the HTTP layer maps
//! each one to a status code and a user-safe message.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Postgres SQLSTATE for a serialization failure
const SERIALIZATION_FAILURE: &str = "40001";
/// Postgres SQLSTATE for a detected deadlock
const DEADLOCK_DETECTED: &str = "40P01";

/// A single invalid field in a request payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Kinds of entities that can be looked up and missed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Event,
    Pregame,
    JoinRequest,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::User => write!(f, "User"),
            Entity::Event => write!(f, "Event"),
            Entity::Pregame => write!(f, "Pregame"),
            Entity::JoinRequest => write!(f, "Join request"),
        }
    }
}

/// Main error type for MadSocial application
#[derive(Error, Debug)]
pub enum MadSocialError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error")]
    Validation(Vec<FieldError>),

    #[error("{entity} not found")]
    NotFound { entity: Entity, id: Option<Uuid> },

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Pregame is at full capacity")]
    CapacityExceeded,

    #[error("{0}")]
    Authentication(String),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for MadSocial operations
pub type Result<T> = std::result::Result<T, MadSocialError>;

impl MadSocialError {
    pub fn not_found(entity: Entity, id: Uuid) -> Self {
        MadSocialError::NotFound { entity, id: Some(id) }
    }

    /// Single-field validation failure
    pub fn invalid_field(field: &str, message: &str) -> Self {
        MadSocialError::Validation(vec![FieldError::new(field, message)])
    }

    /// Convert a storage error raised inside a membership transaction.
    ///
    /// Unique-constraint races and aborted transactions become `Conflict`;
    /// everything else stays an internal database error.
    pub fn from_transaction(error: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_error) = error {
            if db_error.is_unique_violation() {
                return MadSocialError::Conflict(conflict_message.to_string());
            }
            if matches!(
                db_error.code().as_deref(),
                Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED)
            ) {
                return MadSocialError::Conflict(
                    "The pregame was updated concurrently, please retry".to_string(),
                );
            }
        }
        MadSocialError::Database(error)
    }

    /// Check if the error is recoverable by retrying the same call
    pub fn is_recoverable(&self) -> bool {
        match self {
            MadSocialError::Database(_) => false,
            MadSocialError::Migration(_) => false,
            MadSocialError::Config(_) => false,
            MadSocialError::Validation(_) => false,
            MadSocialError::NotFound { .. } => false,
            MadSocialError::Forbidden(_) => false,
            MadSocialError::Conflict(_) => true,
            MadSocialError::InvalidState(_) => false,
            MadSocialError::CapacityExceeded => false,
            MadSocialError::Authentication(_) => false,
            MadSocialError::Token(_) => false,
            MadSocialError::PasswordHash(_) => false,
            MadSocialError::Serialization(_) => false,
            MadSocialError::Io(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MadSocialError::Database(_) => ErrorSeverity::Critical,
            MadSocialError::Migration(_) => ErrorSeverity::Critical,
            MadSocialError::Config(_) => ErrorSeverity::Critical,
            MadSocialError::Forbidden(_) => ErrorSeverity::Warning,
            MadSocialError::Authentication(_) => ErrorSeverity::Warning,
            MadSocialError::Validation(_)
            | MadSocialError::NotFound { .. }
            | MadSocialError::Conflict(_)
            | MadSocialError::InvalidState(_)
            | MadSocialError::CapacityExceeded => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// HTTP status code for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            MadSocialError::Validation(_)
            | MadSocialError::Conflict(_)
            | MadSocialError::InvalidState(_)
            | MadSocialError::CapacityExceeded => 400,
            MadSocialError::Authentication(_) => 401,
            MadSocialError::Forbidden(_) => 403,
            MadSocialError::NotFound { .. } => 404,
            _ => 500,
        }
    }

    /// Whether the message may be shown to API clients as-is
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
