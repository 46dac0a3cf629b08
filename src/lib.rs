//! MadSocial API
//!
//! Backend for campus event coordination. Users browse events, host or join
//! smaller "pregame" gatherings attached to them, and see which attendees
//! share their dorm, major or year.

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{MadSocialError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use server::{router, AppState};
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
