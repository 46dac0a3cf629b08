//! HTTP handlers module
//!
//! One router per resource, mounted under `/api` by [`crate::server`]:
//! - users: signup, login, profiles
//! - events: catalog listings and detail
//! - pregames: creation and membership
//! - mutuals: overlap lists

pub mod error;
pub mod events;
pub mod health;
pub mod mutuals;
pub mod pregames;
pub mod users;

pub use error::{ApiError, ApiJson, ApiPath, ApiResult};
