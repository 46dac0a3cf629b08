//! Database repositories module
//!
//! This module contains all repository implementations for data access.
//! Methods that must run inside a caller-owned transaction take a
//! `&mut PgConnection` instead of using the pool.

pub mod user;
pub mod event;
pub mod pregame;
pub mod join_request;

// Re-export repositories
pub use user::UserRepository;
pub use event::EventRepository;
pub use pregame::PregameRepository;
pub use join_request::JoinRequestRepository;
