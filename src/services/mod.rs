//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod event;
pub mod membership;
pub mod mutual;
pub mod user;

// Re-export commonly used services
pub use auth::{AuthContext, AuthService, Claims};
pub use event::EventService;
pub use membership::MembershipService;
pub use mutual::MutualService;
pub use user::UserService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;

/// Service factory for creating and managing all services
///
/// Every service shares the one storage handle passed in at startup.
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub event_service: EventService,
    pub membership_service: MembershipService,
    pub mutual_service: MutualService,
    database: DatabaseService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(database: DatabaseService, settings: &Settings) -> Self {
        let auth_service = AuthService::new(&settings.auth);
        let user_service = UserService::new(database.users.clone(), auth_service.clone());
        let membership_service = MembershipService::new(database.clone());
        let event_service = EventService::new(database.clone(), membership_service.clone());
        let mutual_service = MutualService::new(database.clone());

        Self {
            auth_service,
            user_service,
            event_service,
            membership_service,
            mutual_service,
            database,
        }
    }

    pub fn database(&self) -> &DatabaseService {
        &self.database
    }
}
