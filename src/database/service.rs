//! Database service layer
//!
//! This module bundles the repositories around one shared pool. It is built
//! once at startup and cloned into every service.

use sqlx::{Postgres, Transaction};
use crate::database::{DatabasePool, UserRepository, EventRepository, PregameRepository, JoinRequestRepository};
use crate::utils::errors::MadSocialError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    pub users: UserRepository,
    pub events: EventRepository,
    pub pregames: PregameRepository,
    pub join_requests: JoinRequestRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            pregames: PregameRepository::new(pool.clone()),
            join_requests: JoinRequestRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Open a transaction on the shared pool
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Check that the database answers queries
    pub async fn health_check(&self) -> Result<(), MadSocialError> {
        super::connection::health_check(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_lazy_pool, PoolConfig};

    #[tokio::test]
    async fn test_database_service_creation() {
        let config = PoolConfig {
            url: "postgresql://test@127.0.0.1:1/test".to_string(),
            min_connections: 0,
            ..PoolConfig::default()
        };
        let pool = create_lazy_pool(&config).unwrap();
        let service = DatabaseService::new(pool);
        assert!(!service.pool().is_closed());
    }
}
