//! Test database helper utilities
//!
//! Provides a migrated PostgreSQL database for integration tests, either from
//! `TEST_DATABASE_URL` or a throwaway testcontainers instance. When neither is
//! available the helper returns `None` and the calling test skips.

use std::sync::Once;

use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres as PostgresImage;

use madsocial::database::{run_migrations, DatabaseService};

static INIT: Once = Once::new();

/// Test database helper that manages PostgreSQL test database setup
pub struct TestDatabase {
    pub pool: PgPool,
    pub database_url: String,
    _container: Option<ContainerAsync<PostgresImage>>,
}

impl TestDatabase {
    /// Connect to a migrated test database, or `None` if none can be provided
    pub async fn try_new() -> Option<Self> {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter("madsocial=debug")
                .with_test_writer()
                .try_init();
        });

        let (database_url, container) = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => (url, None),
            Err(_) => match Self::start_container().await {
                Ok(started) => started,
                Err(e) => {
                    eprintln!("skipping database test: no TEST_DATABASE_URL and no container ({e})");
                    return None;
                }
            },
        };

        let pool = match PgPool::connect(&database_url).await {
            Ok(pool) => pool,
            Err(e) => {
                eprintln!("skipping database test: cannot connect to {database_url} ({e})");
                return None;
            }
        };

        run_migrations(&pool).await.expect("Failed to run migrations");

        Some(Self {
            pool,
            database_url,
            _container: container,
        })
    }

    async fn start_container() -> Result<(String, Option<ContainerAsync<PostgresImage>>), Box<dyn std::error::Error>> {
        let container = PostgresImage::default()
            .with_db_name("test_madsocial")
            .with_user("test_user")
            .with_password("test_password")
            .start()
            .await?;
        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(5432).await?;

        let url = format!("postgresql://test_user:test_password@{host}:{port}/test_madsocial");
        Ok((url, Some(container)))
    }

    pub fn service(&self) -> DatabaseService {
        DatabaseService::new(self.pool.clone())
    }

    /// Current attendee ids of a pregame
    pub async fn attendees(&self, pregame_id: uuid::Uuid) -> Vec<uuid::Uuid> {
        self.service()
            .pregames
            .attendee_ids(pregame_id)
            .await
            .expect("Failed to load attendees")
    }

    /// Count rows of a table
    pub async fn count_records(&self, table: &str) -> i64 {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count records");
        count.0
    }
}
