//! User repository implementation

use sqlx::PgPool;
use chrono::Utc;
use uuid::Uuid;
use crate::models::user::{User, CreateUserRequest, UpdateProfileRequest, OverlapProfile, UserSummary};
use crate::utils::errors::MadSocialError;

const USER_COLUMNS: &str =
    "id, email, password_hash, name, year, major, dorm, bio, avatar_url, created_at, updated_at";

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, MadSocialError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, name, year, major, dorm, bio, avatar_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(request.email)
        .bind(request.password_hash)
        .bind(request.name)
        .bind(request.year)
        .bind(request.major)
        .bind(request.dorm)
        .bind(request.bio)
        .bind(request.avatar_url)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, MadSocialError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, MadSocialError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check whether an email is already registered
    pub async fn email_exists(&self, email: &str) -> Result<bool, MadSocialError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 > 0)
    }

    /// Update mutable profile fields
    pub async fn update_profile(&self, id: Uuid, request: UpdateProfileRequest) -> Result<User, MadSocialError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                year = COALESCE($3, year),
                major = COALESCE($4, major),
                dorm = COALESCE($5, dorm),
                bio = COALESCE($6, bio),
                avatar_url = COALESCE(NULLIF($7, ''), avatar_url),
                updated_at = $8
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name)
        .bind(request.year)
        .bind(request.major)
        .bind(request.dorm)
        .bind(request.bio)
        .bind(request.avatar_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| MadSocialError::not_found(crate::utils::errors::Entity::User, id))
    }

    /// Comparison attributes of one user
    pub async fn find_overlap_profile(&self, id: Uuid) -> Result<Option<OverlapProfile>, MadSocialError> {
        let profile = sqlx::query_as::<_, OverlapProfile>(
            "SELECT dorm, major, year FROM users WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Display snippets for a set of users, ordered by name
    pub async fn find_summaries(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, MadSocialError> {
        let users = sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, major, dorm, year, avatar_url FROM users WHERE id = ANY($1) ORDER BY name ASC, id ASC"
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
