//! Pregame repository implementation

use sqlx::{FromRow, PgConnection, PgPool};
use chrono::Utc;
use uuid::Uuid;
use crate::models::pregame::{NewPregame, Pregame};
use crate::models::user::{ContactSummary, HostSummary, UserSummary};
use crate::utils::errors::MadSocialError;

const PREGAME_COLUMNS: &str = "id, title, description, meeting_time, meeting_location, access_type, capacity, phone_number, requirements, event_id, host_id, created_at, updated_at";

/// Attendee snippet tagged with the pregame it belongs to
#[derive(Debug, Clone, FromRow)]
pub struct AttendeeRow {
    pub pregame_id: Uuid,
    #[sqlx(flatten)]
    pub user: UserSummary,
}

#[derive(Clone)]
#[derive(Debug)]
pub struct PregameRepository {
    pool: PgPool,
}

impl PregameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new pregame hosted by `host_id`
    pub async fn create(&self, host_id: Uuid, pregame: NewPregame) -> Result<Pregame, MadSocialError> {
        let pregame = sqlx::query_as::<_, Pregame>(&format!(
            r#"
            INSERT INTO pregames (id, title, description, meeting_time, meeting_location, access_type, capacity, phone_number, requirements, event_id, host_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            RETURNING {PREGAME_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(pregame.title)
        .bind(pregame.description)
        .bind(pregame.meeting_time)
        .bind(pregame.meeting_location)
        .bind(pregame.access_type)
        .bind(pregame.capacity.to_column())
        .bind(pregame.phone_number)
        .bind(pregame.requirements)
        .bind(pregame.event_id)
        .bind(host_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(pregame)
    }

    /// Find pregame by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Pregame>, MadSocialError> {
        let pregame = sqlx::query_as::<_, Pregame>(&format!(
            "SELECT {PREGAME_COLUMNS} FROM pregames WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pregame)
    }

    /// Pregames of an event, earliest meeting first
    pub async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Pregame>, MadSocialError> {
        let pregames = sqlx::query_as::<_, Pregame>(&format!(
            "SELECT {PREGAME_COLUMNS} FROM pregames WHERE event_id = $1 ORDER BY meeting_time ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(pregames)
    }

    /// Pregames hosted by a user, earliest meeting first
    pub async fn list_hosted_by(&self, user_id: Uuid) -> Result<Vec<Pregame>, MadSocialError> {
        let pregames = sqlx::query_as::<_, Pregame>(&format!(
            "SELECT {PREGAME_COLUMNS} FROM pregames WHERE host_id = $1 ORDER BY meeting_time ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(pregames)
    }

    /// Pregames a user attends, earliest meeting first
    pub async fn list_attended_by(&self, user_id: Uuid) -> Result<Vec<Pregame>, MadSocialError> {
        let pregames = sqlx::query_as::<_, Pregame>(
            r#"
            SELECT p.id, p.title, p.description, p.meeting_time, p.meeting_location, p.access_type, p.capacity,
                   p.phone_number, p.requirements, p.event_id, p.host_id, p.created_at, p.updated_at
            FROM pregames p
            INNER JOIN pregame_attendees pa ON pa.pregame_id = p.id
            WHERE pa.user_id = $1
            ORDER BY p.meeting_time ASC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(pregames)
    }

    /// Host snippets for a set of user ids
    pub async fn find_hosts(&self, host_ids: &[Uuid]) -> Result<Vec<HostSummary>, MadSocialError> {
        let hosts = sqlx::query_as::<_, HostSummary>(
            "SELECT id, name, major, dorm, avatar_url FROM users WHERE id = ANY($1)"
        )
        .bind(host_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(hosts)
    }

    /// Attendees of several pregames, in join order
    pub async fn find_attendees(&self, pregame_ids: &[Uuid]) -> Result<Vec<AttendeeRow>, MadSocialError> {
        let rows = sqlx::query_as::<_, AttendeeRow>(
            r#"
            SELECT pa.pregame_id, u.id, u.name, u.major, u.dorm, u.year, u.avatar_url
            FROM pregame_attendees pa
            INNER JOIN users u ON u.id = pa.user_id
            WHERE pa.pregame_id = ANY($1)
            ORDER BY pa.joined_at ASC, u.id ASC
            "#
        )
        .bind(pregame_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Attendees of one pregame including contact email
    pub async fn find_attendee_contacts(&self, pregame_id: Uuid) -> Result<Vec<ContactSummary>, MadSocialError> {
        let rows = sqlx::query_as::<_, ContactSummary>(
            r#"
            SELECT u.id, u.name, u.email, u.major, u.dorm, u.year, u.avatar_url
            FROM pregame_attendees pa
            INNER JOIN users u ON u.id = pa.user_id
            WHERE pa.pregame_id = $1
            ORDER BY pa.joined_at ASC, u.id ASC
            "#
        )
        .bind(pregame_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Attendee ids of one pregame
    pub async fn attendee_ids(&self, pregame_id: Uuid) -> Result<Vec<Uuid>, MadSocialError> {
        let ids: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT user_id FROM pregame_attendees WHERE pregame_id = $1 ORDER BY joined_at ASC"
        )
        .bind(pregame_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    /// Distinct attendee ids across every pregame of an event
    pub async fn attendee_ids_for_event(&self, event_id: Uuid) -> Result<Vec<Uuid>, MadSocialError> {
        let ids: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT pa.user_id
            FROM pregame_attendees pa
            INNER JOIN pregames p ON p.id = pa.pregame_id
            WHERE p.event_id = $1
            "#
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    /// Lock a pregame row for the rest of the transaction
    ///
    /// Every mutation that adds an attendee or files a request takes this lock
    /// first, so capacity checks and membership writes on one pregame are
    /// serialized.
    pub async fn lock(&self, conn: &mut PgConnection, id: Uuid) -> Result<Option<Pregame>, sqlx::Error> {
        sqlx::query_as::<_, Pregame>(&format!(
            "SELECT {PREGAME_COLUMNS} FROM pregames WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
    }

    /// Current attendee count
    pub async fn count_attendees(&self, conn: &mut PgConnection, pregame_id: Uuid) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pregame_attendees WHERE pregame_id = $1")
            .bind(pregame_id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count.0)
    }

    /// Check if user attends the pregame
    pub async fn is_attendee(&self, conn: &mut PgConnection, pregame_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM pregame_attendees WHERE pregame_id = $1 AND user_id = $2"
        )
        .bind(pregame_id)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count.0 > 0)
    }

    /// Add a user to the attendee set
    pub async fn add_attendee(&self, conn: &mut PgConnection, pregame_id: Uuid, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO pregame_attendees (pregame_id, user_id, joined_at) VALUES ($1, $2, $3)")
            .bind(pregame_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
