//! Join request repository implementation

use sqlx::{FromRow, PgConnection, PgPool};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::models::join_request::{JoinInfo, JoinRequest, JoinRequestStatus, PendingRequestView};
use crate::models::user::ContactSummary;
use crate::utils::errors::MadSocialError;

const JOIN_REQUEST_COLUMNS: &str =
    "id, pregame_id, user_id, status, bringing, group_size, message, phone_number, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
struct PendingRequestRow {
    request_id: Uuid,
    status: JoinRequestStatus,
    bringing: Vec<String>,
    group_size: i32,
    message: Option<String>,
    phone_number: String,
    created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    user: ContactSummary,
}

impl From<PendingRequestRow> for PendingRequestView {
    fn from(row: PendingRequestRow) -> Self {
        Self {
            id: row.request_id,
            user: row.user,
            status: row.status,
            bringing: row.bringing,
            group_size: row.group_size,
            message: row.message,
            phone_number: row.phone_number,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
#[derive(Debug)]
pub struct JoinRequestRepository {
    pool: PgPool,
}

impl JoinRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find join request by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<JoinRequest>, MadSocialError> {
        let request = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {JOIN_REQUEST_COLUMNS} FROM join_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Pending requests of a pregame with requester contact details, oldest first
    pub async fn list_pending_with_users(&self, pregame_id: Uuid) -> Result<Vec<PendingRequestView>, MadSocialError> {
        let rows = sqlx::query_as::<_, PendingRequestRow>(
            r#"
            SELECT jr.id AS request_id, jr.status, jr.bringing, jr.group_size, jr.message, jr.phone_number, jr.created_at,
                   u.id, u.name, u.email, u.major, u.dorm, u.year, u.avatar_url
            FROM join_requests jr
            INNER JOIN users u ON u.id = jr.user_id
            WHERE jr.pregame_id = $1 AND jr.status = 'PENDING'
            ORDER BY jr.created_at ASC
            "#
        )
        .bind(pregame_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PendingRequestView::from).collect())
    }

    /// Pending request counts for several pregames; pregames without any are omitted
    pub async fn count_pending(&self, pregame_ids: &[Uuid]) -> Result<Vec<(Uuid, i64)>, MadSocialError> {
        let counts: Vec<(Uuid, i64)> = sqlx::query_as(
            r#"
            SELECT pregame_id, COUNT(*)
            FROM join_requests
            WHERE pregame_id = ANY($1) AND status = 'PENDING'
            GROUP BY pregame_id
            "#
        )
        .bind(pregame_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    /// Lock a join request row for the rest of the transaction
    pub async fn lock(&self, conn: &mut PgConnection, id: Uuid) -> Result<Option<JoinRequest>, sqlx::Error> {
        sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {JOIN_REQUEST_COLUMNS} FROM join_requests WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
    }

    /// Insert a join request with the given initial status
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        pregame_id: Uuid,
        user_id: Uuid,
        status: JoinRequestStatus,
        info: JoinInfo,
    ) -> Result<JoinRequest, sqlx::Error> {
        sqlx::query_as::<_, JoinRequest>(&format!(
            r#"
            INSERT INTO join_requests (id, pregame_id, user_id, status, bringing, group_size, message, phone_number, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {JOIN_REQUEST_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(pregame_id)
        .bind(user_id)
        .bind(status)
        .bind(info.bringing)
        .bind(info.group_size)
        .bind(info.message)
        .bind(info.phone_number)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await
    }

    /// Check if user has a pending request for the pregame
    pub async fn has_pending(&self, conn: &mut PgConnection, pregame_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM join_requests WHERE pregame_id = $1 AND user_id = $2 AND status = 'PENDING'"
        )
        .bind(pregame_id)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count.0 > 0)
    }

    /// Move a pending request to a terminal status
    ///
    /// Returns `None` when the row is no longer pending.
    pub async fn resolve(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        status: JoinRequestStatus,
    ) -> Result<Option<JoinRequest>, sqlx::Error> {
        sqlx::query_as::<_, JoinRequest>(&format!(
            r#"
            UPDATE join_requests
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status = 'PENDING'
            RETURNING {JOIN_REQUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(&mut *conn)
        .await
    }
}
