//! Event repository implementation

use sqlx::PgPool;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::models::event::{Event, EventSummary, NewEvent};
use crate::utils::errors::MadSocialError;

const EVENT_COLUMNS: &str =
    "id, title, date, location, vibe_tags, description, category, created_at, updated_at";

/// Event columns plus pregame and attendee counts; callers append WHERE/GROUP BY
const SUMMARY_SELECT: &str = r#"
    SELECT e.id, e.title, e.date, e.location, e.vibe_tags, e.category,
           COUNT(DISTINCT p.id) AS pregame_count,
           COUNT(pa.user_id) AS total_attendees
    FROM events e
    LEFT JOIN pregames p ON p.event_id = e.id
    LEFT JOIN pregame_attendees pa ON pa.pregame_id = p.id
"#;

#[derive(Clone)]
#[derive(Debug)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(&self, event: NewEvent) -> Result<Event, MadSocialError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (id, title, date, location, vibe_tags, description, category, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(event.title)
        .bind(event.date)
        .bind(event.location)
        .bind(event.vibe_tags)
        .bind(event.description)
        .bind(event.category)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, MadSocialError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Check whether an event exists
    pub async fn exists(&self, id: Uuid) -> Result<bool, MadSocialError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 > 0)
    }

    /// Events dated in `[start, end)` with counts, earliest first
    pub async fn list_summaries_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<EventSummary>, MadSocialError> {
        let events = sqlx::query_as::<_, EventSummary>(&format!(
            "{SUMMARY_SELECT} WHERE e.date >= $1 AND e.date < $2 GROUP BY e.id ORDER BY e.date ASC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Events dated at or after `from` with counts, earliest first
    pub async fn list_summaries_from(&self, from: DateTime<Utc>, limit: i64) -> Result<Vec<EventSummary>, MadSocialError> {
        let events = sqlx::query_as::<_, EventSummary>(&format!(
            "{SUMMARY_SELECT} WHERE e.date >= $1 GROUP BY e.id ORDER BY e.date ASC LIMIT $2"
        ))
        .bind(from)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}
