//! Event model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::pregame::PregameSummary;
use crate::utils::errors::{FieldError, MadSocialError, Result};
use crate::utils::helpers::{is_blank, parse_datetime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_category")]
pub enum EventCategory {
    #[default]
    Party,
    #[serde(rename = "Bar/Club")]
    #[sqlx(rename = "Bar/Club")]
    BarClub,
    Game,
    Concert,
    #[serde(rename = "House Event")]
    #[sqlx(rename = "House Event")]
    HouseEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub vibe_tags: Vec<String>,
    pub description: Option<String>,
    pub category: EventCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event with aggregate counts, as listed on the today/upcoming pages
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub vibe_tags: Vec<String>,
    pub category: EventCategory,
    pub pregame_count: i64,
    pub total_attendees: i64,
}

/// Event with its pregames fully assembled
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub vibe_tags: Vec<String>,
    pub description: Option<String>,
    pub category: EventCategory,
    pub pregames: Vec<PregameSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub date: String,
    pub location: String,
    #[serde(default)]
    pub vibe_tags: Vec<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub category: EventCategory,
}

/// Validated event ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub vibe_tags: Vec<String>,
    pub description: Option<String>,
    pub category: EventCategory,
}

impl CreateEventRequest {
    pub fn validate(self) -> Result<NewEvent> {
        let mut errors = Vec::new();

        if is_blank(&self.title) {
            errors.push(FieldError::new("title", "Title is required"));
        }
        if is_blank(&self.location) {
            errors.push(FieldError::new("location", "Location is required"));
        }
        let date = parse_datetime(&self.date);
        if date.is_none() {
            errors.push(FieldError::new("date", "Invalid date format"));
        }

        match date {
            Some(date) if errors.is_empty() => Ok(NewEvent {
                title: self.title,
                date,
                location: self.location,
                vibe_tags: self.vibe_tags,
                description: self.description,
                category: self.category,
            }),
            _ => Err(MadSocialError::Validation(errors)),
        }
    }
}

impl Event {
    pub fn into_detail(self, pregames: Vec<PregameSummary>) -> EventDetail {
        EventDetail {
            id: self.id,
            title: self.title,
            date: self.date,
            location: self.location,
            vibe_tags: self.vibe_tags,
            description: self.description,
            category: self.category,
            pregames,
        }
    }
}
