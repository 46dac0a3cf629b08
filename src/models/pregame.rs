//! Pregame model

use serde::{Deserialize, Serialize, Serializer};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

use crate::models::join_request::PendingRequestView;
use crate::models::user::{ContactSummary, HostSummary, UserSummary};
use crate::utils::errors::{FieldError, MadSocialError, Result};
use crate::utils::helpers::{is_blank, parse_datetime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "access_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessType {
    #[default]
    Open,
    RequestOnly,
}

/// Attendee limit of a pregame
///
/// Stored as a nullable positive `INTEGER`; `Unlimited` is never confused with
/// a zero limit and a limit always fits the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capacity {
    #[default]
    Unlimited,
    Limited(i32),
}

#[derive(Debug, Error)]
#[error("invalid pregame capacity: {0}")]
pub struct InvalidCapacity(pub i64);

impl Capacity {
    pub fn limited(limit: i64) -> std::result::Result<Self, InvalidCapacity> {
        match i32::try_from(limit) {
            Ok(n) if n > 0 => Ok(Capacity::Limited(n)),
            _ => Err(InvalidCapacity(limit)),
        }
    }

    /// Whether one more attendee fits given the current count
    pub fn has_room(self, attendee_count: i64) -> bool {
        match self {
            Capacity::Unlimited => true,
            Capacity::Limited(limit) => attendee_count < i64::from(limit),
        }
    }

    pub fn to_column(self) -> Option<i32> {
        match self {
            Capacity::Unlimited => None,
            Capacity::Limited(limit) => Some(limit),
        }
    }
}

impl TryFrom<Option<i32>> for Capacity {
    type Error = InvalidCapacity;

    fn try_from(value: Option<i32>) -> std::result::Result<Self, Self::Error> {
        match value {
            None => Ok(Capacity::Unlimited),
            Some(limit) => Capacity::limited(i64::from(limit)),
        }
    }
}

impl Serialize for Capacity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Capacity::Unlimited => serializer.serialize_none(),
            Capacity::Limited(limit) => serializer.serialize_i32(*limit),
        }
    }
}

/// Badge shown on pregame cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PregameStatus {
    Open,
    RequestOnly,
    Full,
}

impl PregameStatus {
    pub fn derive(access_type: AccessType, capacity: Capacity, attendee_count: i64) -> Self {
        if !capacity.has_room(attendee_count) {
            return PregameStatus::Full;
        }
        match access_type {
            AccessType::Open => PregameStatus::Open,
            AccessType::RequestOnly => PregameStatus::RequestOnly,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pregame {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub meeting_time: DateTime<Utc>,
    pub meeting_location: String,
    pub access_type: AccessType,
    #[sqlx(try_from = "Option<i32>")]
    pub capacity: Capacity,
    pub phone_number: String,
    pub requirements: Option<String>,
    pub event_id: Uuid,
    pub host_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePregameRequest {
    pub title: String,
    pub description: Option<String>,
    pub meeting_time: String,
    pub meeting_location: String,
    #[serde(default)]
    pub access_type: AccessType,
    pub capacity: Option<i64>,
    pub phone_number: String,
    pub requirements: Option<String>,
    pub event_id: String,
}

/// Validated pregame ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewPregame {
    pub title: String,
    pub description: Option<String>,
    pub meeting_time: DateTime<Utc>,
    pub meeting_location: String,
    pub access_type: AccessType,
    pub capacity: Capacity,
    pub phone_number: String,
    pub requirements: Option<String>,
    pub event_id: Uuid,
}

impl CreatePregameRequest {
    pub fn validate(self) -> Result<NewPregame> {
        let mut errors = Vec::new();

        if is_blank(&self.title) {
            errors.push(FieldError::new("title", "Title is required"));
        }
        let meeting_time = parse_datetime(&self.meeting_time);
        if meeting_time.is_none() {
            errors.push(FieldError::new("meetingTime", "Invalid meeting time format"));
        }
        if is_blank(&self.meeting_location) {
            errors.push(FieldError::new("meetingLocation", "Meeting location is required"));
        }
        let capacity = match self.capacity {
            None => Some(Capacity::Unlimited),
            Some(limit) => Capacity::limited(limit).ok(),
        };
        if capacity.is_none() {
            errors.push(FieldError::new("capacity", "Capacity must be a positive integer"));
        }
        if is_blank(&self.phone_number) {
            errors.push(FieldError::new("phoneNumber", "Phone number is required"));
        }
        let event_id = if is_blank(&self.event_id) {
            errors.push(FieldError::new("eventId", "Event ID is required"));
            None
        } else {
            let parsed = Uuid::parse_str(self.event_id.trim()).ok();
            if parsed.is_none() {
                errors.push(FieldError::new("eventId", "Event ID is malformed"));
            }
            parsed
        };

        match (meeting_time, capacity, event_id) {
            (Some(meeting_time), Some(capacity), Some(event_id)) if errors.is_empty() => {
                Ok(NewPregame {
                    title: self.title,
                    description: self.description,
                    meeting_time,
                    meeting_location: self.meeting_location,
                    access_type: self.access_type,
                    capacity,
                    phone_number: self.phone_number,
                    requirements: self.requirements,
                    event_id,
                })
            }
            _ => Err(MadSocialError::Validation(errors)),
        }
    }
}

/// Pregame card as returned by listing and event-detail reads
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PregameSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub meeting_time: DateTime<Utc>,
    pub meeting_location: String,
    pub access_type: AccessType,
    pub capacity: Capacity,
    pub event_id: Uuid,
    pub status: PregameStatus,
    pub host: HostSummary,
    pub attendee_count: i64,
    pub attendees: Vec<UserSummary>,
    /// Present only when the viewer hosts this pregame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_pending: Option<i64>,
}

impl PregameSummary {
    pub fn assemble(pregame: Pregame, host: HostSummary, attendees: Vec<UserSummary>) -> Self {
        let attendee_count = attendees.len() as i64;
        Self {
            status: PregameStatus::derive(pregame.access_type, pregame.capacity, attendee_count),
            id: pregame.id,
            title: pregame.title,
            description: pregame.description,
            meeting_time: pregame.meeting_time,
            meeting_location: pregame.meeting_location,
            access_type: pregame.access_type,
            capacity: pregame.capacity,
            event_id: pregame.event_id,
            host,
            attendee_count,
            attendees,
            requests_pending: None,
        }
    }
}

/// Host-only dashboard for one pregame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostView {
    pub id: Uuid,
    pub title: String,
    pub attendees: Vec<ContactSummary>,
    pub join_requests: Vec<PendingRequestView>,
}

/// Pregames the caller hosts and attends
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyPregames {
    pub hosting: Vec<PregameSummary>,
    pub attending: Vec<PregameSummary>,
}
