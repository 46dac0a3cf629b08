//! Join request model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::user::ContactSummary;
use crate::utils::errors::{FieldError, MadSocialError, Result};
use crate::utils::helpers::is_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "join_request_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinRequestStatus {
    Pending,
    Approved,
    Declined,
}

impl JoinRequestStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JoinRequestStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub id: Uuid,
    pub pregame_id: Uuid,
    pub user_id: Uuid,
    pub status: JoinRequestStatus,
    pub bringing: Vec<String>,
    pub group_size: i32,
    pub message: Option<String>,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a user submits when joining or asking to join
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinInfoRequest {
    #[serde(default)]
    pub bringing: Vec<String>,
    #[serde(default = "default_group_size")]
    pub group_size: i64,
    pub message: Option<String>,
    pub phone_number: String,
}

fn default_group_size() -> i64 {
    1
}

/// Validated join details recorded on the join request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinInfo {
    pub bringing: Vec<String>,
    pub group_size: i32,
    pub message: Option<String>,
    pub phone_number: String,
}

impl JoinInfoRequest {
    pub fn validate(self) -> Result<JoinInfo> {
        let mut errors = Vec::new();

        let group_size = i32::try_from(self.group_size).ok().filter(|size| *size >= 1);
        if group_size.is_none() {
            errors.push(FieldError::new("groupSize", "Group size must be a positive integer"));
        }
        if is_blank(&self.phone_number) {
            errors.push(FieldError::new("phoneNumber", "Phone number is required"));
        }

        match group_size {
            Some(group_size) if errors.is_empty() => Ok(JoinInfo {
                bringing: self.bringing,
                group_size,
                message: self.message,
                phone_number: self.phone_number,
            }),
            _ => Err(MadSocialError::Validation(errors)),
        }
    }
}

/// Body of approve/decline calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub request_id: String,
}

impl ReviewRequest {
    pub fn validate(&self) -> Result<Uuid> {
        if is_blank(&self.request_id) {
            return Err(MadSocialError::invalid_field("requestId", "Request ID is required"));
        }
        Uuid::parse_str(self.request_id.trim())
            .map_err(|_| MadSocialError::invalid_field("requestId", "Request ID is malformed"))
    }
}

/// Host decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Decline,
}

impl ReviewDecision {
    pub fn target_status(self) -> JoinRequestStatus {
        match self {
            ReviewDecision::Approve => JoinRequestStatus::Approved,
            ReviewDecision::Decline => JoinRequestStatus::Declined,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            ReviewDecision::Approve => "approve",
            ReviewDecision::Decline => "decline",
        }
    }
}

/// Pending request as shown on the host dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequestView {
    pub id: Uuid,
    pub user: ContactSummary,
    pub status: JoinRequestStatus,
    pub bringing: Vec<String>,
    pub group_size: i32,
    pub message: Option<String>,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

/// Plain confirmation body for membership mutations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
