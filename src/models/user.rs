//! User model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::errors::{FieldError, MadSocialError, Result};
use crate::utils::helpers::{is_blank, is_valid_email, is_valid_url};

/// Shortest accepted signup password
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "academic_year")]
pub enum AcademicYear {
    Freshman,
    Sophomore,
    Junior,
    Senior,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub year: AcademicYear,
    pub major: String,
    pub dorm: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes compared when computing mutual overlaps
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct OverlapProfile {
    pub dorm: String,
    pub major: String,
    pub year: AcademicYear,
}

/// Host snippet shown on pregame cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HostSummary {
    pub id: Uuid,
    pub name: String,
    pub major: String,
    pub dorm: String,
    pub avatar_url: Option<String>,
}

/// Attendee snippet shown on pregame cards and mutual lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub major: String,
    pub dorm: String,
    pub year: AcademicYear,
    pub avatar_url: Option<String>,
}

/// Attendee snippet with contact email, visible to the host only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub major: String,
    pub dorm: String,
    pub year: AcademicYear,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub year: AcademicYear,
    pub major: String,
    pub dorm: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub year: Option<AcademicYear>,
    pub major: Option<String>,
    pub dorm: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Row inserted at signup
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub year: AcademicYear,
    pub major: String,
    pub dorm: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Empty avatar strings are treated as "no avatar"
fn normalize_avatar(avatar_url: Option<String>) -> Option<String> {
    avatar_url.filter(|url| !url.is_empty())
}

fn check_avatar(avatar_url: &Option<String>, errors: &mut Vec<FieldError>) {
    if let Some(url) = avatar_url {
        if !url.is_empty() && !is_valid_url(url) {
            errors.push(FieldError::new("avatarUrl", "Invalid URL"));
        }
    }
}

fn finish(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(MadSocialError::Validation(errors))
    }
}

impl SignupRequest {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if is_blank(&self.name) {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Invalid email address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        if is_blank(&self.major) {
            errors.push(FieldError::new("major", "Major is required"));
        }
        if is_blank(&self.dorm) {
            errors.push(FieldError::new("dorm", "Dorm is required"));
        }
        check_avatar(&self.avatar_url, &mut errors);

        finish(errors)
    }

    /// Build the insert row once the password has been hashed
    pub fn into_create_request(self, password_hash: String) -> CreateUserRequest {
        CreateUserRequest {
            email: self.email,
            password_hash,
            name: self.name,
            year: self.year,
            major: self.major,
            dorm: self.dorm,
            bio: self.bio,
            avatar_url: normalize_avatar(self.avatar_url),
        }
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Invalid email address"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }

        finish(errors)
    }
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        let required = [("name", &self.name), ("major", &self.major), ("dorm", &self.dorm)];
        for (field, value) in required {
            if matches!(value, Some(v) if is_blank(v)) {
                errors.push(FieldError::new(field, "Field cannot be empty"));
            }
        }
        check_avatar(&self.avatar_url, &mut errors);

        finish(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupRequest {
        SignupRequest {
            name: "Bucky Badger".to_string(),
            email: "bucky@wisc.edu".to_string(),
            password: "secret1".to_string(),
            year: AcademicYear::Junior,
            major: "Computer Science".to_string(),
            dorm: "Witte".to_string(),
            bio: None,
            avatar_url: Some(String::new()),
        }
    }

    #[test]
    fn test_valid_signup() {
        assert!(signup().validate().is_ok());
    }

    #[test]
    fn test_signup_collects_every_field_error() {
        let mut request = signup();
        request.email = "not-an-email".to_string();
        request.password = "123".to_string();
        request.dorm = "  ".to_string();

        match request.validate() {
            Err(MadSocialError::Validation(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["email", "password", "dorm"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_avatar_is_dropped() {
        let create = signup().into_create_request("hash".to_string());
        assert_eq!(create.avatar_url, None);
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.co".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            name: "A".to_string(),
            year: AcademicYear::Senior,
            major: "Math".to_string(),
            dorm: "Sellery".to_string(),
            bio: None,
            avatar_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["avatarUrl"], serde_json::Value::Null);
        assert_eq!(json["year"], "Senior");
    }

    #[test]
    fn test_update_profile_rejects_blank_fields() {
        let request = UpdateProfileRequest {
            major: Some(String::new()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
        assert!(UpdateProfileRequest::default().validate().is_ok());
    }
}
