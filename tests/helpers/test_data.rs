//! Test data helpers for creating test objects
//!
//! Users get fake names and unique emails; events and pregames are created
//! through the repositories so each test owns its rows.

use chrono::{Duration, Utc};
use fake::faker::name::en::Name;
use fake::Fake;
use uuid::Uuid;

use madsocial::config::Settings;
use madsocial::database::DatabaseService;
use madsocial::models::event::{Event, EventCategory, NewEvent};
use madsocial::models::join_request::JoinInfo;
use madsocial::models::pregame::{AccessType, Capacity, NewPregame, Pregame};
use madsocial::models::user::{AcademicYear, CreateUserRequest, User};

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789";

/// Settings suitable for tests
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = TEST_JWT_SECRET.to_string();
    settings.server.environment = "test".to_string();
    settings
}

/// Profile attributes for a test user
#[derive(Debug, Clone)]
pub struct Profile {
    pub dorm: &'static str,
    pub major: &'static str,
    pub year: AcademicYear,
}

impl Profile {
    pub const fn new(dorm: &'static str, major: &'static str, year: AcademicYear) -> Self {
        Self { dorm, major, year }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new("Witte", "Computer Science", AcademicYear::Junior)
    }
}

/// Insert a user with a fake name and a unique email
pub async fn create_user(db: &DatabaseService, profile: Profile) -> User {
    let name: String = Name().fake();
    let email = format!("{}@test.wisc.edu", Uuid::new_v4().simple());

    db.users
        .create(CreateUserRequest {
            email,
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            name,
            year: profile.year,
            major: profile.major.to_string(),
            dorm: profile.dorm.to_string(),
            bio: None,
            avatar_url: None,
        })
        .await
        .expect("Failed to create test user")
}

/// Insert several users sharing one profile
pub async fn create_users(db: &DatabaseService, count: usize) -> Vec<User> {
    let mut users = Vec::with_capacity(count);
    for _ in 0..count {
        users.push(create_user(db, Profile::default()).await);
    }
    users
}

/// Insert an event dated later today
pub async fn create_event(db: &DatabaseService) -> Event {
    db.events
        .create(NewEvent {
            title: "Camp Randall Game Day".to_string(),
            date: Utc::now() + Duration::minutes(5),
            location: "Camp Randall Stadium".to_string(),
            vibe_tags: vec!["loud".to_string()],
            description: None,
            category: EventCategory::Game,
        })
        .await
        .expect("Failed to create test event")
}

pub fn new_pregame(event_id: Uuid, access_type: AccessType, capacity: Capacity) -> NewPregame {
    NewPregame {
        title: "Tailgate on Regent".to_string(),
        description: Some("Bring chairs".to_string()),
        meeting_time: Utc::now() + Duration::hours(2),
        meeting_location: "1400 Regent St".to_string(),
        access_type,
        capacity,
        phone_number: "608-555-0100".to_string(),
        requirements: None,
        event_id,
    }
}

/// Insert a pregame hosted by `host_id`
pub async fn create_pregame(
    db: &DatabaseService,
    host_id: Uuid,
    event_id: Uuid,
    access_type: AccessType,
    capacity: Capacity,
) -> Pregame {
    db.pregames
        .create(host_id, new_pregame(event_id, access_type, capacity))
        .await
        .expect("Failed to create test pregame")
}

pub fn join_info() -> JoinInfo {
    JoinInfo {
        bringing: vec!["snacks".to_string()],
        group_size: 1,
        message: Some("Count me in".to_string()),
        phone_number: "608-555-0199".to_string(),
    }
}
