//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod event;
pub mod pregame;
pub mod join_request;
pub mod mutual;

// Re-export commonly used models
pub use user::{User, AcademicYear, OverlapProfile, HostSummary, UserSummary, ContactSummary, SignupRequest, LoginRequest, UpdateProfileRequest, CreateUserRequest, AuthResponse};
pub use event::{Event, EventCategory, EventSummary, EventDetail, CreateEventRequest, NewEvent};
pub use pregame::{Pregame, AccessType, Capacity, PregameStatus, CreatePregameRequest, NewPregame, PregameSummary, HostView, MyPregames};
pub use join_request::{JoinRequest, JoinRequestStatus, JoinInfoRequest, JoinInfo, ReviewRequest, ReviewDecision, PendingRequestView, MessageResponse};
pub use mutual::{MutualOverlap, OverlapLabel};
