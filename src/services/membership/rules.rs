//! Membership rules
//!
//! Pure checks run against a snapshot of a locked pregame. They decide whether
//! a mutation may proceed; the caller performs the writes inside the same
//! transaction that produced the snapshot.

use uuid::Uuid;

use crate::models::join_request::{JoinRequestStatus, ReviewDecision};
use crate::models::pregame::{AccessType, Capacity, Pregame};
use crate::utils::errors::{MadSocialError, Result};

/// Membership-relevant state of one pregame at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PregameState {
    pub host_id: Uuid,
    pub access_type: AccessType,
    pub capacity: Capacity,
    pub attendee_count: i64,
}

impl PregameState {
    pub fn of(pregame: &Pregame, attendee_count: i64) -> Self {
        Self {
            host_id: pregame.host_id,
            access_type: pregame.access_type,
            capacity: pregame.capacity,
            attendee_count,
        }
    }

    pub fn has_room(&self) -> bool {
        self.capacity.has_room(self.attendee_count)
    }
}

/// Who is asking and what they already have on this pregame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub user_id: Uuid,
    pub is_attendee: bool,
    pub has_pending_request: bool,
}

/// The request a host is reviewing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestState {
    pub status: JoinRequestStatus,
}

fn ensure_not_member(pregame: &PregameState, member: &Membership) -> Result<()> {
    if member.user_id == pregame.host_id {
        return Err(MadSocialError::Conflict(
            "You are hosting this pregame".to_string(),
        ));
    }
    if member.is_attendee {
        return Err(MadSocialError::Conflict(
            "You are already attending this pregame".to_string(),
        ));
    }
    Ok(())
}

/// Joining an OPEN pregame directly
pub fn check_open_join(pregame: &PregameState, member: &Membership) -> Result<()> {
    if pregame.access_type != AccessType::Open {
        return Err(MadSocialError::InvalidState(
            "This pregame requires a join request".to_string(),
        ));
    }
    ensure_not_member(pregame, member)?;
    if !pregame.has_room() {
        return Err(MadSocialError::CapacityExceeded);
    }
    Ok(())
}

/// Filing a request on a REQUEST_ONLY pregame
///
/// Capacity is not checked here; it is checked when the host approves.
pub fn check_join_request(pregame: &PregameState, member: &Membership) -> Result<()> {
    if pregame.access_type != AccessType::RequestOnly {
        return Err(MadSocialError::InvalidState(
            "This pregame does not require a join request. Use join instead.".to_string(),
        ));
    }
    ensure_not_member(pregame, member)?;
    if member.has_pending_request {
        return Err(MadSocialError::Conflict(
            "You already have a pending request for this pregame".to_string(),
        ));
    }
    Ok(())
}

/// Host approving or declining a request
pub fn check_review(
    pregame: &PregameState,
    request: &RequestState,
    acting_host_id: Uuid,
    decision: ReviewDecision,
) -> Result<()> {
    if pregame.host_id != acting_host_id {
        return Err(MadSocialError::Forbidden(format!(
            "Only the host can {} join requests",
            decision.verb()
        )));
    }
    if request.status.is_terminal() {
        return Err(MadSocialError::InvalidState(
            "This request has already been processed".to_string(),
        ));
    }
    if decision == ReviewDecision::Approve && !pregame.has_room() {
        return Err(MadSocialError::CapacityExceeded);
    }
    Ok(())
}

/// Only the host may open the host dashboard
pub fn check_host_access(pregame: &Pregame, acting_user_id: Uuid) -> Result<()> {
    if pregame.host_id != acting_user_id {
        return Err(MadSocialError::Forbidden(
            "Only the host can view this information".to_string(),
        ));
    }
    Ok(())
}
