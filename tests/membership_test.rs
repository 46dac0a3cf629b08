//! Membership engine integration tests
//!
//! Run against PostgreSQL (TEST_DATABASE_URL or a testcontainers instance);
//! skipped when neither is available.

#[macro_use]
mod helpers;

use assert_matches::assert_matches;
use futures::future::join_all;
use serial_test::serial;
use uuid::Uuid;

use helpers::*;
use madsocial::models::join_request::{JoinRequestStatus, ReviewDecision};
use madsocial::models::pregame::{AccessType, Capacity, PregameStatus};
use madsocial::services::MembershipService;
use madsocial::MadSocialError;

#[tokio::test]
#[serial]
async fn test_open_join_respects_capacity() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());

    let host = create_user(&service, Profile::default()).await;
    let users = create_users(&service, 2).await;
    let event = create_event(&service).await;
    let pregame = create_pregame(&service, host.id, event.id, AccessType::Open, Capacity::Limited(1)).await;

    let joined = membership.join_open_pregame(pregame.id, users[0].id, join_info()).await.unwrap();
    assert_eq!(joined.message, "Successfully joined pregame");

    let full = membership.join_open_pregame(pregame.id, users[1].id, join_info()).await;
    assert_matches!(full, Err(MadSocialError::CapacityExceeded));

    assert_eq!(db.attendees(pregame.id).await, vec![users[0].id]);
}

#[tokio::test]
#[serial]
async fn test_open_join_records_approved_request() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());

    let host = create_user(&service, Profile::default()).await;
    let guest = create_user(&service, Profile::default()).await;
    let event = create_event(&service).await;
    let pregame = create_pregame(&service, host.id, event.id, AccessType::Open, Capacity::Unlimited).await;

    membership.join_open_pregame(pregame.id, guest.id, join_info()).await.unwrap();

    let status: (JoinRequestStatus,) = sqlx::query_as(
        "SELECT status FROM join_requests WHERE pregame_id = $1 AND user_id = $2",
    )
    .bind(pregame.id)
    .bind(guest.id)
    .fetch_one(&db.pool)
    .await
    .unwrap();
    assert_eq!(status.0, JoinRequestStatus::Approved);

    let again = membership.join_open_pregame(pregame.id, guest.id, join_info()).await;
    assert_matches!(again, Err(MadSocialError::Conflict(_)));
}

#[tokio::test]
#[serial]
async fn test_access_mode_mismatches_are_invalid_state() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());

    let host = create_user(&service, Profile::default()).await;
    let guest = create_user(&service, Profile::default()).await;
    let event = create_event(&service).await;
    let open = create_pregame(&service, host.id, event.id, AccessType::Open, Capacity::Unlimited).await;
    let gated = create_pregame(&service, host.id, event.id, AccessType::RequestOnly, Capacity::Unlimited).await;
    let requests_before = db.count_records("join_requests").await;

    assert_matches!(
        membership.join_open_pregame(gated.id, guest.id, join_info()).await,
        Err(MadSocialError::InvalidState(_))
    );
    assert!(db.attendees(gated.id).await.is_empty());
    assert_eq!(db.count_records("join_requests").await, requests_before);

    assert_matches!(
        membership.request_to_join_pregame(open.id, guest.id, join_info()).await,
        Err(MadSocialError::InvalidState(_))
    );
    assert!(db.attendees(open.id).await.is_empty());
    assert_eq!(db.count_records("join_requests").await, requests_before);
}

#[tokio::test]
#[serial]
async fn test_host_cannot_join_own_pregame() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());

    let host = create_user(&service, Profile::default()).await;
    let event = create_event(&service).await;
    let pregame = create_pregame(&service, host.id, event.id, AccessType::Open, Capacity::Unlimited).await;

    assert_matches!(
        membership.join_open_pregame(pregame.id, host.id, join_info()).await,
        Err(MadSocialError::Conflict(_))
    );
}

#[tokio::test]
#[serial]
async fn test_missing_pregame_is_not_found() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());
    let guest = create_user(&service, Profile::default()).await;

    assert_matches!(
        membership.join_open_pregame(Uuid::new_v4(), guest.id, join_info()).await,
        Err(MadSocialError::NotFound { .. })
    );
    assert_matches!(
        membership.approve_join_request(Uuid::new_v4(), guest.id).await,
        Err(MadSocialError::NotFound { .. })
    );
}

#[tokio::test]
#[serial]
async fn test_create_pregame_requires_event() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());
    let host = create_user(&service, Profile::default()).await;
    let before = db.count_records("pregames").await;

    let result = membership
        .create_pregame(host.id, new_pregame(Uuid::new_v4(), AccessType::Open, Capacity::Unlimited))
        .await;
    assert_matches!(result, Err(MadSocialError::NotFound { .. }));
    assert_eq!(db.count_records("pregames").await, before);
}

#[tokio::test]
#[serial]
async fn test_request_then_approve_lifecycle() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());

    let host = create_user(&service, Profile::default()).await;
    let guest = create_user(&service, Profile::default()).await;
    let event = create_event(&service).await;
    let pregame = create_pregame(&service, host.id, event.id, AccessType::RequestOnly, Capacity::Limited(4)).await;

    let request = membership.request_to_join_pregame(pregame.id, guest.id, join_info()).await.unwrap();
    assert_eq!(request.status, JoinRequestStatus::Pending);
    assert_eq!(request.bringing, vec!["snacks".to_string()]);
    assert!(db.attendees(pregame.id).await.is_empty());

    let approved = membership.approve_join_request(request.id, host.id).await.unwrap();
    assert_eq!(approved.message, "Join request approved");
    assert_eq!(db.attendees(pregame.id).await, vec![guest.id]);

    let stored = service.join_requests.find_by_id(request.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JoinRequestStatus::Approved);

    assert_matches!(
        membership.approve_join_request(request.id, host.id).await,
        Err(MadSocialError::InvalidState(_))
    );
    assert_matches!(
        membership.decline_join_request(request.id, host.id).await,
        Err(MadSocialError::InvalidState(_))
    );
    assert_eq!(db.attendees(pregame.id).await, vec![guest.id]);
}

#[tokio::test]
#[serial]
async fn test_duplicate_pending_request_conflicts_but_declined_may_retry() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());

    let host = create_user(&service, Profile::default()).await;
    let guest = create_user(&service, Profile::default()).await;
    let event = create_event(&service).await;
    let pregame = create_pregame(&service, host.id, event.id, AccessType::RequestOnly, Capacity::Unlimited).await;

    let first = membership.request_to_join_pregame(pregame.id, guest.id, join_info()).await.unwrap();
    assert_matches!(
        membership.request_to_join_pregame(pregame.id, guest.id, join_info()).await,
        Err(MadSocialError::Conflict(_))
    );

    let declined = membership.decline_join_request(first.id, host.id).await.unwrap();
    assert_eq!(declined.message, "Join request declined");
    assert!(db.attendees(pregame.id).await.is_empty());

    let second = membership.request_to_join_pregame(pregame.id, guest.id, join_info()).await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(second.status, JoinRequestStatus::Pending);
}

#[tokio::test]
#[serial]
async fn test_only_host_reviews_requests() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());

    let host = create_user(&service, Profile::default()).await;
    let guest = create_user(&service, Profile::default()).await;
    let intruder = create_user(&service, Profile::default()).await;
    let event = create_event(&service).await;
    let pregame = create_pregame(&service, host.id, event.id, AccessType::RequestOnly, Capacity::Unlimited).await;

    let request = membership.request_to_join_pregame(pregame.id, guest.id, join_info()).await.unwrap();

    assert_matches!(
        membership.approve_join_request(request.id, intruder.id).await,
        Err(MadSocialError::Forbidden(_))
    );
    assert_matches!(
        membership.get_host_view(pregame.id, intruder.id).await,
        Err(MadSocialError::Forbidden(_))
    );

    let stored = service.join_requests.find_by_id(request.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JoinRequestStatus::Pending);
}

#[tokio::test]
#[serial]
async fn test_review_is_scoped_to_pregame() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());

    let host = create_user(&service, Profile::default()).await;
    let guest = create_user(&service, Profile::default()).await;
    let event = create_event(&service).await;
    let first = create_pregame(&service, host.id, event.id, AccessType::RequestOnly, Capacity::Unlimited).await;
    let second = create_pregame(&service, host.id, event.id, AccessType::RequestOnly, Capacity::Unlimited).await;

    let request = membership.request_to_join_pregame(first.id, guest.id, join_info()).await.unwrap();

    let result = membership
        .review_join_request(Some(second.id), request.id, host.id, ReviewDecision::Approve)
        .await;
    assert_matches!(result, Err(MadSocialError::NotFound { .. }));
    assert!(db.attendees(first.id).await.is_empty());
}

#[tokio::test]
#[serial]
async fn test_approve_rechecks_capacity() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());

    let host = create_user(&service, Profile::default()).await;
    let guests = create_users(&service, 2).await;
    let event = create_event(&service).await;
    let pregame = create_pregame(&service, host.id, event.id, AccessType::RequestOnly, Capacity::Limited(1)).await;

    let first = membership.request_to_join_pregame(pregame.id, guests[0].id, join_info()).await.unwrap();
    let second = membership.request_to_join_pregame(pregame.id, guests[1].id, join_info()).await.unwrap();

    membership.approve_join_request(first.id, host.id).await.unwrap();
    assert_matches!(
        membership.approve_join_request(second.id, host.id).await,
        Err(MadSocialError::CapacityExceeded)
    );

    // A full pregame can still decline
    membership.decline_join_request(second.id, host.id).await.unwrap();
    assert_eq!(db.attendees(pregame.id).await, vec![guests[0].id]);
}

#[tokio::test]
#[serial]
async fn test_concurrent_approvals_never_overfill() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());

    let host = create_user(&service, Profile::default()).await;
    let guests = create_users(&service, 6).await;
    let event = create_event(&service).await;
    let pregame = create_pregame(&service, host.id, event.id, AccessType::RequestOnly, Capacity::Limited(2)).await;

    let mut request_ids = Vec::new();
    for guest in &guests {
        let request = membership.request_to_join_pregame(pregame.id, guest.id, join_info()).await.unwrap();
        request_ids.push(request.id);
    }

    let results = join_all(
        request_ids
            .iter()
            .map(|id| membership.approve_join_request(*id, host.id)),
    )
    .await;

    let approved = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(approved, 2);
    for result in results.iter().filter(|r| r.is_err()) {
        assert_matches!(result, Err(MadSocialError::CapacityExceeded) | Err(MadSocialError::Conflict(_)));
    }
    assert_eq!(db.attendees(pregame.id).await.len(), 2);
}

#[tokio::test]
#[serial]
async fn test_concurrent_open_joins_never_overfill() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());

    let host = create_user(&service, Profile::default()).await;
    let guests = create_users(&service, 8).await;
    let event = create_event(&service).await;
    let pregame = create_pregame(&service, host.id, event.id, AccessType::Open, Capacity::Limited(3)).await;

    let results = join_all(
        guests
            .iter()
            .map(|guest| membership.join_open_pregame(pregame.id, guest.id, join_info())),
    )
    .await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 3);
    assert_eq!(db.attendees(pregame.id).await.len(), 3);
}

#[tokio::test]
#[serial]
async fn test_pending_counts_visible_to_host_only() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());

    let host = create_user(&service, Profile::default()).await;
    let guests = create_users(&service, 3).await;
    let event = create_event(&service).await;
    let pregame = create_pregame(&service, host.id, event.id, AccessType::RequestOnly, Capacity::Limited(2)).await;

    let first = membership.request_to_join_pregame(pregame.id, guests[0].id, join_info()).await.unwrap();
    membership.request_to_join_pregame(pregame.id, guests[1].id, join_info()).await.unwrap();
    membership.approve_join_request(first.id, host.id).await.unwrap();

    let as_host = membership.list_event_pregames(event.id, Some(host.id)).await.unwrap();
    assert_eq!(as_host.len(), 1);
    assert_eq!(as_host[0].requests_pending, Some(1));
    assert_eq!(as_host[0].attendee_count, 1);
    assert_eq!(as_host[0].status, PregameStatus::RequestOnly);
    assert_eq!(as_host[0].host.id, host.id);

    let as_guest = membership.list_event_pregames(event.id, Some(guests[2].id)).await.unwrap();
    assert_eq!(as_guest[0].requests_pending, None);

    let json = serde_json::to_value(&as_guest[0]).unwrap();
    assert!(json.get("requestsPending").is_none());
}

#[tokio::test]
#[serial]
async fn test_host_view_lists_contacts_and_pending_requests() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());

    let host = create_user(&service, Profile::default()).await;
    let guests = create_users(&service, 2).await;
    let event = create_event(&service).await;
    let pregame = create_pregame(&service, host.id, event.id, AccessType::RequestOnly, Capacity::Unlimited).await;

    let first = membership.request_to_join_pregame(pregame.id, guests[0].id, join_info()).await.unwrap();
    membership.request_to_join_pregame(pregame.id, guests[1].id, join_info()).await.unwrap();
    membership.approve_join_request(first.id, host.id).await.unwrap();

    let view = membership.get_host_view(pregame.id, host.id).await.unwrap();
    assert_eq!(view.id, pregame.id);
    assert_eq!(view.attendees.len(), 1);
    assert_eq!(view.attendees[0].email, guests[0].email);
    assert_eq!(view.join_requests.len(), 1);
    assert_eq!(view.join_requests[0].user.id, guests[1].id);
    assert_eq!(view.join_requests[0].status, JoinRequestStatus::Pending);
}

#[tokio::test]
#[serial]
async fn test_my_pregames_splits_hosting_and_attending() {
    let db = require_db!();
    let service = db.service();
    let membership = MembershipService::new(service.clone());

    let alice = create_user(&service, Profile::default()).await;
    let bob = create_user(&service, Profile::default()).await;
    let event = create_event(&service).await;
    let hosted = create_pregame(&service, alice.id, event.id, AccessType::Open, Capacity::Limited(1)).await;
    let other = create_pregame(&service, bob.id, event.id, AccessType::Open, Capacity::Unlimited).await;

    membership.join_open_pregame(other.id, alice.id, join_info()).await.unwrap();
    membership.join_open_pregame(hosted.id, bob.id, join_info()).await.unwrap();

    let mine = membership.my_pregames(alice.id).await.unwrap();
    assert_eq!(mine.hosting.len(), 1);
    assert_eq!(mine.hosting[0].id, hosted.id);
    assert_eq!(mine.hosting[0].status, PregameStatus::Full);
    assert_eq!(mine.hosting[0].requests_pending, Some(0));
    assert_eq!(mine.attending.len(), 1);
    assert_eq!(mine.attending[0].id, other.id);
    assert_eq!(mine.attending[0].requests_pending, None);
}
