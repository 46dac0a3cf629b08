//! Pregame membership service
//!
//! Owns the attendee set and join-request lifecycle of every pregame.
//! Each mutation runs as one transaction: the pregame row is locked with
//! `FOR UPDATE`, a snapshot is checked against [`rules`], and the writes are
//! issued before commit. Any rejected check drops the transaction, which
//! rolls it back.

pub mod rules;

use std::collections::{HashMap, HashSet};

use tracing::debug;
use uuid::Uuid;

use crate::database::DatabaseService;
use crate::models::join_request::{
    JoinInfo, JoinRequest, JoinRequestStatus, MessageResponse, ReviewDecision,
};
use crate::models::pregame::{HostView, MyPregames, NewPregame, Pregame, PregameSummary};
use crate::utils::errors::{Entity, MadSocialError, Result};
use crate::utils::logging::{log_pregame_action, log_rejected_action};

use rules::{Membership, PregameState, RequestState};

const ALREADY_ATTENDING: &str = "You are already attending this pregame";
const ALREADY_PENDING: &str = "You already have a pending request for this pregame";

fn tx_error(conflict_message: &'static str) -> impl Fn(sqlx::Error) -> MadSocialError {
    move |error| MadSocialError::from_transaction(error, conflict_message)
}

/// Membership engine for pregames
#[derive(Debug, Clone)]
pub struct MembershipService {
    db: DatabaseService,
}

impl MembershipService {
    /// Create a new MembershipService instance
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Create a pregame under an existing event; the attendee set starts empty
    pub async fn create_pregame(&self, host_id: Uuid, pregame: NewPregame) -> Result<Pregame> {
        debug!(host_id = %host_id, event_id = %pregame.event_id, "Creating pregame");

        if !self.db.events.exists(pregame.event_id).await? {
            return Err(MadSocialError::not_found(Entity::Event, pregame.event_id));
        }

        let pregame = self.db.pregames.create(host_id, pregame).await?;
        log_pregame_action(pregame.id, "create", host_id, Some(&pregame.title));

        Ok(pregame)
    }

    /// Join an OPEN pregame immediately
    ///
    /// Records an already-approved join request and adds the user to the
    /// attendee set in the same transaction.
    pub async fn join_open_pregame(&self, pregame_id: Uuid, user_id: Uuid, info: JoinInfo) -> Result<MessageResponse> {
        debug!(pregame_id = %pregame_id, user_id = %user_id, "Joining open pregame");

        let on_conflict = tx_error(ALREADY_ATTENDING);
        let mut tx = self.db.begin().await.map_err(&on_conflict)?;

        let pregame = self.db.pregames.lock(&mut tx, pregame_id).await.map_err(&on_conflict)?
            .ok_or_else(|| MadSocialError::not_found(Entity::Pregame, pregame_id))?;
        let attendee_count = self.db.pregames.count_attendees(&mut tx, pregame_id).await.map_err(&on_conflict)?;
        let is_attendee = self.db.pregames.is_attendee(&mut tx, pregame_id, user_id).await.map_err(&on_conflict)?;

        let state = PregameState::of(&pregame, attendee_count);
        let member = Membership { user_id, is_attendee, has_pending_request: false };
        if let Err(e) = rules::check_open_join(&state, &member) {
            log_rejected_action(pregame_id, "join", user_id, &e.to_string());
            return Err(e);
        }

        self.db.join_requests
            .insert(&mut tx, pregame_id, user_id, JoinRequestStatus::Approved, info)
            .await
            .map_err(&on_conflict)?;
        self.db.pregames.add_attendee(&mut tx, pregame_id, user_id).await.map_err(&on_conflict)?;
        tx.commit().await.map_err(&on_conflict)?;

        log_pregame_action(pregame_id, "join", user_id, None);
        Ok(MessageResponse::new("Successfully joined pregame"))
    }

    /// File a PENDING request on a REQUEST_ONLY pregame
    pub async fn request_to_join_pregame(&self, pregame_id: Uuid, user_id: Uuid, info: JoinInfo) -> Result<JoinRequest> {
        debug!(pregame_id = %pregame_id, user_id = %user_id, "Requesting to join pregame");

        let on_conflict = tx_error(ALREADY_PENDING);
        let mut tx = self.db.begin().await.map_err(&on_conflict)?;

        let pregame = self.db.pregames.lock(&mut tx, pregame_id).await.map_err(&on_conflict)?
            .ok_or_else(|| MadSocialError::not_found(Entity::Pregame, pregame_id))?;
        let attendee_count = self.db.pregames.count_attendees(&mut tx, pregame_id).await.map_err(&on_conflict)?;
        let is_attendee = self.db.pregames.is_attendee(&mut tx, pregame_id, user_id).await.map_err(&on_conflict)?;
        let has_pending_request = self.db.join_requests.has_pending(&mut tx, pregame_id, user_id).await.map_err(&on_conflict)?;

        let state = PregameState::of(&pregame, attendee_count);
        let member = Membership { user_id, is_attendee, has_pending_request };
        if let Err(e) = rules::check_join_request(&state, &member) {
            log_rejected_action(pregame_id, "request", user_id, &e.to_string());
            return Err(e);
        }

        let request = self.db.join_requests
            .insert(&mut tx, pregame_id, user_id, JoinRequestStatus::Pending, info)
            .await
            .map_err(&on_conflict)?;
        tx.commit().await.map_err(&on_conflict)?;

        log_pregame_action(pregame_id, "request", user_id, Some(&request.id.to_string()));
        Ok(request)
    }

    /// Approve a pending request, adding the requester as an attendee
    pub async fn approve_join_request(&self, request_id: Uuid, acting_host_id: Uuid) -> Result<MessageResponse> {
        self.review_join_request(None, request_id, acting_host_id, ReviewDecision::Approve).await
    }

    /// Decline a pending request
    pub async fn decline_join_request(&self, request_id: Uuid, acting_host_id: Uuid) -> Result<MessageResponse> {
        self.review_join_request(None, request_id, acting_host_id, ReviewDecision::Decline).await
    }

    /// Approve or decline a request, optionally scoped to one pregame
    ///
    /// A request that belongs to a different pregame than `scope` is reported
    /// as not found.
    pub async fn review_join_request(
        &self,
        scope: Option<Uuid>,
        request_id: Uuid,
        acting_host_id: Uuid,
        decision: ReviewDecision,
    ) -> Result<MessageResponse> {
        debug!(request_id = %request_id, host_id = %acting_host_id, decision = decision.verb(), "Reviewing join request");

        let request = self.db.join_requests.find_by_id(request_id).await?
            .filter(|request| scope.map_or(true, |pregame_id| request.pregame_id == pregame_id))
            .ok_or_else(|| MadSocialError::not_found(Entity::JoinRequest, request_id))?;
        let pregame_id = request.pregame_id;

        let on_conflict = tx_error(ALREADY_ATTENDING);
        let mut tx = self.db.begin().await.map_err(&on_conflict)?;

        // Pregame first, then request: the same order every writer uses
        let pregame = self.db.pregames.lock(&mut tx, pregame_id).await.map_err(&on_conflict)?
            .ok_or_else(|| MadSocialError::not_found(Entity::Pregame, pregame_id))?;
        let request = self.db.join_requests.lock(&mut tx, request_id).await.map_err(&on_conflict)?
            .ok_or_else(|| MadSocialError::not_found(Entity::JoinRequest, request_id))?;
        let attendee_count = self.db.pregames.count_attendees(&mut tx, pregame_id).await.map_err(&on_conflict)?;

        let state = PregameState::of(&pregame, attendee_count);
        let request_state = RequestState { status: request.status };
        if let Err(e) = rules::check_review(&state, &request_state, acting_host_id, decision) {
            log_rejected_action(pregame_id, decision.verb(), acting_host_id, &e.to_string());
            return Err(e);
        }

        self.db.join_requests
            .resolve(&mut tx, request_id, decision.target_status())
            .await
            .map_err(&on_conflict)?
            .ok_or_else(|| MadSocialError::InvalidState("This request has already been processed".to_string()))?;
        if decision == ReviewDecision::Approve {
            self.db.pregames.add_attendee(&mut tx, pregame_id, request.user_id).await.map_err(&on_conflict)?;
        }
        tx.commit().await.map_err(&on_conflict)?;

        log_pregame_action(pregame_id, decision.verb(), acting_host_id, Some(&request_id.to_string()));
        let message = match decision {
            ReviewDecision::Approve => "Join request approved",
            ReviewDecision::Decline => "Join request declined",
        };
        Ok(MessageResponse::new(message))
    }

    /// Host dashboard: attendees with contact details and pending requests
    pub async fn get_host_view(&self, pregame_id: Uuid, acting_user_id: Uuid) -> Result<HostView> {
        debug!(pregame_id = %pregame_id, user_id = %acting_user_id, "Loading host view");

        let pregame = self.db.pregames.find_by_id(pregame_id).await?
            .ok_or_else(|| MadSocialError::not_found(Entity::Pregame, pregame_id))?;
        if let Err(e) = rules::check_host_access(&pregame, acting_user_id) {
            log_rejected_action(pregame_id, "host_view", acting_user_id, &e.to_string());
            return Err(e);
        }

        let attendees = self.db.pregames.find_attendee_contacts(pregame_id).await?;
        let join_requests = self.db.join_requests.list_pending_with_users(pregame_id).await?;

        Ok(HostView {
            id: pregame.id,
            title: pregame.title,
            attendees,
            join_requests,
        })
    }

    /// Pregames of an event as cards, earliest meeting first
    pub async fn list_event_pregames(&self, event_id: Uuid, viewer_id: Option<Uuid>) -> Result<Vec<PregameSummary>> {
        debug!(event_id = %event_id, "Listing pregames for event");
        let pregames = self.db.pregames.list_by_event(event_id).await?;
        self.summarize(pregames, viewer_id).await
    }

    /// Pregames the user hosts and attends
    pub async fn my_pregames(&self, user_id: Uuid) -> Result<MyPregames> {
        debug!(user_id = %user_id, "Listing user pregames");
        let hosting = self.db.pregames.list_hosted_by(user_id).await?;
        let attending = self.db.pregames.list_attended_by(user_id).await?;

        Ok(MyPregames {
            hosting: self.summarize(hosting, Some(user_id)).await?,
            attending: self.summarize(attending, Some(user_id)).await?,
        })
    }

    /// Assemble pregame cards, preserving input order
    ///
    /// The pending-request count is filled in only for pregames hosted by
    /// `viewer_id`.
    pub async fn summarize(&self, pregames: Vec<Pregame>, viewer_id: Option<Uuid>) -> Result<Vec<PregameSummary>> {
        if pregames.is_empty() {
            return Ok(Vec::new());
        }

        let pregame_ids: Vec<Uuid> = pregames.iter().map(|p| p.id).collect();
        let host_ids: Vec<Uuid> = pregames
            .iter()
            .map(|p| p.host_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let hosts: HashMap<Uuid, _> = self.db.pregames.find_hosts(&host_ids).await?
            .into_iter()
            .map(|host| (host.id, host))
            .collect();

        let mut attendees: HashMap<Uuid, Vec<_>> = HashMap::new();
        for row in self.db.pregames.find_attendees(&pregame_ids).await? {
            attendees.entry(row.pregame_id).or_default().push(row.user);
        }

        let hosted_ids: Vec<Uuid> = match viewer_id {
            Some(viewer) => pregames.iter().filter(|p| p.host_id == viewer).map(|p| p.id).collect(),
            None => Vec::new(),
        };
        let pending: HashMap<Uuid, i64> = if hosted_ids.is_empty() {
            HashMap::new()
        } else {
            self.db.join_requests.count_pending(&hosted_ids).await?.into_iter().collect()
        };

        pregames
            .into_iter()
            .map(|pregame| {
                let host = hosts
                    .get(&pregame.host_id)
                    .cloned()
                    .ok_or_else(|| MadSocialError::not_found(Entity::User, pregame.host_id))?;
                let is_viewer_host = viewer_id == Some(pregame.host_id);
                let pending_count = pending.get(&pregame.id).copied().unwrap_or(0);
                let pregame_attendees = attendees.remove(&pregame.id).unwrap_or_default();

                let mut summary = PregameSummary::assemble(pregame, host, pregame_attendees);
                if is_viewer_host {
                    summary.requests_pending = Some(pending_count);
                }
                Ok(summary)
            })
            .collect()
    }
}
