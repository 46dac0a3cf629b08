//! Event service implementation
//!
//! Event catalog operations: creation, the today and upcoming listings, and
//! the event detail page with its pregames assembled.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::DatabaseService;
use crate::models::event::{CreateEventRequest, Event, EventDetail, EventSummary};
use crate::services::membership::MembershipService;
use crate::utils::errors::{Entity, MadSocialError, Result};
use crate::utils::helpers::day_bounds;

/// Maximum number of events on the upcoming page
pub const UPCOMING_LIMIT: i64 = 50;

#[derive(Debug, Clone)]
pub struct EventService {
    db: DatabaseService,
    membership: MembershipService,
}

impl EventService {
    pub fn new(db: DatabaseService, membership: MembershipService) -> Self {
        Self { db, membership }
    }

    /// Create a new event
    pub async fn create_event(&self, request: CreateEventRequest) -> Result<Event> {
        let event = request.validate()?;
        debug!(title = %event.title, date = %event.date, "Creating event");

        let event = self.db.events.create(event).await?;
        info!(event_id = %event.id, "Event created");
        Ok(event)
    }

    /// Events dated within the current UTC day
    pub async fn today(&self) -> Result<Vec<EventSummary>> {
        let (start, end) = day_bounds(Utc::now());
        debug!(start = %start, end = %end, "Listing today's events");
        self.db.events.list_summaries_between(start, end).await
    }

    /// Events dated after the end of the current UTC day
    pub async fn upcoming(&self) -> Result<Vec<EventSummary>> {
        let (_, end) = day_bounds(Utc::now());
        debug!(from = %end, "Listing upcoming events");
        self.db.events.list_summaries_from(end, UPCOMING_LIMIT).await
    }

    /// Event with its pregames; pending counts are shown to each pregame's host only
    pub async fn detail(&self, event_id: Uuid, viewer_id: Uuid) -> Result<EventDetail> {
        debug!(event_id = %event_id, user_id = %viewer_id, "Loading event detail");

        let event = self.db.events.find_by_id(event_id).await?
            .ok_or_else(|| MadSocialError::not_found(Entity::Event, event_id))?;
        let pregames = self.membership.list_event_pregames(event_id, Some(viewer_id)).await?;

        Ok(event.into_detail(pregames))
    }
}
