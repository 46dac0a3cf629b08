//! Mutual overlap service
//!
//! Read-side comparison of the viewer's dorm, major and year against the
//! attendees of an event or a pregame.

use tracing::debug;
use uuid::Uuid;

use crate::database::DatabaseService;
use crate::models::mutual::{MutualOverlap, OverlapLabel};
use crate::models::user::{OverlapProfile, UserSummary};
use crate::utils::errors::{Entity, MadSocialError, Result};

/// Labels shared between the viewer and one candidate, in display order
pub fn overlap_labels(viewer: &OverlapProfile, candidate: &UserSummary) -> Vec<OverlapLabel> {
    let mut labels = Vec::with_capacity(3);
    if viewer.dorm == candidate.dorm {
        labels.push(OverlapLabel::SameDorm);
    }
    if viewer.major == candidate.major {
        labels.push(OverlapLabel::SameMajor);
    }
    if viewer.year == candidate.year {
        labels.push(OverlapLabel::SameYear);
    }
    labels
}

/// Compute overlaps for every candidate that shares at least one attribute
///
/// Candidates keep their input order. Comparison is exact and case-sensitive.
pub fn compute_overlaps(viewer: &OverlapProfile, candidates: Vec<UserSummary>) -> Vec<MutualOverlap> {
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let overlaps = overlap_labels(viewer, &candidate);
            if overlaps.is_empty() {
                return None;
            }
            Some(MutualOverlap {
                user_id: candidate.id,
                name: candidate.name,
                major: candidate.major,
                dorm: candidate.dorm,
                year: candidate.year,
                avatar_url: candidate.avatar_url,
                overlaps,
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct MutualService {
    db: DatabaseService,
}

impl MutualService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Mutuals among all attendees of every pregame of an event
    pub async fn mutuals_in_event(&self, event_id: Uuid, viewer_id: Uuid) -> Result<Vec<MutualOverlap>> {
        debug!(event_id = %event_id, user_id = %viewer_id, "Computing event mutuals");

        if !self.db.events.exists(event_id).await? {
            return Err(MadSocialError::not_found(Entity::Event, event_id));
        }
        let candidate_ids = self.db.pregames.attendee_ids_for_event(event_id).await?;
        self.overlaps_for(viewer_id, candidate_ids).await
    }

    /// Mutuals among the attendees of one pregame
    pub async fn mutuals_in_pregame(&self, pregame_id: Uuid, viewer_id: Uuid) -> Result<Vec<MutualOverlap>> {
        debug!(pregame_id = %pregame_id, user_id = %viewer_id, "Computing pregame mutuals");

        if self.db.pregames.find_by_id(pregame_id).await?.is_none() {
            return Err(MadSocialError::not_found(Entity::Pregame, pregame_id));
        }
        let candidate_ids = self.db.pregames.attendee_ids(pregame_id).await?;
        self.overlaps_for(viewer_id, candidate_ids).await
    }

    async fn overlaps_for(&self, viewer_id: Uuid, mut candidate_ids: Vec<Uuid>) -> Result<Vec<MutualOverlap>> {
        candidate_ids.retain(|id| *id != viewer_id);
        if candidate_ids.is_empty() {
            return Ok(Vec::new());
        }

        let viewer = self.db.users.find_overlap_profile(viewer_id).await?
            .ok_or_else(|| MadSocialError::not_found(Entity::User, viewer_id))?;
        let candidates = self.db.users.find_summaries(&candidate_ids).await?;

        let mutuals = compute_overlaps(&viewer, candidates);
        debug!(user_id = %viewer_id, candidates = candidate_ids.len(), mutuals = mutuals.len(), "Mutuals computed");
        Ok(mutuals)
    }
}
