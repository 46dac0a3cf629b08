//! Mutual overlap model

use serde::Serialize;
use uuid::Uuid;

use crate::models::user::AcademicYear;

/// Shared profile attribute between the viewer and another attendee
///
/// Variant order is the display order of labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum OverlapLabel {
    #[serde(rename = "Same dorm")]
    SameDorm,
    #[serde(rename = "Same major")]
    SameMajor,
    #[serde(rename = "Same year")]
    SameYear,
}

impl OverlapLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            OverlapLabel::SameDorm => "Same dorm",
            OverlapLabel::SameMajor => "Same major",
            OverlapLabel::SameYear => "Same year",
        }
    }
}

impl std::fmt::Display for OverlapLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutualOverlap {
    pub user_id: Uuid,
    pub name: String,
    pub major: String,
    pub dorm: String,
    pub year: AcademicYear,
    pub avatar_url: Option<String>,
    pub overlaps: Vec<OverlapLabel>,
}
