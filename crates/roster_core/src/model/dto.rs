//! Read projections produced by member queries.
//!
//! These are never written back; they exist so callers receive only the
//! columns a query selected.

use super::member::MemberId;
use super::team::TeamId;
use serde::{Deserialize, Serialize};

/// Name and age of one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDto {
    pub username: Option<String>,
    pub age: i64,
}

/// Member joined with its (optional) team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberTeamDto {
    pub member_id: MemberId,
    pub username: Option<String>,
    pub age: i64,
    /// `None` when the member has no team (left join miss).
    pub team_id: Option<TeamId>,
    pub team_name: Option<String>,
}

/// Per-team age aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAgeStats {
    pub team_name: String,
    pub member_count: u64,
    pub age_sum: i64,
    pub age_avg: f64,
    pub age_max: i64,
    pub age_min: i64,
}
