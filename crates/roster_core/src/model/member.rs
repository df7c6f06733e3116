//! Member entity.
//!
//! # Invariants
//! - `username` may be absent; such members sort last in name ordering.
//! - `team_id`, when set, references an existing team row.

use super::team::TeamId;
use super::ModelValidationError;
use serde::{Deserialize, Serialize};

/// Database-generated member identifier.
pub type MemberId = i64;

/// Persisted member row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub username: Option<String>,
    pub age: i64,
    /// Owning side of the member -> team relation.
    pub team_id: Option<TeamId>,
}

impl Member {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_age(self.age)
    }
}

/// Insert shape for a member; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub username: Option<String>,
    pub age: i64,
    pub team_id: Option<TeamId>,
}

impl NewMember {
    /// Member with a name and age, not yet assigned to a team.
    pub fn new(username: impl Into<String>, age: i64) -> Self {
        Self {
            username: Some(username.into()),
            age,
            team_id: None,
        }
    }

    /// Member without a username.
    pub fn unnamed(age: i64) -> Self {
        Self {
            username: None,
            age,
            team_id: None,
        }
    }

    pub fn in_team(mut self, team_id: TeamId) -> Self {
        self.team_id = Some(team_id);
        self
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_age(self.age)
    }
}

fn validate_age(age: i64) -> Result<(), ModelValidationError> {
    if age < 0 {
        return Err(ModelValidationError::NegativeAge(age));
    }
    Ok(())
}
