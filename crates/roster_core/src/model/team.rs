//! Team entity.

use super::ModelValidationError;
use serde::{Deserialize, Serialize};

/// Database-generated team identifier.
pub type TeamId = i64;

/// Persisted team row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

/// Insert shape for a team; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
}

impl NewTeam {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_team_name(&self.name)
    }
}

impl Team {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_team_name(&self.name)
    }
}

fn validate_team_name(name: &str) -> Result<(), ModelValidationError> {
    if name.trim().is_empty() {
        return Err(ModelValidationError::BlankTeamName);
    }
    Ok(())
}
