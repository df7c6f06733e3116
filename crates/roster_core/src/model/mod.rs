//! Member/team domain model and read projections.
//!
//! # Responsibility
//! - Define the two persisted entities (`Team`, `Member`) and their insert shapes.
//! - Define read-only projections returned by search queries.
//!
//! # Invariants
//! - A member belongs to at most one team; a team owns many members.
//! - Ages are never negative and team names are never blank.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod dto;
pub mod member;
pub mod team;

/// Validation failures for entity write and read paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    NegativeAge(i64),
    BlankTeamName,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeAge(age) => write!(f, "member age must not be negative, got {age}"),
            Self::BlankTeamName => write!(f, "team name must not be blank"),
        }
    }
}

impl Error for ModelValidationError {}
