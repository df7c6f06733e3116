//! Typed SQL query construction over the member/team schema.
//!
//! # Responsibility
//! - Model declared columns and composable boolean predicates.
//! - Render select/count queries with positional bind values.
//! - Turn a [`MemberSearchCondition`] into emit-or-omit predicates.
//!
//! # Invariants
//! - Every user value reaches SQLite as a bind parameter, never as SQL text.
//! - An empty predicate list renders no `WHERE` clause.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod condition;
pub mod expr;
pub mod select;

pub use condition::{
    compose, compose_all, member_count_query, requires_team_join, MemberSearchCondition,
};
pub use expr::{Column, CompareOp, OrderSpec, Predicate, SelectExpr, Table};
pub use select::SelectQuery;

pub type QueryResult<T> = Result<T, QueryError>;

/// Failure while validating, building or executing a query.
#[derive(Debug)]
pub enum QueryError {
    /// Offset was negative or limit was not positive.
    InvalidPageRequest { offset: i64, limit: i64 },
    Db(DbError),
    /// A fetched row could not be decoded into the requested shape.
    InvalidData(String),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPageRequest { offset, limit } => write!(
                f,
                "invalid page request: offset={offset} limit={limit} (offset must be >= 0, limit must be > 0)"
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid query row: {message}"),
        }
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPageRequest { .. } => None,
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for QueryError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for QueryError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
