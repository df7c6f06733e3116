//! Member/team roster core.
//!
//! Dynamic member search built from optional filters, and offset/limit
//! pagination that skips the count query when a page already reveals the
//! total.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod paging;
pub mod query;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig, PageLimits};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::dto::{MemberDto, MemberTeamDto, TeamAgeStats};
pub use model::member::{Member, MemberId, NewMember};
pub use model::team::{NewTeam, Team, TeamId};
pub use model::ModelValidationError;
pub use paging::{apply_pagination, execute_page, Page, PageRequest};
pub use query::{
    compose, compose_all, member_count_query, requires_team_join, Column, MemberSearchCondition,
    Predicate, QueryError, QueryResult, SelectExpr, SelectQuery,
};
pub use repo::member_repo::{MemberRepository, SqliteMemberRepository};
pub use repo::team_repo::{SqliteTeamRepository, TeamRepository};
pub use repo::{RepoError, RepoResult};
pub use service::member_service::MemberService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
