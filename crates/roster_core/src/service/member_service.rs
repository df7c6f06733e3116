//! Member search use-cases.
//!
//! # Invariants
//! - Page requests are validated before any repository call.
//! - Paged search uses the separate, join-light count query.

use crate::config::{CoreConfig, PageLimits};
use crate::model::dto::{MemberDto, MemberTeamDto, TeamAgeStats};
use crate::model::member::{MemberId, NewMember};
use crate::model::team::TeamId;
use crate::paging::{Page, PageRequest};
use crate::query::MemberSearchCondition;
use crate::repo::member_repo::MemberRepository;
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};

/// Member service facade over a repository implementation.
pub struct MemberService<R: MemberRepository> {
    repo: R,
    page_limits: PageLimits,
}

impl<R: MemberRepository> MemberService<R> {
    /// Creates a service with default page limits.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            page_limits: PageLimits::default(),
        }
    }

    /// Creates a service using page limits from `config`.
    pub fn with_config(repo: R, config: &CoreConfig) -> Self {
        Self {
            repo,
            page_limits: config.page_limits,
        }
    }

    pub fn register_member(&self, member: &NewMember) -> RepoResult<MemberId> {
        self.repo.create_member(member)
    }

    pub fn change_team(&self, id: MemberId, team_id: Option<TeamId>) -> RepoResult<()> {
        self.repo.change_team(id, team_id)
    }

    /// Unpaged search, ordered by member id.
    pub fn search(&self, condition: &MemberSearchCondition) -> RepoResult<Vec<MemberTeamDto>> {
        self.repo.search(condition)
    }

    /// One page of members matching `condition`.
    ///
    /// `limit = None` uses the configured default; larger limits are clamped.
    ///
    /// # Errors
    /// - `RepoError::Query(InvalidPageRequest)` for `offset < 0` or `limit <= 0`,
    ///   returned without touching storage.
    pub fn search_members(
        &self,
        condition: &MemberSearchCondition,
        offset: i64,
        limit: Option<i64>,
    ) -> RepoResult<Page<MemberTeamDto>> {
        let applied_limit = self.page_limits.normalize(limit);
        let request = PageRequest::new(offset, applied_limit).map_err(|err| {
            warn!(
                "event=member_search module=service status=rejected offset={offset} limit={applied_limit}"
            );
            RepoError::from(err)
        })?;

        let page = self.repo.search_page_complex(condition, request)?;
        info!(
            "event=member_search module=service status=ok filters={} offset={} limit={} rows={} total={}",
            condition.present_field_count(),
            page.offset(),
            page.limit(),
            page.content().len(),
            page.total_count()
        );
        Ok(page)
    }

    pub fn member_dtos(&self) -> RepoResult<Vec<MemberDto>> {
        self.repo.list_member_dtos()
    }

    pub fn team_age_stats(&self) -> RepoResult<Vec<TeamAgeStats>> {
        self.repo.team_age_stats()
    }
}
