//! Member repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `members`, including team assignment.
//! - Dynamic member search (where-list and folded-conjunction styles).
//! - Paginated member search with derived or separate count queries.
//!
//! # Invariants
//! - Search results are ordered by `member_id ASC` so pages are stable.
//! - Content and count queries of one search apply the same predicates.

use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::dto::{MemberDto, MemberTeamDto, TeamAgeStats};
use crate::model::member::{Member, MemberId, NewMember};
use crate::model::team::TeamId;
use crate::paging::{apply_pagination, execute_page, Page, PageRequest};
use crate::query::{
    compose, compose_all, member_count_query, Column, MemberSearchCondition, QueryError,
    QueryResult, SelectExpr, SelectQuery,
};
use rusqlite::{params, Connection, Row};

/// Repository interface for member persistence and search.
pub trait MemberRepository {
    fn create_member(&self, member: &NewMember) -> RepoResult<MemberId>;
    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>>;
    /// All members ordered by id.
    fn list_members(&self) -> RepoResult<Vec<Member>>;
    fn find_by_username(&self, username: &str) -> RepoResult<Vec<Member>>;
    /// Moves a member to `team_id`, or out of any team with `None`.
    fn change_team(&self, id: MemberId, team_id: Option<TeamId>) -> RepoResult<()>;
    /// Member + team rows matching every present condition field.
    fn search(&self, condition: &MemberSearchCondition) -> RepoResult<Vec<MemberTeamDto>>;
    /// Same result as [`Self::search`], filtering with one folded conjunction.
    fn search_by_builder(&self, condition: &MemberSearchCondition)
        -> RepoResult<Vec<MemberTeamDto>>;
    /// Paginated search whose count query is derived from the content query.
    fn search_page_simple(
        &self,
        condition: &MemberSearchCondition,
        request: PageRequest,
    ) -> RepoResult<Page<MemberTeamDto>>;
    /// Paginated search with a separate count query that only joins
    /// `teams` when a team filter is present.
    fn search_page_complex(
        &self,
        condition: &MemberSearchCondition,
        request: PageRequest,
    ) -> RepoResult<Page<MemberTeamDto>>;
    fn list_member_dtos(&self) -> RepoResult<Vec<MemberDto>>;
    /// Members by age descending, then username ascending with unnamed last.
    fn list_by_age_desc_username_asc(&self) -> RepoResult<Vec<Member>>;
    /// Age aggregates per team, ordered by team name.
    fn team_age_stats(&self) -> RepoResult<Vec<TeamAgeStats>>;
}

/// SQLite-backed member repository.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn ensure_team_exists(&self, team_id: TeamId) -> RepoResult<()> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM teams WHERE team_id = ?1);",
            [team_id],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::NotFound {
                entity: "team",
                id: team_id,
            });
        }
        Ok(())
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn create_member(&self, member: &NewMember) -> RepoResult<MemberId> {
        member.validate()?;
        if let Some(team_id) = member.team_id {
            self.ensure_team_exists(team_id)?;
        }

        self.conn.execute(
            "INSERT INTO members (username, age, team_id) VALUES (?1, ?2, ?3);",
            params![member.username.as_deref(), member.age, member.team_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let member = SelectQuery::select_member()
            .filter(Some(Column::MemberId.eq(id)))
            .fetch_first(self.conn, read_member)?;
        Ok(member)
    }

    fn list_members(&self) -> RepoResult<Vec<Member>> {
        let members = SelectQuery::select_member()
            .order_by(Column::MemberId.asc())
            .fetch(self.conn, read_member)?;
        Ok(members)
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Vec<Member>> {
        let members = SelectQuery::select_member()
            .filter(Some(Column::MemberUsername.eq(username.to_string())))
            .order_by(Column::MemberId.asc())
            .fetch(self.conn, read_member)?;
        Ok(members)
    }

    fn change_team(&self, id: MemberId, team_id: Option<TeamId>) -> RepoResult<()> {
        if let Some(team_id) = team_id {
            self.ensure_team_exists(team_id)?;
        }

        let changed = self.conn.execute(
            "UPDATE members SET team_id = ?1 WHERE member_id = ?2;",
            params![team_id, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "member",
                id,
            });
        }
        Ok(())
    }

    fn search(&self, condition: &MemberSearchCondition) -> RepoResult<Vec<MemberTeamDto>> {
        let rows = member_team_query()
            .filter(compose(condition))
            .order_by(Column::MemberId.asc())
            .fetch(self.conn, read_member_team)?;
        Ok(rows)
    }

    fn search_by_builder(
        &self,
        condition: &MemberSearchCondition,
    ) -> RepoResult<Vec<MemberTeamDto>> {
        let rows = member_team_query()
            .filter(compose_all(condition))
            .order_by(Column::MemberId.asc())
            .fetch(self.conn, read_member_team)?;
        Ok(rows)
    }

    fn search_page_simple(
        &self,
        condition: &MemberSearchCondition,
        request: PageRequest,
    ) -> RepoResult<Page<MemberTeamDto>> {
        let page = apply_pagination(
            self.conn,
            request,
            || {
                member_team_query()
                    .filter(compose(condition))
                    .order_by(Column::MemberId.asc())
            },
            read_member_team,
        )?;
        Ok(page)
    }

    fn search_page_complex(
        &self,
        condition: &MemberSearchCondition,
        request: PageRequest,
    ) -> RepoResult<Page<MemberTeamDto>> {
        let page = execute_page(
            self.conn,
            request,
            || {
                member_team_query()
                    .filter(compose(condition))
                    .order_by(Column::MemberId.asc())
            },
            || member_count_query(condition),
            read_member_team,
        )?;
        Ok(page)
    }

    fn list_member_dtos(&self) -> RepoResult<Vec<MemberDto>> {
        let rows = SelectQuery::select([Column::MemberUsername, Column::MemberAge])
            .order_by(Column::MemberId.asc())
            .fetch(self.conn, |row| {
                Ok(MemberDto {
                    username: row.get(Column::MemberUsername.label())?,
                    age: row.get(Column::MemberAge.label())?,
                })
            })?;
        Ok(rows)
    }

    fn list_by_age_desc_username_asc(&self) -> RepoResult<Vec<Member>> {
        let members = SelectQuery::select_member()
            .order_by(Column::MemberAge.desc())
            .order_by(Column::MemberUsername.asc().nulls_last())
            .order_by(Column::MemberId.asc())
            .fetch(self.conn, read_member)?;
        Ok(members)
    }

    fn team_age_stats(&self) -> RepoResult<Vec<TeamAgeStats>> {
        let stats = SelectQuery::select([
            SelectExpr::Column(Column::TeamName),
            SelectExpr::Count(Column::MemberId),
            SelectExpr::Sum(Column::MemberAge),
            SelectExpr::Avg(Column::MemberAge),
            SelectExpr::Max(Column::MemberAge),
            SelectExpr::Min(Column::MemberAge),
        ])
        .filter(Some(Column::TeamId.is_not_null()))
        .group_by(Column::TeamName)
        .order_by(Column::TeamName.asc())
        .fetch(self.conn, read_team_age_stats)?;
        Ok(stats)
    }
}

fn member_team_query() -> SelectQuery {
    SelectQuery::select([
        Column::MemberId,
        Column::MemberUsername,
        Column::MemberAge,
        Column::TeamId,
        Column::TeamName,
    ])
    .left_join_team()
}

fn read_member(row: &Row<'_>) -> QueryResult<Member> {
    let member = Member {
        id: row.get(Column::MemberId.label())?,
        username: row.get(Column::MemberUsername.label())?,
        age: row.get(Column::MemberAge.label())?,
        team_id: row.get(Column::MemberTeamId.label())?,
    };
    member.validate().map_err(|err| {
        QueryError::InvalidData(format!("member {} in members.age: {err}", member.id))
    })?;
    Ok(member)
}

fn read_member_team(row: &Row<'_>) -> QueryResult<MemberTeamDto> {
    Ok(MemberTeamDto {
        member_id: row.get(Column::MemberId.label())?,
        username: row.get(Column::MemberUsername.label())?,
        age: row.get(Column::MemberAge.label())?,
        team_id: row.get(Column::TeamId.label())?,
        team_name: row.get(Column::TeamName.label())?,
    })
}

fn read_team_age_stats(row: &Row<'_>) -> QueryResult<TeamAgeStats> {
    let member_count: i64 = row.get("count_member_id")?;
    Ok(TeamAgeStats {
        team_name: row.get(Column::TeamName.label())?,
        member_count: u64::try_from(member_count).map_err(|_| {
            QueryError::InvalidData(format!("negative member count `{member_count}`"))
        })?,
        age_sum: row.get("sum_age")?,
        age_avg: row.get("avg_age")?,
        age_max: row.get("max_age")?,
        age_min: row.get("min_age")?,
    })
}
