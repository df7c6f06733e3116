//! Team repository contract and SQLite implementation.

use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::team::{NewTeam, Team, TeamId};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub trait TeamRepository {
    fn create_team(&self, team: &NewTeam) -> RepoResult<TeamId>;
    fn get_team(&self, id: TeamId) -> RepoResult<Option<Team>>;
    /// All teams ordered by id.
    fn list_teams(&self) -> RepoResult<Vec<Team>>;
}

pub struct SqliteTeamRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTeamRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TeamRepository for SqliteTeamRepository<'_> {
    fn create_team(&self, team: &NewTeam) -> RepoResult<TeamId> {
        team.validate()?;
        self.conn
            .execute("INSERT INTO teams (name) VALUES (?1);", params![team.name])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_team(&self, id: TeamId) -> RepoResult<Option<Team>> {
        let team = self
            .conn
            .query_row(
                "SELECT team_id, name FROM teams WHERE team_id = ?1;",
                [id],
                |row| Ok(read_team(row)),
            )
            .optional()?;
        team.transpose()
    }

    fn list_teams(&self) -> RepoResult<Vec<Team>> {
        let mut stmt = self
            .conn
            .prepare("SELECT team_id, name FROM teams ORDER BY team_id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut teams = Vec::new();
        while let Some(row) = rows.next()? {
            teams.push(read_team(row)?);
        }
        Ok(teams)
    }
}

fn read_team(row: &Row<'_>) -> RepoResult<Team> {
    let team = Team {
        id: row.get("team_id")?,
        name: row.get("name")?,
    };
    team.validate().map_err(|err| {
        RepoError::InvalidData(format!("team {} in teams.name: {err}", team.id))
    })?;
    Ok(team)
}
