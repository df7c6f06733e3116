#![allow(dead_code)]

use roster_core::db::open_db_in_memory;
use roster_core::{
    MemberId, MemberRepository, NewMember, NewTeam, SqliteMemberRepository, SqliteTeamRepository,
    TeamId, TeamRepository,
};
use rusqlite::Connection;

/// Ids of the seeded rows: `member1..4` aged 10/20/30/40, the first two in
/// `teamA`, the last two in `teamB`.
pub struct Fixture {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub members: [MemberId; 4],
}

pub fn setup() -> (Connection, Fixture) {
    let conn = open_db_in_memory().unwrap();
    let fixture = seed(&conn);
    (conn, fixture)
}

pub fn seed(conn: &Connection) -> Fixture {
    let teams = SqliteTeamRepository::try_new(conn).unwrap();
    let team_a = teams.create_team(&NewTeam::new("teamA")).unwrap();
    let team_b = teams.create_team(&NewTeam::new("teamB")).unwrap();

    let members = SqliteMemberRepository::try_new(conn).unwrap();
    let ids = [
        ("member1", 10, team_a),
        ("member2", 20, team_a),
        ("member3", 30, team_b),
        ("member4", 40, team_b),
    ]
    .map(|(name, age, team)| {
        members
            .create_member(&NewMember::new(name, age).in_team(team))
            .unwrap()
    });

    Fixture {
        team_a,
        team_b,
        members: ids,
    }
}
