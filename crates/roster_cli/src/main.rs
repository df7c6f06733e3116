//! Roster smoke executable.
//!
//! Opens the configured database (in-memory when `ROSTER_DB_PATH` is unset),
//! seeds a small roster when the store is empty and prints one page of a
//! member search.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use roster_core::db::{open_db, open_db_in_memory};
use roster_core::{
    core_version, init_logging, CoreConfig, MemberRepository, MemberSearchCondition,
    MemberService, NewMember, NewTeam, SqliteMemberRepository, SqliteTeamRepository,
    TeamRepository,
};
use rusqlite::Connection;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "roster",
    version = core_version(),
    about = "Search members page by page"
)]
struct Args {
    /// Exact username match
    #[arg(long)]
    username: Option<String>,

    /// Exact team name match
    #[arg(long)]
    team: Option<String>,

    /// Minimum age (inclusive)
    #[arg(long)]
    min_age: Option<i64>,

    /// Maximum age (inclusive)
    #[arg(long)]
    max_age: Option<i64>,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset: i64,

    /// Page size; defaults to ROSTER_PAGE_LIMIT
    #[arg(long, allow_negative_numbers = true)]
    limit: Option<i64>,

    /// Database file, overrides ROSTER_DB_PATH
    #[arg(long)]
    db: Option<PathBuf>,

    /// Print the page as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = CoreConfig::from_env().context("invalid ROSTER_* environment")?;
    if let Some(path) = args.db.clone() {
        config.db_path = Some(path);
    }

    if let Some(dir) = &config.log_dir {
        init_logging(&config.log_level, &dir.to_string_lossy())
            .context("failed to initialize logging")?;
    }

    let conn = match &config.db_path {
        Some(path) => open_db(path).with_context(|| format!("cannot open {}", path.display()))?,
        None => open_db_in_memory().context("cannot open in-memory database")?,
    };
    seed_if_empty(&conn)?;

    let condition = MemberSearchCondition::from_parts(
        args.username,
        args.team,
        args.min_age,
        args.max_age,
    );
    let service = MemberService::with_config(SqliteMemberRepository::try_new(&conn)?, &config);
    let page = service.search_members(&condition, args.offset, args.limit)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    println!(
        "page={} of {} total={} offset={} limit={}",
        page.page_number() + 1,
        page.total_pages().max(1),
        page.total_count(),
        page.offset(),
        page.limit()
    );
    for row in page.into_content() {
        println!(
            "{:>4}  {:<12} {:>3}  {}",
            row.member_id,
            row.username.as_deref().unwrap_or("-"),
            row.age,
            row.team_name.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

/// Inserts teamA/teamB and member1..4 into an empty store.
fn seed_if_empty(conn: &Connection) -> Result<()> {
    let members = SqliteMemberRepository::try_new(conn)?;
    if !members.list_members()?.is_empty() {
        return Ok(());
    }

    let teams = SqliteTeamRepository::try_new(conn)?;
    let team_a = teams.create_team(&NewTeam::new("teamA"))?;
    let team_b = teams.create_team(&NewTeam::new("teamB"))?;
    for (name, age, team) in [
        ("member1", 10, team_a),
        ("member2", 20, team_a),
        ("member3", 30, team_b),
        ("member4", 40, team_b),
    ] {
        members.create_member(&NewMember::new(name, age).in_team(team))?;
    }
    info!("event=seed module=cli status=ok teams=2 members=4");
    Ok(())
}
