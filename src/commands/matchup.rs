//! Matchup preview: my team against this week's opponent.

use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use super::common::{is_empty_slot, team_directory, SleeperService, TeamInfo};
use crate::{
    cli::types::{PlayerId, Position, RosterId, Week},
    core::PlayerDirectory,
    error::Result,
    sleeper::{compute::score_lines, types::Matchup},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarterLine {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Option<Position>,
    pub points: Option<f64>,
    pub projected: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamLine {
    pub roster_id: RosterId,
    pub owner: Option<String>,
    pub team_name: Option<String>,
    pub avatar_url: Option<String>,
    pub points: Option<f64>,
    pub projected_points: Option<f64>,
    pub starters: Vec<StarterLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchupPreview {
    pub league_id: String,
    pub league_name: Option<String>,
    pub week: Week,
    pub matchup_id: Option<u32>,
    pub team: TeamLine,
    /// `None` on a bye week.
    pub opponent: Option<TeamLine>,
}

/// The other entry sharing my `matchup_id`. A null id means a bye.
pub fn find_opponent(matchups: &[Matchup], mine: RosterId) -> Option<&Matchup> {
    let my_matchup = matchups.iter().find(|m| m.roster_id == mine)?.matchup_id?;
    matchups
        .iter()
        .find(|m| m.roster_id != mine && m.matchup_id == Some(my_matchup))
}

fn team_line(
    roster_id: RosterId,
    entry: Option<&Matchup>,
    info: Option<&TeamInfo>,
    avatar_url: Option<String>,
    projections: Option<&HashMap<PlayerId, f64>>,
    directory: &PlayerDirectory,
) -> TeamLine {
    let starters: Vec<StarterLine> = entry
        .map(|m| m.starters.as_slice())
        .unwrap_or_default()
        .iter()
        .filter(|id| !is_empty_slot(id))
        .map(|id| StarterLine {
            player_id: id.clone(),
            name: directory.name_of(id),
            position: directory.get(id).and_then(|p| p.primary_position()),
            points: entry.and_then(|m| m.players_points.get(id.as_str()).copied()),
            projected: projections.and_then(|p| p.get(id).copied()),
        })
        .collect();
    let projected_points =
        projections.map(|_| starters.iter().filter_map(|s| s.projected).sum::<f64>());

    TeamLine {
        roster_id,
        owner: info.and_then(|t| t.owner.clone()),
        team_name: info.and_then(|t| t.team_name.clone()),
        avatar_url,
        points: entry.and_then(|m| m.points),
        projected_points,
        starters,
    }
}

pub async fn matchup_preview(
    service: &SleeperService,
    hint: Option<&str>,
    week: Option<Week>,
) -> Result<MatchupPreview> {
    let resolution = service.resolve(hint).await?;
    let roster_id = resolution.require_roster()?;
    let league_id = &resolution.binding.league_id;
    let client = service.client();

    let state = service.current_state().await?;
    let week = week.unwrap_or(state.week);

    let (matchups, rosters, users, league) = tokio::try_join!(
        service.cache().matchups(client, league_id, week),
        service.cache().rosters(client, league_id),
        client.league_users(league_id),
        client.league(league_id),
    )?;
    service.load_players_best_effort().await;

    let projections = match service
        .cache()
        .bulk_projections(client, league_id, state.season, week)
        .await
    {
        Ok(lines) => Some(score_lines(&lines, &league.scoring_settings)),
        Err(e) => {
            warn!(league = %league_id, %week, error = %e, "projections unavailable");
            None
        }
    };

    let teams = team_directory(&rosters, &users);
    let directory = service.players();
    let avatar = |rid: RosterId| {
        teams
            .get(&rid)
            .and_then(|t| t.avatar.as_deref())
            .map(|a| client.avatar_url(a, true))
    };
    let line = |rid: RosterId, entry: Option<&Matchup>| {
        team_line(rid, entry, teams.get(&rid), avatar(rid), projections.as_ref(), directory)
    };

    let mine = matchups.iter().find(|m| m.roster_id == roster_id);
    let opponent = find_opponent(&matchups, roster_id);

    Ok(MatchupPreview {
        league_id: league_id.to_string(),
        league_name: league.name.clone(),
        week,
        matchup_id: mine.and_then(|m| m.matchup_id),
        team: line(roster_id, mine),
        opponent: opponent.map(|m| line(m.roster_id, Some(m))),
    })
}
