//! Read-only league lookups: configured leagues, per-player points,
//! drafts and playoff brackets.

use futures::future::try_join_all;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use super::common::{team_directory, SleeperService, TeamInfo};
use crate::{
    cli::types::{PlayerId, Position, RosterId, Season, Week},
    config::Account,
    core::{CacheStats, PlayerDirectory},
    error::Result,
    sleeper::{
        compute::ReceptionFormat,
        compute_points,
        types::{BracketMatch, RawStats},
    },
};

#[derive(Debug, Clone, Serialize)]
pub struct LeagueSummary {
    pub tag: String,
    pub username: String,
    pub league_id: String,
    pub league_name: Option<String>,
    pub roster_id: Option<RosterId>,
}

/// Every configured league binding, with names and rosters resolved where
/// possible.
pub async fn list_leagues(service: &SleeperService) -> Result<Vec<LeagueSummary>> {
    service.config().ensure_configured()?;
    let resolver = service.resolver();
    let season = match service.current_state().await {
        Ok(state) => Some(state.season),
        Err(e) => {
            warn!(error = %e, "season state unavailable; names fetched per league");
            None
        }
    };

    let mut out = Vec::new();
    for account in &service.config().accounts {
        let mut roster_ids = Vec::with_capacity(account.leagues.len());
        for binding in &account.leagues {
            roster_ids.push(resolver.ensure_roster_id(account, binding).await);
        }
        if let Some(season) = season {
            prefill_league_names(service, account, season).await;
        }
        for (binding, roster_id) in account.leagues.iter().zip(roster_ids) {
            out.push(LeagueSummary {
                tag: account.tag.clone(),
                username: account.username.clone(),
                league_id: binding.league_id.to_string(),
                league_name: resolver.league_name(binding).await,
                roster_id,
            });
        }
    }
    Ok(out)
}

/// Fill missing display names from the account's season league list, so
/// only leagues absent from it need a lookup of their own.
async fn prefill_league_names(service: &SleeperService, account: &Account, season: Season) {
    if account.leagues.iter().all(|b| b.league_name.is_set()) {
        return;
    }
    let Some(user_id) = account.user_id.get() else { return };
    match service.client().user_leagues(&user_id, season).await {
        Ok(leagues) => {
            for binding in &account.leagues {
                let name = leagues
                    .iter()
                    .find(|l| l.league_id == binding.league_id)
                    .and_then(|l| l.name.clone())
                    .filter(|n| !n.trim().is_empty());
                binding.league_name.fill(name);
            }
        }
        Err(e) => warn!(account = %account.username, error = %e, "user league list failed"),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerPoints {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Option<Position>,
    pub season: Season,
    pub week: Week,
    pub league_id: String,
    pub scoring_field: &'static str,
    /// `None` when the player has no stat line for the week.
    pub points: Option<f64>,
    pub stats: RawStats,
}

/// Actual points one player scored in a week under the resolved league's
/// weights.
pub async fn player_points(
    service: &SleeperService,
    player: &PlayerId,
    week: Option<Week>,
    hint: Option<&str>,
) -> Result<PlayerPoints> {
    let resolution = service.resolve(hint).await?;
    let league_id = &resolution.binding.league_id;
    let client = service.client();

    let state = service.current_state().await?;
    let week = week.unwrap_or(state.week);

    let (league, lines) = tokio::try_join!(
        client.league(league_id),
        client.player_stats(player, state.season),
    )?;
    service.load_players_best_effort().await;

    let line = lines.get(&week.to_string()).and_then(Option::as_ref);
    let weights = &league.scoring_settings;
    Ok(PlayerPoints {
        player_id: player.clone(),
        name: service.players().name_of(player),
        position: service.players().get(player).and_then(|p| p.primary_position()),
        season: state.season,
        week,
        league_id: league_id.to_string(),
        scoring_field: ReceptionFormat::from_weights(weights).points_field(),
        points: line.map(|l| compute_points(&l.stats, weights)),
        stats: line.map(|l| l.stats.clone()).unwrap_or_default(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickLine {
    pub round: u32,
    pub pick_no: u32,
    pub roster_id: Option<RosterId>,
    pub team: Option<String>,
    pub player_id: PlayerId,
    pub name: String,
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftSummary {
    pub draft_id: String,
    pub status: Option<String>,
    pub kind: Option<String>,
    pub season: Option<Season>,
    pub rounds: Option<u32>,
    pub picks: Vec<PickLine>,
}

pub async fn league_drafts(service: &SleeperService, hint: Option<&str>) -> Result<Vec<DraftSummary>> {
    let resolution = service.resolve(hint).await?;
    let league_id = &resolution.binding.league_id;
    let client = service.client();

    let (drafts, rosters, users) = tokio::try_join!(
        client.league_drafts(league_id),
        service.cache().rosters(client, league_id),
        client.league_users(league_id),
    )?;
    let picks = try_join_all(drafts.iter().map(|d| client.draft_picks(&d.draft_id))).await?;
    service.load_players_best_effort().await;

    let teams = team_directory(&rosters, &users);
    let directory = service.players();
    Ok(drafts
        .into_iter()
        .zip(picks)
        .map(|(draft, picks)| DraftSummary {
            picks: picks
                .into_iter()
                .map(|p| PickLine {
                    team: p
                        .roster_id
                        .and_then(|r| teams.get(&r))
                        .and_then(|t| t.team_name.clone()),
                    name: directory.name_of(&p.player_id),
                    position: directory.get(&p.player_id).and_then(|r| r.primary_position()),
                    round: p.round,
                    pick_no: p.pick_no,
                    roster_id: p.roster_id,
                    player_id: p.player_id,
                })
                .collect(),
            draft_id: draft.draft_id,
            status: draft.status,
            kind: draft.kind,
            season: draft.season,
            rounds: draft.settings.rounds,
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketLine {
    pub round: u32,
    pub match_id: u32,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub placement: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayoffBracket {
    pub league_id: String,
    pub winners: Vec<BracketLine>,
    pub losers: Vec<BracketLine>,
}

/// Team label for a bracket slot. Slots not yet decided stay `None`; rosters
/// without an owner fall back to the roster number.
fn label(slot: Option<RosterId>, teams: &HashMap<RosterId, TeamInfo>) -> Option<String> {
    slot.map(|rid| {
        teams
            .get(&rid)
            .and_then(|t| t.team_name.clone())
            .unwrap_or_else(|| format!("Roster {}", rid))
    })
}

pub fn bracket_lines(matches: &[BracketMatch], teams: &HashMap<RosterId, TeamInfo>) -> Vec<BracketLine> {
    let mut lines: Vec<BracketLine> = matches
        .iter()
        .map(|m| BracketLine {
            round: m.r,
            match_id: m.m,
            team1: label(m.t1, teams),
            team2: label(m.t2, teams),
            winner: label(m.w, teams),
            loser: label(m.l, teams),
            placement: m.p,
        })
        .collect();
    lines.sort_by_key(|l| (l.round, l.match_id));
    lines
}

pub async fn playoff_bracket(service: &SleeperService, hint: Option<&str>) -> Result<PlayoffBracket> {
    let resolution = service.resolve(hint).await?;
    let league_id = &resolution.binding.league_id;
    let client = service.client();

    let (winners, losers, rosters, users) = tokio::try_join!(
        client.winners_bracket(league_id),
        client.losers_bracket(league_id),
        service.cache().rosters(client, league_id),
        client.league_users(league_id),
    )?;

    let teams = team_directory(&rosters, &users);
    Ok(PlayoffBracket {
        league_id: league_id.to_string(),
        winners: bracket_lines(&winners, &teams),
        losers: bracket_lines(&losers, &teams),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub active_season: Option<Season>,
    pub active_week: Option<Week>,
    pub ttl_secs: u64,
    pub players_loaded: usize,
    pub entries: CacheStats,
}

/// Diagnostics for the in-process caches.
pub fn cache_report(service: &SleeperService) -> CacheReport {
    let active = service.cache().active_period();
    let directory: &PlayerDirectory = service.players();
    CacheReport {
        active_season: active.map(|(s, _)| s),
        active_week: active.map(|(_, w)| w),
        ttl_secs: service.cache().ttl().as_secs(),
        players_loaded: directory.len(),
        entries: service.cache().stats(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bracket_lines_sorted_and_labelled() {
        let matches: Vec<BracketMatch> = serde_json::from_value(json!([
            { "r": 2, "m": 3, "t1": null, "t2": null, "w": null, "l": null, "p": 1 },
            { "r": 1, "m": 2, "t1": 3, "t2": 4, "w": 4, "l": 3 },
            { "r": 1, "m": 1, "t1": 1, "t2": 2, "w": 1, "l": 2 }
        ]))
        .unwrap();
        let teams = HashMap::from([(
            RosterId::new(1),
            TeamInfo {
                owner: Some("alice".into()),
                team_name: Some("Aces".into()),
                avatar: None,
            },
        )]);

        let lines = bracket_lines(&matches, &teams);
        assert_eq!(
            lines.iter().map(|l| (l.round, l.match_id)).collect::<Vec<_>>(),
            vec![(1, 1), (1, 2), (2, 3)]
        );
        assert_eq!(lines[0].winner.as_deref(), Some("Aces"));
        assert_eq!(lines[0].loser.as_deref(), Some("Roster 2"));
        assert_eq!(lines[2].team1, None);
        assert_eq!(lines[2].placement, Some(1));
    }
}
