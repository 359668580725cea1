//! Waiver-wire ranking.
//!
//! Ranking runs in two passes. The first is entirely in memory: every
//! unrostered player gets the number of recent add transactions across the
//! platform plus a flat bonus when their position is one we are thin at.
//! The second pass fetches live projections, but only for the top slice of
//! that preliminary list, so a request never fans out to one call per free
//! agent.

use futures::future::join_all;
use serde::Serialize;
use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};
use tracing::{debug, warn};

use super::common::{find_roster, position_needs, rostered_players, PositionNeed, SleeperService};
use crate::{
    cli::types::{LeagueId, PlayerId, Position, Season, Week},
    core::PlayerDirectory,
    error::Result,
    sleeper::{compute_points, http::TrendingKind, types::ScoringWeights},
};

pub const NEED_BONUS: f64 = 25.0;
pub const PROBE_MULTIPLIER: usize = 3;
pub const MAX_PROBES: usize = 50;
pub const DEFAULT_LIMIT: usize = 10;

const TRENDING_LOOKBACK_HOURS: u32 = 24;
const TRENDING_LIMIT: u32 = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaiverCandidate {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
    pub team: Option<String>,
    pub injury_status: Option<String>,
    pub trending_adds: u32,
    pub need_bonus: f64,
    pub preliminary_score: f64,
    pub projected_points: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaiverReport {
    pub league_id: String,
    pub season: Season,
    pub week: Week,
    pub needs: Vec<PositionNeed>,
    pub candidates: Vec<WaiverCandidate>,
}

/// How many candidates get a live projection lookup.
pub fn probe_count(limit: usize) -> usize {
    limit.saturating_mul(PROBE_MULTIPLIER).min(MAX_PROBES)
}

/// First pass: in-memory scoring of every free agent, best first.
pub fn preliminary_ranking(
    directory: &PlayerDirectory,
    rostered: &HashSet<&PlayerId>,
    trending: &HashMap<PlayerId, u32>,
    short_positions: &HashSet<Position>,
    position: Option<Position>,
) -> Vec<WaiverCandidate> {
    let mut candidates: Vec<WaiverCandidate> = directory
        .iter()
        .filter(|p| p.team.is_some() && !rostered.contains(&p.player_id))
        .filter_map(|p| {
            let pos = p.primary_position().filter(Position::is_player_position)?;
            if position.is_some_and(|wanted| wanted != pos) {
                return None;
            }
            let trending_adds = trending.get(&p.player_id).copied().unwrap_or(0);
            let need_bonus = if short_positions.contains(&pos) { NEED_BONUS } else { 0.0 };
            Some(WaiverCandidate {
                player_id: p.player_id.clone(),
                name: p.name(),
                position: pos,
                team: p.team.clone(),
                injury_status: p.injury_status.clone(),
                trending_adds,
                need_bonus,
                preliminary_score: f64::from(trending_adds) + need_bonus,
                projected_points: None,
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.preliminary_score
            .partial_cmp(&a.preliminary_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.player_id.as_str().cmp(b.player_id.as_str()))
    });
    candidates
}

/// Second pass ordering: projected players first, best projection first,
/// preliminary score breaking ties and ordering the unprojected tail.
pub fn final_ranking(mut candidates: Vec<WaiverCandidate>, limit: usize) -> Vec<WaiverCandidate> {
    candidates.sort_by(|a, b| {
        let by_projection = match (a.projected_points, b.projected_points) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_projection.then_with(|| {
            b.preliminary_score
                .partial_cmp(&a.preliminary_score)
                .unwrap_or(Ordering::Equal)
        })
    });
    candidates.truncate(limit);
    candidates
}

async fn probe_projection(
    service: &SleeperService,
    league_id: &LeagueId,
    player: &PlayerId,
    season: Season,
    week: Week,
    weights: &ScoringWeights,
) -> Option<f64> {
    match service
        .cache()
        .player_projections(service.client(), league_id, player, season)
        .await
    {
        Ok(rows) => rows
            .get(&week.to_string())
            .and_then(Option::as_ref)
            .map(|line| compute_points(&line.stats, weights)),
        Err(e) => {
            warn!(player = %player, error = %e, "projection probe failed");
            None
        }
    }
}

pub async fn rank_waivers(
    service: &SleeperService,
    hint: Option<&str>,
    position: Option<Position>,
    limit: usize,
) -> Result<WaiverReport> {
    let resolution = service.resolve(hint).await?;
    let roster_id = resolution.require_roster()?;
    let league_id = &resolution.binding.league_id;
    let client = service.client();

    let (state, league, rosters, trending, ()) = tokio::try_join!(
        service.current_state(),
        client.league(league_id),
        service.cache().rosters(client, league_id),
        client.trending_players(TrendingKind::Add, TRENDING_LOOKBACK_HOURS, TRENDING_LIMIT),
        service.players().ensure_loaded(client),
    )?;
    let directory = service.players();

    let mine = find_roster(&rosters, roster_id)?;
    let needs = position_needs(&league, mine, directory);
    let short: HashSet<Position> = needs.iter().filter(|n| n.is_short()).map(|n| n.position).collect();
    let trending: HashMap<PlayerId, u32> = trending.into_iter().map(|t| (t.player_id, t.count)).collect();

    let mut ranked = preliminary_ranking(
        directory,
        &rostered_players(&rosters),
        &trending,
        &short,
        position,
    );
    ranked.truncate(probe_count(limit));
    debug!(probes = ranked.len(), "probing waiver projections");

    let (season, week) = (state.season, state.week);
    let weights = &league.scoring_settings;
    let projections = join_all(
        ranked
            .iter()
            .map(|c| probe_projection(service, league_id, &c.player_id, season, week, weights)),
    )
    .await;
    for (candidate, projected) in ranked.iter_mut().zip(projections) {
        candidate.projected_points = projected;
    }

    Ok(WaiverReport {
        league_id: league_id.to_string(),
        season,
        week,
        needs,
        candidates: final_ranking(ranked, limit),
    })
}
