//! Trade targets: players at my thin positions who sit on rosters with a
//! surplus there.

use serde::Serialize;
use std::cmp::Ordering;

use super::{
    common::{
        depth_thresholds, find_roster, position_counts, position_needs, team_directory, PositionNeed,
        SleeperService,
    },
    trade::ValuedPlayer,
};
use crate::{
    cli::types::{Position, RosterId},
    core::PlayerDirectory,
    error::Result,
    sleeper::types::{League, Roster},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeTarget {
    #[serde(flatten)]
    pub player: ValuedPlayer,
    pub team: Option<String>,
    pub owner_roster_id: RosterId,
    pub owner: Option<String>,
    pub owner_depth: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeTargetReport {
    pub league_id: String,
    pub roster_id: RosterId,
    pub needs: Vec<PositionNeed>,
    pub targets: Vec<TradeTarget>,
}

/// Positions to shop for: the requested one, or every position I am short at.
pub fn target_positions(needs: &[PositionNeed], requested: Option<Position>) -> Vec<Position> {
    match requested {
        Some(pos) => vec![pos],
        None => needs.iter().filter(|n| n.is_short()).map(|n| n.position).collect(),
    }
}

/// Players at `positions` on other rosters that hold more than the league's
/// depth threshold there, most valuable first. Owners are filled in later.
pub fn surplus_players(
    league: &League,
    rosters: &[Roster],
    mine: RosterId,
    positions: &[Position],
    directory: &PlayerDirectory,
) -> Vec<TradeTarget> {
    let thresholds = depth_thresholds(league);
    let mut targets = Vec::new();

    for roster in rosters.iter().filter(|r| r.roster_id != mine) {
        let counts = position_counts(&roster.players, directory);
        for &pos in positions {
            let depth = counts.get(&pos).copied().unwrap_or(0);
            let threshold = thresholds.get(&pos).copied().unwrap_or(1);
            if depth <= threshold {
                continue;
            }
            for id in &roster.players {
                let Some(record) = directory.get(id) else { continue };
                if record.primary_position() != Some(pos) {
                    continue;
                }
                targets.push(TradeTarget {
                    player: ValuedPlayer::from_directory(id, directory),
                    team: record.team.clone(),
                    owner_roster_id: roster.roster_id,
                    owner: None,
                    owner_depth: depth,
                });
            }
        }
    }

    targets.sort_by(|a, b| {
        b.player
            .value
            .partial_cmp(&a.player.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.owner_depth.cmp(&a.owner_depth))
    });
    targets
}

pub async fn find_trade_targets(
    service: &SleeperService,
    hint: Option<&str>,
    position: Option<Position>,
    limit: usize,
) -> Result<TradeTargetReport> {
    let resolution = service.resolve(hint).await?;
    let roster_id = resolution.require_roster()?;
    let league_id = &resolution.binding.league_id;
    let client = service.client();

    let (league, rosters, users, ()) = tokio::try_join!(
        client.league(league_id),
        service.cache().rosters(client, league_id),
        client.league_users(league_id),
        service.players().ensure_loaded(client),
    )?;
    let directory = service.players();

    let needs = position_needs(&league, find_roster(&rosters, roster_id)?, directory);
    let positions = target_positions(&needs, position);
    let teams = team_directory(&rosters, &users);

    let mut targets = surplus_players(&league, &rosters, roster_id, &positions, directory);
    targets.truncate(limit);
    for target in &mut targets {
        target.owner = teams
            .get(&target.owner_roster_id)
            .and_then(|t| t.team_name.clone());
    }

    Ok(TradeTargetReport {
        league_id: league_id.to_string(),
        roster_id,
        needs,
        targets,
    })
}
