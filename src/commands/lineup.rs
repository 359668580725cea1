//! Lineup evaluation: flat position-tier scores for starters and bench,
//! with the first stronger bench player at the same position suggested as
//! a swap for each starter.

use serde::Serialize;

use super::common::{find_roster, is_empty_slot, lineup_score, SleeperService};
use crate::{
    cli::types::{PlayerId, Position, RosterId},
    core::PlayerDirectory,
    error::Result,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupSlot {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Option<Position>,
    pub injury_status: Option<String>,
    pub score: f64,
}

impl LineupSlot {
    pub fn from_directory(id: &PlayerId, directory: &PlayerDirectory) -> Self {
        let record = directory.get(id);
        let position = record.as_ref().and_then(|p| p.primary_position());
        let base = lineup_score(position);
        let injured = record.as_ref().is_some_and(|p| p.is_injured());
        Self {
            player_id: id.clone(),
            name: directory.name_of(id),
            position,
            injury_status: record.and_then(|p| p.injury_status.clone()),
            score: if injured { base / 2.0 } else { base },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupSuggestion {
    pub bench: LineupSlot,
    pub start_over: LineupSlot,
    pub gain: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineupEvaluation {
    pub league_id: String,
    pub roster_id: RosterId,
    pub starters: Vec<LineupSlot>,
    pub bench: Vec<LineupSlot>,
    pub starter_total: f64,
    pub suggestions: Vec<LineupSuggestion>,
}

/// For each starter, the first bench player at the same position with a
/// strictly higher score. Players of unknown position are never swapped.
pub fn suggest_swaps(starters: &[LineupSlot], bench: &[LineupSlot]) -> Vec<LineupSuggestion> {
    starters
        .iter()
        .filter(|s| s.position.is_some())
        .filter_map(|starter| {
            bench
                .iter()
                .find(|b| b.position == starter.position && b.score > starter.score)
                .map(|better| LineupSuggestion {
                    bench: better.clone(),
                    start_over: starter.clone(),
                    gain: better.score - starter.score,
                })
        })
        .collect()
}

pub async fn evaluate_lineup(service: &SleeperService, hint: Option<&str>) -> Result<LineupEvaluation> {
    let resolution = service.resolve(hint).await?;
    let roster_id = resolution.require_roster()?;
    let league_id = &resolution.binding.league_id;

    let (rosters, ()) = tokio::try_join!(
        service.cache().rosters(service.client(), league_id),
        service.players().ensure_loaded(service.client()),
    )?;
    let directory = service.players();
    let roster = find_roster(&rosters, roster_id)?;

    let starters: Vec<LineupSlot> = roster
        .starters
        .iter()
        .filter(|id| !is_empty_slot(id))
        .map(|id| LineupSlot::from_directory(id, directory))
        .collect();
    let bench: Vec<LineupSlot> = roster
        .bench()
        .map(|id| LineupSlot::from_directory(id, directory))
        .collect();

    Ok(LineupEvaluation {
        league_id: league_id.to_string(),
        roster_id,
        starter_total: starters.iter().map(|s| s.score).sum(),
        suggestions: suggest_swaps(&starters, &bench),
        starters,
        bench,
    })
}
