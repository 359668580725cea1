//! Season history: week-by-week results for my roster.
//!
//! Weeks are fetched one at a time; a full season is a dozen or more
//! requests and they go through the pacer in order.

use serde::Serialize;

use super::{common::SleeperService, matchup::find_opponent};
use crate::{
    cli::types::{RosterId, Week},
    error::Result,
    sleeper::types::Matchup,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
    Tie,
    Bye,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekResult {
    pub week: Week,
    pub points: Option<f64>,
    pub opponent_roster_id: Option<RosterId>,
    pub opponent_points: Option<f64>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonHistory {
    pub league_id: String,
    pub roster_id: RosterId,
    pub completed_weeks: u16,
    pub record: Record,
    pub weeks: Vec<WeekResult>,
}

pub fn week_result(week: Week, matchups: &[Matchup], roster_id: RosterId) -> WeekResult {
    let points = matchups
        .iter()
        .find(|m| m.roster_id == roster_id)
        .and_then(|m| m.points);
    let Some(opponent) = find_opponent(matchups, roster_id) else {
        return WeekResult {
            week,
            points,
            opponent_roster_id: None,
            opponent_points: None,
            outcome: Outcome::Bye,
        };
    };

    let mine = points.unwrap_or(0.0);
    let theirs = opponent.points.unwrap_or(0.0);
    let outcome = if mine > theirs {
        Outcome::Win
    } else if mine < theirs {
        Outcome::Loss
    } else {
        Outcome::Tie
    };
    WeekResult {
        week,
        points,
        opponent_roster_id: Some(opponent.roster_id),
        opponent_points: opponent.points,
        outcome,
    }
}

pub fn tally(weeks: &[WeekResult]) -> Record {
    let mut record = Record::default();
    for w in weeks {
        match w.outcome {
            Outcome::Win => record.wins += 1,
            Outcome::Loss => record.losses += 1,
            Outcome::Tie => record.ties += 1,
            Outcome::Bye => {}
        }
        record.points_for += w.points.unwrap_or(0.0);
        record.points_against += w.opponent_points.unwrap_or(0.0);
    }
    record
}

/// Results for every completed week (1 up to, not including, the current
/// one).
pub async fn season_history(service: &SleeperService, hint: Option<&str>) -> Result<SeasonHistory> {
    let resolution = service.resolve(hint).await?;
    let roster_id = resolution.require_roster()?;
    let league_id = &resolution.binding.league_id;

    let state = service.current_state().await?;
    let completed = state.week.as_u16().saturating_sub(1);

    let mut weeks = Vec::with_capacity(usize::from(completed));
    for n in 1..=completed {
        let week = Week::new(n);
        let matchups = service.cache().matchups(service.client(), league_id, week).await?;
        weeks.push(week_result(week, &matchups, roster_id));
    }

    Ok(SeasonHistory {
        league_id: league_id.to_string(),
        roster_id,
        completed_weeks: completed,
        record: tally(&weeks),
        weeks,
    })
}
