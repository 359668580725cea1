//! Trade evaluation
//!
//! Each player is worth a flat position-tier value (cut by 30% when the
//! player carries an injury designation). The two packages are compared by
//! the gap relative to the larger side, and both rosters are checked for
//! thin positions after the swap.

use serde::Serialize;
use std::collections::HashSet;

use super::common::{find_roster, position_counts, trade_value, SleeperService, INJURED_TRADE_FACTOR};
use crate::{
    cli::types::{PlayerId, Position, RosterId},
    core::PlayerDirectory,
    error::Result,
    sleeper::types::Roster,
};

/// Gap below which a trade is considered even, as a percentage of the
/// larger side.
pub const FAIR_THRESHOLD_PCT: f64 = 15.0;
/// Gap above which one side clearly wins.
pub const SIGNIFICANT_THRESHOLD_PCT: f64 = 30.0;

/// Minimum healthy depth per position after a trade.
pub const DEPTH_MINIMUMS: [(Position, usize); 3] =
    [(Position::RB, 4), (Position::WR, 5), (Position::QB, 2)];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuedPlayer {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Option<Position>,
    pub injury_status: Option<String>,
    pub value: f64,
}

impl ValuedPlayer {
    pub fn from_directory(id: &PlayerId, directory: &PlayerDirectory) -> Self {
        let record = directory.get(id);
        let position = record.as_ref().and_then(|p| p.primary_position());
        let injured = record.as_ref().is_some_and(|p| p.is_injured());
        let base = trade_value(position);
        Self {
            player_id: id.clone(),
            name: directory.name_of(id),
            position,
            injury_status: record.and_then(|p| p.injury_status.clone()),
            value: if injured { base * INJURED_TRADE_FACTOR } else { base },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fairness {
    Fair,
    SlightEdge,
    SignificantEdge,
}

impl Fairness {
    pub fn classify(percent_difference: f64) -> Self {
        if percent_difference < FAIR_THRESHOLD_PCT {
            Fairness::Fair
        } else if percent_difference <= SIGNIFICANT_THRESHOLD_PCT {
            Fairness::SlightEdge
        } else {
            Fairness::SignificantEdge
        }
    }
}

/// Who ends up with the more valuable package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Favors {
    /// The package you receive is worth more.
    You,
    /// The package you give away is worth more.
    Partner,
    Even,
}

/// Value comparison of two packages, independent of any roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeAssessment {
    pub give: Vec<ValuedPlayer>,
    pub receive: Vec<ValuedPlayer>,
    pub give_value: f64,
    pub receive_value: f64,
    pub value_difference: f64,
    pub percent_difference: f64,
    pub fairness: Fairness,
    pub favors: Favors,
    pub recommendation: String,
}

pub fn assess_trade(give: Vec<ValuedPlayer>, receive: Vec<ValuedPlayer>) -> TradeAssessment {
    let give_value: f64 = give.iter().map(|p| p.value).sum();
    let receive_value: f64 = receive.iter().map(|p| p.value).sum();
    let value_difference = (receive_value - give_value).abs();
    let larger = give_value.max(receive_value);
    let percent_difference = if larger > 0.0 {
        value_difference / larger * 100.0
    } else {
        0.0
    };

    let fairness = Fairness::classify(percent_difference);
    let favors = if receive_value > give_value {
        Favors::You
    } else if give_value > receive_value {
        Favors::Partner
    } else {
        Favors::Even
    };

    let recommendation = match (fairness, favors) {
        (Fairness::Fair, _) | (_, Favors::Even) => "Fair trade: values are close".to_string(),
        (Fairness::SlightEdge, Favors::You) => "Slight edge in your favor".to_string(),
        (Fairness::SlightEdge, Favors::Partner) => "Slight edge to your trade partner".to_string(),
        (Fairness::SignificantEdge, Favors::You) => "Strongly favors you: accept".to_string(),
        (Fairness::SignificantEdge, Favors::Partner) => {
            "Strongly favors your trade partner: ask for more".to_string()
        }
    };

    TradeAssessment {
        give,
        receive,
        give_value,
        receive_value,
        value_difference,
        percent_difference,
        fairness,
        favors,
        recommendation,
    }
}

/// Positions that drop below their minimum because of the swap.
///
/// A position that was already thin and is untouched by the trade is not
/// reported.
pub fn depth_warnings(
    side: &str,
    before: &[PlayerId],
    outgoing: &[PlayerId],
    incoming: &[PlayerId],
    directory: &PlayerDirectory,
) -> Vec<String> {
    let leaving: HashSet<&PlayerId> = outgoing.iter().collect();
    let after: Vec<&PlayerId> = before
        .iter()
        .filter(|p| !leaving.contains(p))
        .chain(incoming.iter())
        .collect();

    let counts_before = position_counts(before, directory);
    let counts_after = position_counts(after, directory);

    DEPTH_MINIMUMS
        .iter()
        .filter_map(|&(pos, minimum)| {
            let was = counts_before.get(&pos).copied().unwrap_or(0);
            let now = counts_after.get(&pos).copied().unwrap_or(0);
            (now < minimum && now < was).then(|| {
                format!("{} would have only {} {} (minimum {})", side, now, pos, minimum)
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeEvaluation {
    pub league_id: String,
    pub roster_id: RosterId,
    pub partner_roster_id: Option<RosterId>,
    #[serde(flatten)]
    pub assessment: TradeAssessment,
    pub depth_warnings: Vec<String>,
}

/// The roster that holds the first player we would receive.
fn partner_roster<'a>(rosters: &'a [Roster], mine: RosterId, receive: &[PlayerId]) -> Option<&'a Roster> {
    receive.iter().find_map(|id| {
        rosters
            .iter()
            .find(|r| r.roster_id != mine && r.players.contains(id))
    })
}

pub async fn evaluate_trade(
    service: &SleeperService,
    hint: Option<&str>,
    give: &[PlayerId],
    receive: &[PlayerId],
) -> Result<TradeEvaluation> {
    let resolution = service.resolve(hint).await?;
    let roster_id = resolution.require_roster()?;
    let league_id = &resolution.binding.league_id;

    let (rosters, ()) = tokio::try_join!(
        service.cache().rosters(service.client(), league_id),
        service.players().ensure_loaded(service.client()),
    )?;
    let directory = service.players();

    let mine = find_roster(&rosters, roster_id)?;
    let assessment = assess_trade(
        give.iter().map(|id| ValuedPlayer::from_directory(id, directory)).collect(),
        receive.iter().map(|id| ValuedPlayer::from_directory(id, directory)).collect(),
    );

    let mut warnings = depth_warnings("You", &mine.players, give, receive, directory);
    let partner = partner_roster(&rosters, roster_id, receive);
    if let Some(partner) = partner {
        warnings.extend(depth_warnings(
            "Your trade partner",
            &partner.players,
            receive,
            give,
            directory,
        ));
    }

    Ok(TradeEvaluation {
        league_id: league_id.to_string(),
        roster_id,
        partner_roster_id: partner.map(|r| r.roster_id),
        assessment,
        depth_warnings: warnings,
    })
}
