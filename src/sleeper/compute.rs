use std::collections::HashMap;

use crate::{
    cli::types::PlayerId,
    sleeper::types::{RawStats, ScoringWeights, StatLine},
};


/// Upstream-computed totals that ride along with raw stat categories.
pub const PTS_PPR: &str = "pts_ppr";
pub const PTS_HALF_PPR: &str = "pts_half_ppr";
pub const PTS_STD: &str = "pts_std";

const PREAGGREGATED: [&str; 3] = [PTS_PPR, PTS_HALF_PPR, PTS_STD];

/// League reception convention, read from the `rec` weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceptionFormat {
    Ppr,
    HalfPpr,
    Standard,
}

impl ReceptionFormat {
    pub fn from_weights(weights: &ScoringWeights) -> Self {
        match weights.get("rec") {
            Some(w) if w == 1.0 => ReceptionFormat::Ppr,
            Some(w) if w == 0.5 => ReceptionFormat::HalfPpr,
            _ => ReceptionFormat::Standard,
        }
    }

    /// Pre-aggregated field matching this convention.
    pub fn points_field(&self) -> &'static str {
        match self {
            ReceptionFormat::Ppr => PTS_PPR,
            ReceptionFormat::HalfPpr => PTS_HALF_PPR,
            ReceptionFormat::Standard => PTS_STD,
        }
    }
}

/// Fantasy points for one stat line under a league's weights.
///
/// Sums `stat * weight` over every weighted category present in `raw`.
/// When that sum is exactly zero (typically because upstream only sent
/// pre-aggregated totals) the matching `pts_*` field is used instead.
/// No rounding is applied.
pub fn compute_points(raw: &RawStats, weights: &ScoringWeights) -> f64 {
    let mut total = 0.0;
    for (category, weight) in weights.iter() {
        if weight == 0.0 || PREAGGREGATED.contains(&category) {
            continue;
        }
        if let Some(value) = raw.get(category) {
            total += value * weight;
        }
    }

    if total == 0.0 {
        let field = ReceptionFormat::from_weights(weights).points_field();
        return raw.get(field).copied().unwrap_or(0.0);
    }
    total
}

/// Score every row that carries a player id.
pub fn score_lines(lines: &[StatLine], weights: &ScoringWeights) -> HashMap<PlayerId, f64> {
    lines
        .iter()
        .filter_map(|line| {
            let id = line.player_id.clone()?;
            Some((id, compute_points(&line.stats, weights)))
        })
        .collect()
}
