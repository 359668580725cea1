//! Serde shapes for the Sleeper REST payloads.
//!
//! Every optional field the API is known to omit or null out is an
//! `Option` (or `#[serde(default)]`), so malformed records fail at the
//! fetch boundary instead of deep inside an operation.

use crate::cli::types::{LeagueId, PlayerId, Position, RosterId, Season, UserId, Week};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};


/// Stat maps occasionally carry `null` or string values; keep only numbers.
fn de_numeric_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Deserialize::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| v.as_f64().map(|n| (k, n)))
        .collect())
}

fn de_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A league's stat-category weights (`scoring_settings`), e.g. `rec -> 1.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoringWeights(#[serde(deserialize_with = "de_numeric_map")] pub BTreeMap<String, f64>);

impl ScoringWeights {
    pub fn get(&self, category: &str) -> Option<f64> {
        self.0.get(category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<const N: usize> From<[(&str, f64); N]> for ScoringWeights {
    fn from(pairs: [(&str, f64); N]) -> Self {
        Self(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

/// Raw per-category statistics for one player and period.
pub type RawStats = BTreeMap<String, f64>;

/// `/user/{handle}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub user_id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LeagueSettings {
    #[serde(default)]
    pub playoff_week_start: Option<u16>,
    #[serde(default)]
    pub num_teams: Option<u32>,
    #[serde(default)]
    pub waiver_type: Option<u32>,
}

/// `/league/{id}` and entries of `/user/{id}/leagues/nfl/{season}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct League {
    pub league_id: LeagueId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_rosters: Option<u32>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub roster_positions: Vec<String>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub scoring_settings: ScoringWeights,
    #[serde(default, deserialize_with = "de_null_default")]
    pub settings: LeagueSettings,
    #[serde(default)]
    pub previous_league_id: Option<LeagueId>,
    #[serde(default)]
    pub draft_id: Option<String>,
}

impl League {
    /// Number of dedicated starting slots per player position.
    ///
    /// Flex-style slots are not attributed to any single position.
    pub fn required_starters(&self) -> BTreeMap<Position, usize> {
        let mut counts = BTreeMap::new();
        for slot in &self.roster_positions {
            if let Ok(pos) = slot.parse::<Position>() {
                if pos.is_player_position() {
                    *counts.entry(pos).or_insert(0) += 1;
                }
            }
        }
        counts
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RosterSettings {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    #[serde(default)]
    pub fpts: f64,
    #[serde(default)]
    pub fpts_decimal: f64,
}

/// `/league/{id}/rosters`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Roster {
    pub roster_id: RosterId,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub co_owners: Vec<UserId>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub players: Vec<PlayerId>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub starters: Vec<PlayerId>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub reserve: Vec<PlayerId>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub taxi: Vec<PlayerId>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub settings: RosterSettings,
}

impl Roster {
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner_id.as_ref() == Some(user) || self.co_owners.contains(user)
    }

    /// Rostered players not in the starting lineup (reserve and taxi included).
    pub fn bench(&self) -> impl Iterator<Item = &PlayerId> {
        self.players.iter().filter(|p| !self.starters.contains(p))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LeagueUserMetadata {
    #[serde(default)]
    pub team_name: Option<String>,
}

/// `/league/{id}/users`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeagueUser {
    pub user_id: UserId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub metadata: LeagueUserMetadata,
}

impl LeagueUser {
    pub fn team_label(&self) -> String {
        self.metadata
            .team_name
            .clone()
            .or_else(|| self.display_name.clone())
            .unwrap_or_else(|| self.user_id.to_string())
    }
}

/// `/league/{id}/matchups/{week}`
///
/// `matchup_id` is null for a team on bye.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Matchup {
    pub roster_id: RosterId,
    #[serde(default)]
    pub matchup_id: Option<u32>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub starters: Vec<PlayerId>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub players: Vec<PlayerId>,
    #[serde(default, deserialize_with = "de_numeric_map")]
    pub players_points: BTreeMap<String, f64>,
}

/// `/league/{id}/transactions/{week}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Transaction {
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub roster_ids: Vec<RosterId>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub adds: HashMap<PlayerId, RosterId>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub drops: HashMap<PlayerId, RosterId>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub leg: Option<Week>,
}

/// `/players/nfl/trending/{add|drop}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrendingPlayer {
    pub player_id: PlayerId,
    #[serde(default)]
    pub count: u32,
}

/// One entry of the `/players/nfl` catalog.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerRecord {
    pub player_id: PlayerId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub fantasy_positions: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub injury_status: Option<String>,
    #[serde(default)]
    pub years_exp: Option<u32>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
}

impl PlayerRecord {
    pub fn name(&self) -> String {
        if let Some(full) = self.full_name.as_deref().filter(|n| !n.is_empty()) {
            return full.to_string();
        }
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(f), Some(l)) => format!("{} {}", f, l),
            (Some(n), None) | (None, Some(n)) => n.to_string(),
            (None, None) => self.player_id.to_string(),
        }
    }

    pub fn primary_position(&self) -> Option<Position> {
        self.position.as_deref().and_then(|p| p.parse().ok())
    }

    /// Carries any injury designation (Questionable, Out, IR, ...).
    pub fn is_injured(&self) -> bool {
        self.injury_status
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}

/// `/state/nfl`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NflState {
    pub week: Week,
    pub season: Season,
    #[serde(default)]
    pub season_type: Option<String>,
    #[serde(default)]
    pub display_week: Option<Week>,
    #[serde(default)]
    pub leg: Option<Week>,
}

/// One row of a bulk or per-player projection/stat response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatLine {
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    #[serde(default, deserialize_with = "de_numeric_map")]
    pub stats: RawStats,
    #[serde(default)]
    pub week: Option<Week>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub opponent: Option<String>,
}

/// Per-player stat/projection lookups come back keyed by week, with
/// `null` for weeks the player did not play.
pub type WeeklyStatLines = BTreeMap<String, Option<StatLine>>;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DraftSettings {
    #[serde(default)]
    pub rounds: Option<u32>,
    #[serde(default)]
    pub teams: Option<u32>,
}

/// `/league/{id}/drafts`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Draft {
    pub draft_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub settings: DraftSettings,
}

/// `/draft/{id}/picks`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DraftPick {
    pub round: u32,
    pub pick_no: u32,
    #[serde(default)]
    pub roster_id: Option<RosterId>,
    pub player_id: PlayerId,
    #[serde(default)]
    pub picked_by: Option<UserId>,
}

/// `/league/{id}/winners_bracket` and `/losers_bracket`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BracketMatch {
    /// Round
    pub r: u32,
    /// Match id
    pub m: u32,
    #[serde(default)]
    pub t1: Option<RosterId>,
    #[serde(default)]
    pub t2: Option<RosterId>,
    #[serde(default)]
    pub w: Option<RosterId>,
    #[serde(default)]
    pub l: Option<RosterId>,
    /// Final placement this match decides, when it decides one.
    #[serde(default)]
    pub p: Option<u32>,
}
