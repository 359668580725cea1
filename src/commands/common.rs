//! Common utilities and helper functions shared across operations.
//!
//! [`SleeperService`] plays the role of a command context: it owns the
//! shared client, caches and player directory, and borrows the
//! configuration every operation resolves against.

use serde::Serialize;
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};
use tracing::warn;

use crate::{
    cli::types::{PlayerId, Position, RosterId},
    config::AppConfig,
    core::{IdentityResolver, PeriodCache, PlayerDirectory, Resolution},
    error::{ErrorKind, Result, SleeperError},
    sleeper::{
        http::SleeperClient,
        types::{League, LeagueUser, NflState, Roster},
    },
};

/// Shared state for every operation.
pub struct SleeperService {
    config: Arc<AppConfig>,
    client: SleeperClient,
    cache: PeriodCache,
    players: PlayerDirectory,
}

impl SleeperService {
    pub fn new(config: Arc<AppConfig>) -> Result<Self> {
        let client = SleeperClient::new(config.endpoints.clone(), config.request_interval)?;
        let cache = PeriodCache::new(config.cache_ttl);
        Ok(Self {
            config,
            client,
            cache,
            players: PlayerDirectory::new(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn client(&self) -> &SleeperClient {
        &self.client
    }

    pub fn cache(&self) -> &PeriodCache {
        &self.cache
    }

    pub fn players(&self) -> &PlayerDirectory {
        &self.players
    }

    pub fn resolver(&self) -> IdentityResolver<'_> {
        IdentityResolver::new(&self.config, &self.client, &self.cache)
    }

    pub async fn resolve(&self, hint: Option<&str>) -> Result<Resolution> {
        self.resolver().resolve(hint).await
    }

    /// Fetch the season state and mark its period as the cache's active one.
    pub async fn current_state(&self) -> Result<NflState> {
        let state = self.client.state().await?;
        self.cache.observe_state(&state);
        Ok(state)
    }

    /// Names are enrichment: a failed catalog load leaves ids unnamed.
    pub async fn load_players_best_effort(&self) {
        if let Err(e) = self.players.ensure_loaded(&self.client).await {
            warn!(error = %e, "player directory unavailable; names omitted");
        }
    }
}

/// What every operation hands back to the dispatch layer.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    Success(serde_json::Value),
    Failure { error: ErrorPayload },
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub message: String,
    pub kind: ErrorKind,
}

impl OperationOutput {
    pub fn from_result<T: Serialize>(result: Result<T>) -> Self {
        match result.and_then(|v| serde_json::to_value(v).map_err(SleeperError::from)) {
            Ok(value) => OperationOutput::Success(value),
            Err(e) => OperationOutput::Failure {
                error: ErrorPayload {
                    message: e.to_string(),
                    kind: e.kind(),
                },
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, OperationOutput::Failure { .. })
    }
}

/// Flat trade value per position tier.
pub fn trade_value(position: Option<Position>) -> f64 {
    match position {
        Some(Position::QB) => 100.0,
        Some(Position::RB) => 80.0,
        Some(Position::WR) => 70.0,
        Some(Position::TE) => 60.0,
        _ => 50.0,
    }
}

pub const INJURED_TRADE_FACTOR: f64 = 0.7;

/// Flat weekly lineup score per position tier.
pub fn lineup_score(position: Option<Position>) -> f64 {
    match position {
        Some(Position::QB) => 18.0,
        Some(Position::RB) => 13.0,
        Some(Position::WR) => 11.0,
        Some(Position::TE) => 9.0,
        _ => 8.0,
    }
}

/// Sleeper fills empty lineup slots with `"0"`.
pub fn is_empty_slot(id: &PlayerId) -> bool {
    id.as_str() == "0"
}

/// Depth at one position compared with what the league's lineup needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionNeed {
    pub position: Position,
    pub rostered: usize,
    pub threshold: usize,
}

impl PositionNeed {
    pub fn is_short(&self) -> bool {
        self.rostered < self.threshold
    }
}

/// Starter plus one backup for every dedicated starting slot.
pub fn depth_thresholds(league: &League) -> BTreeMap<Position, usize> {
    league
        .required_starters()
        .into_iter()
        .map(|(pos, n)| (pos, n * 2))
        .collect()
}

pub fn position_counts<'a>(
    players: impl IntoIterator<Item = &'a PlayerId>,
    directory: &PlayerDirectory,
) -> BTreeMap<Position, usize> {
    let mut counts = BTreeMap::new();
    for id in players {
        if let Some(pos) = directory.get(id).and_then(|p| p.primary_position()) {
            *counts.entry(pos).or_insert(0) += 1;
        }
    }
    counts
}

pub fn position_needs(league: &League, roster: &Roster, directory: &PlayerDirectory) -> Vec<PositionNeed> {
    let counts = position_counts(&roster.players, directory);
    depth_thresholds(league)
        .into_iter()
        .map(|(position, threshold)| PositionNeed {
            position,
            rostered: counts.get(&position).copied().unwrap_or(0),
            threshold,
        })
        .collect()
}

pub fn find_roster(rosters: &[Roster], roster_id: RosterId) -> Result<&Roster> {
    rosters
        .iter()
        .find(|r| r.roster_id == roster_id)
        .ok_or_else(|| SleeperError::NoData {
            what: format!("roster {}", roster_id),
        })
}

pub fn rostered_players(rosters: &[Roster]) -> HashSet<&PlayerId> {
    rosters.iter().flat_map(|r| r.players.iter()).collect()
}

/// Owner display info for one roster.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamInfo {
    pub owner: Option<String>,
    pub team_name: Option<String>,
    pub avatar: Option<String>,
}

pub fn team_directory(rosters: &[Roster], users: &[LeagueUser]) -> HashMap<RosterId, TeamInfo> {
    let by_user: HashMap<_, _> = users.iter().map(|u| (&u.user_id, u)).collect();
    rosters
        .iter()
        .map(|r| {
            let user = r.owner_id.as_ref().and_then(|id| by_user.get(id));
            let info = user.map_or_else(TeamInfo::default, |u| TeamInfo {
                owner: u.display_name.clone(),
                team_name: Some(u.team_label()),
                avatar: u.avatar.clone(),
            });
            (r.roster_id, info)
        })
        .collect()
}
