//! Typed GET wrappers over the Sleeper REST surface.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::{
    cli::types::{LeagueId, PlayerId, Position, Season, UserId, Week},
    error::{Result, SleeperError},
    sleeper::{
        pacer::RequestPacer,
        types::{
            BracketMatch, Draft, DraftPick, League, LeagueUser, Matchup, NflState, PlayerRecord,
            Roster, StatLine, Transaction, TrendingPlayer, User, WeeklyStatLines,
        },
    },
};
use std::collections::HashMap;

#[cfg(test)]
mod tests;

/// Base path for league/user/transaction/draft/bracket resources.
pub const API_BASE_URL: &str = "https://api.sleeper.app/v1";
/// Base path for projection and stat lookups.
pub const PROJECTIONS_BASE_URL: &str = "https://api.sleeper.com";
/// Avatar CDN.
pub const CDN_BASE_URL: &str = "https://sleepercdn.com";

const SPORT: &str = "nfl";
const SEASON_TYPE: &str = "regular";

/// Upstream base URLs, overridable so tests can point at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base: String,
    pub projections_base: String,
    pub cdn_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: API_BASE_URL.to_string(),
            projections_base: PROJECTIONS_BASE_URL.to_string(),
            cdn_base: CDN_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Route every resource to one host, e.g. a `wiremock` server.
    pub fn single_host(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            api_base: base.clone(),
            projections_base: base.clone(),
            cdn_base: base,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendingKind {
    Add,
    Drop,
}

impl TrendingKind {
    fn as_str(&self) -> &'static str {
        match self {
            TrendingKind::Add => "add",
            TrendingKind::Drop => "drop",
        }
    }
}

/// Read-only Sleeper client. Every request is paced by the shared
/// [`RequestPacer`].
#[derive(Debug)]
pub struct SleeperClient {
    http: Client,
    endpoints: Endpoints,
    pacer: RequestPacer,
}

impl SleeperClient {
    pub fn new(endpoints: Endpoints, request_interval: Duration) -> Result<Self> {
        let http = Client::builder().user_agent("sleeper-ffl/0.1").build()?;
        Ok(Self {
            http,
            endpoints,
            pacer: RequestPacer::new(request_interval),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        self.pacer.wait().await;
        debug!(url, ?query, "GET");

        let res = self.http.get(url).query(query).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(SleeperError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Sleeper answers unknown users/leagues with `200 null`.
    async fn get_required<T: DeserializeOwned>(&self, url: &str, what: String) -> Result<T> {
        self.get_json::<Option<T>>(url, &[])
            .await?
            .ok_or(SleeperError::NoData { what })
    }

    fn api(&self, path: &str) -> String {
        format!("{}{}", self.endpoints.api_base, path)
    }

    fn projections(&self, path: &str) -> String {
        format!("{}{}", self.endpoints.projections_base, path)
    }

    pub async fn user(&self, handle: &str) -> Result<User> {
        self.get_required(&self.api(&format!("/user/{}", handle)), format!("user {}", handle))
            .await
    }

    pub async fn user_leagues(&self, user_id: &UserId, season: Season) -> Result<Vec<League>> {
        let url = self.api(&format!("/user/{}/leagues/{}/{}", user_id, SPORT, season));
        self.get_json(&url, &[]).await
    }

    pub async fn league(&self, league_id: &LeagueId) -> Result<League> {
        self.get_required(
            &self.api(&format!("/league/{}", league_id)),
            format!("league {}", league_id),
        )
        .await
    }

    pub async fn league_rosters(&self, league_id: &LeagueId) -> Result<Vec<Roster>> {
        self.get_json(&self.api(&format!("/league/{}/rosters", league_id)), &[])
            .await
    }

    pub async fn league_users(&self, league_id: &LeagueId) -> Result<Vec<LeagueUser>> {
        self.get_json(&self.api(&format!("/league/{}/users", league_id)), &[])
            .await
    }

    pub async fn league_matchups(&self, league_id: &LeagueId, week: Week) -> Result<Vec<Matchup>> {
        let url = self.api(&format!("/league/{}/matchups/{}", league_id, week));
        self.get_json(&url, &[]).await
    }

    pub async fn league_transactions(
        &self,
        league_id: &LeagueId,
        week: Week,
    ) -> Result<Vec<Transaction>> {
        let url = self.api(&format!("/league/{}/transactions/{}", league_id, week));
        self.get_json(&url, &[]).await
    }

    pub async fn trending_players(
        &self,
        kind: TrendingKind,
        lookback_hours: u32,
        limit: u32,
    ) -> Result<Vec<TrendingPlayer>> {
        let url = self.api(&format!("/players/{}/trending/{}", SPORT, kind.as_str()));
        let query = [
            ("lookback_hours", lookback_hours.to_string()),
            ("limit", limit.to_string()),
        ];
        self.get_json(&url, &query).await
    }

    /// Full player catalog (~5MB, keyed by player id).
    pub async fn players(&self) -> Result<HashMap<PlayerId, PlayerRecord>> {
        self.get_json(&self.api(&format!("/players/{}", SPORT)), &[])
            .await
    }

    pub async fn state(&self) -> Result<NflState> {
        self.get_json(&self.api(&format!("/state/{}", SPORT)), &[])
            .await
    }

    fn weekly_query(season: Season) -> [(&'static str, String); 3] {
        [
            ("season_type", SEASON_TYPE.to_string()),
            ("season", season.to_string()),
            ("grouping", "week".to_string()),
        ]
    }

    /// Actual per-week stats for one player.
    pub async fn player_stats(&self, player: &PlayerId, season: Season) -> Result<WeeklyStatLines> {
        let url = self.projections(&format!("/stats/{}/player/{}", SPORT, player));
        self.get_json(&url, &Self::weekly_query(season)).await
    }

    /// Projected per-week stats for one player.
    pub async fn player_projections(
        &self,
        player: &PlayerId,
        season: Season,
    ) -> Result<WeeklyStatLines> {
        let url = self.projections(&format!("/projections/{}/player/{}", SPORT, player));
        self.get_json(&url, &Self::weekly_query(season)).await
    }

    /// Projections for every player at the given positions in one response.
    pub async fn bulk_projections(
        &self,
        season: Season,
        week: Week,
        positions: &[Position],
    ) -> Result<Vec<StatLine>> {
        let url = self.projections(&format!("/projections/{}/{}/{}", SPORT, season, week));
        let mut query = vec![("season_type", SEASON_TYPE.to_string())];
        query.extend(positions.iter().map(|p| ("position[]", p.to_string())));
        self.get_json(&url, &query).await
    }

    pub async fn league_drafts(&self, league_id: &LeagueId) -> Result<Vec<Draft>> {
        self.get_json(&self.api(&format!("/league/{}/drafts", league_id)), &[])
            .await
    }

    pub async fn draft_picks(&self, draft_id: &str) -> Result<Vec<DraftPick>> {
        self.get_json(&self.api(&format!("/draft/{}/picks", draft_id)), &[])
            .await
    }

    pub async fn winners_bracket(&self, league_id: &LeagueId) -> Result<Vec<BracketMatch>> {
        let url = self.api(&format!("/league/{}/winners_bracket", league_id));
        self.get_json(&url, &[]).await
    }

    pub async fn losers_bracket(&self, league_id: &LeagueId) -> Result<Vec<BracketMatch>> {
        let url = self.api(&format!("/league/{}/losers_bracket", league_id));
        self.get_json(&url, &[]).await
    }

    /// CDN location of an avatar; nothing is fetched.
    pub fn avatar_url(&self, avatar_id: &str, thumbnail: bool) -> String {
        if thumbnail {
            format!("{}/avatars/thumbs/{}", self.endpoints.cdn_base, avatar_id)
        } else {
            format!("{}/avatars/{}", self.endpoints.cdn_base, avatar_id)
        }
    }
}
