//! Short-lived read-through cache for the active scoring period.
//!
//! Matchups, rosters and projections change during a game week, so they are
//! only cached for a few minutes and only for the period the upstream state
//! endpoint last reported as current. Requests for any other period go
//! straight to the API.
//!
//! Invalidation is deliberately coarse: before every access the cache checks
//! each league snapshot's fetch time, and if any one of them is older than
//! the TTL, every league's snapshot is dropped together.

use lru::LruCache;
use serde::Serialize;
use std::{
    collections::HashMap,
    future::Future,
    num::NonZeroUsize,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::{
    cli::types::{LeagueId, PlayerId, Position, Season, Week},
    error::Result,
    sleeper::{
        http::SleeperClient,
        types::{Matchup, NflState, Roster, StatLine, WeeklyStatLines},
    },
};

#[cfg(test)]
mod tests;

const PLAYER_PROJECTION_CAPACITY: usize = 256;

/// Everything cached for one league, stamped with its last fetch time.
struct LeagueSnapshot {
    fetched_at: Instant,
    matchups: Option<(Week, Arc<Vec<Matchup>>)>,
    rosters: Option<Arc<Vec<Roster>>>,
    bulk_projections: HashMap<(Season, Week), Arc<Vec<StatLine>>>,
    player_projections: LruCache<(PlayerId, Season), Arc<WeeklyStatLines>>,
}

impl LeagueSnapshot {
    fn new() -> Self {
        let cap = NonZeroUsize::new(PLAYER_PROJECTION_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            fetched_at: Instant::now(),
            matchups: None,
            rosters: None,
            bulk_projections: HashMap::new(),
            player_projections: LruCache::new(cap),
        }
    }
}

#[derive(Default)]
struct CacheState {
    active: Option<(Season, Week)>,
    leagues: HashMap<LeagueId, LeagueSnapshot>,
}

/// Entry counts, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub leagues: usize,
    pub matchups: usize,
    pub rosters: usize,
    pub bulk_projections: usize,
    pub player_projections: usize,
}

pub struct PeriodCache {
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl PeriodCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the period the upstream state endpoint reports as current.
    pub fn observe_state(&self, state: &NflState) {
        let mut guard = self.lock();
        let next = (state.season, state.week);
        if guard.active != Some(next) {
            debug!(season = %state.season, week = %state.week, "active period changed");
        }
        guard.active = Some(next);
    }

    pub fn active_period(&self) -> Option<(Season, Week)> {
        self.lock().active
    }

    pub fn clear(&self) {
        self.lock().leagues.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let guard = self.lock();
        let mut stats = CacheStats {
            leagues: guard.leagues.len(),
            ..CacheStats::default()
        };
        for snap in guard.leagues.values() {
            stats.matchups += usize::from(snap.matchups.is_some());
            stats.rosters += usize::from(snap.rosters.is_some());
            stats.bulk_projections += snap.bulk_projections.len();
            stats.player_projections += snap.player_projections.len();
        }
        stats
    }

    fn sweep(&self, state: &mut CacheState) {
        let stale = state
            .leagues
            .values()
            .any(|snap| snap.fetched_at.elapsed() >= self.ttl);
        if stale {
            info!(leagues = state.leagues.len(), "period cache expired; clearing all leagues");
            state.leagues.clear();
        }
    }

    /// Serve from the league snapshot when `cacheable`, otherwise (or on a
    /// miss) fetch live. Only successful fetches are stored.
    async fn get_or_fetch<T, R, W, F, Fut>(
        &self,
        league: &LeagueId,
        cacheable: bool,
        read: R,
        write: W,
        fetch: F,
    ) -> Result<Arc<T>>
    where
        R: FnOnce(&mut LeagueSnapshot) -> Option<Arc<T>>,
        W: FnOnce(&mut LeagueSnapshot, Arc<T>),
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !cacheable {
            return Ok(Arc::new(fetch().await?));
        }

        {
            let mut state = self.lock();
            self.sweep(&mut state);
            if let Some(hit) = state.leagues.get_mut(league).and_then(read) {
                debug!(%league, "period cache hit");
                return Ok(hit);
            }
        }

        let fresh = Arc::new(fetch().await?);

        let mut state = self.lock();
        self.sweep(&mut state);
        let snap = state
            .leagues
            .entry(league.clone())
            .or_insert_with(LeagueSnapshot::new);
        snap.fetched_at = Instant::now();
        write(snap, Arc::clone(&fresh));
        Ok(fresh)
    }

    pub async fn matchups(
        &self,
        client: &SleeperClient,
        league: &LeagueId,
        week: Week,
    ) -> Result<Arc<Vec<Matchup>>> {
        let cacheable = self.active_period().is_some_and(|(_, w)| w == week);
        self.get_or_fetch(
            league,
            cacheable,
            |snap| match &snap.matchups {
                Some((w, rows)) if *w == week => Some(Arc::clone(rows)),
                _ => None,
            },
            |snap, rows| snap.matchups = Some((week, rows)),
            || client.league_matchups(league, week),
        )
        .await
    }

    /// Rosters are not period keyed; they are cached once an active period
    /// is known.
    pub async fn rosters(&self, client: &SleeperClient, league: &LeagueId) -> Result<Arc<Vec<Roster>>> {
        let cacheable = self.active_period().is_some();
        self.get_or_fetch(
            league,
            cacheable,
            |snap| snap.rosters.clone(),
            |snap, rows| snap.rosters = Some(rows),
            || client.league_rosters(league),
        )
        .await
    }

    pub async fn bulk_projections(
        &self,
        client: &SleeperClient,
        league: &LeagueId,
        season: Season,
        week: Week,
    ) -> Result<Arc<Vec<StatLine>>> {
        let cacheable = self.active_period() == Some((season, week));
        self.get_or_fetch(
            league,
            cacheable,
            |snap| snap.bulk_projections.get(&(season, week)).cloned(),
            |snap, rows| {
                snap.bulk_projections.insert((season, week), rows);
            },
            || client.bulk_projections(season, week, &Position::PLAYER_POSITIONS),
        )
        .await
    }

    pub async fn player_projections(
        &self,
        client: &SleeperClient,
        league: &LeagueId,
        player: &PlayerId,
        season: Season,
    ) -> Result<Arc<WeeklyStatLines>> {
        let cacheable = self.active_period().is_some_and(|(s, _)| s == season);
        let key = (player.clone(), season);
        let write_key = key.clone();
        self.get_or_fetch(
            league,
            cacheable,
            |snap| snap.player_projections.get(&key).cloned(),
            |snap, rows| {
                snap.player_projections.put(write_key, rows);
            },
            || client.player_projections(player, season),
        )
        .await
    }
}
