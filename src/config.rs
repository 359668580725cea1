//! Account/league configuration.
//!
//! Built once at startup and shared as `Arc<AppConfig>`. The only mutation
//! after construction is filling in lazily resolved identifiers through
//! [`Resolved`] slots.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
    time::Duration,
};
use tracing::warn;

use crate::{
    cli::types::{LeagueId, RosterId, UserId},
    error::{Result, SleeperError},
    sleeper::{http::Endpoints, pacer::DEFAULT_REQUEST_INTERVAL},
};


pub const USERNAME_VAR: &str = "SLEEPER_USERNAME";
pub const LEAGUE_ID_VAR: &str = "SLEEPER_LEAGUE_ID";
pub const ROSTER_ID_VAR: &str = "SLEEPER_ROSTER_ID";
pub const USER_ID_VAR: &str = "SLEEPER_USER_ID";
pub const REQUEST_INTERVAL_VAR: &str = "SLEEPER_REQUEST_INTERVAL_MS";
pub const CACHE_TTL_VAR: &str = "SLEEPER_CACHE_TTL_SECS";

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
const LEGACY_TAG: &str = "default";

/// A lazily filled value.
///
/// Filling is idempotent and never clears: `fill(None)` is a no-op, so a
/// failed re-resolution cannot erase an earlier success. Concurrent fills
/// race benignly (last writer wins, values are equivalent); the lock only
/// guards memory, it is never held across an upstream call.
#[derive(Debug)]
pub struct Resolved<T>(RwLock<Option<T>>);

impl<T> Default for Resolved<T> {
    fn default() -> Self {
        Self(RwLock::new(None))
    }
}

impl<T: Clone> Resolved<T> {
    pub fn new(initial: Option<T>) -> Self {
        Self(RwLock::new(initial))
    }

    pub fn get(&self) -> Option<T> {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_set(&self) -> bool {
        self.0.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    pub fn fill(&self, value: Option<T>) {
        if let Some(v) = value {
            *self.0.write().unwrap_or_else(|e| e.into_inner()) = Some(v);
        }
    }
}

/// One configured league for an account.
#[derive(Debug)]
pub struct LeagueBinding {
    pub league_id: LeagueId,
    pub league_name: Resolved<String>,
    pub roster_id: Resolved<RosterId>,
}

impl LeagueBinding {
    pub fn new(league_id: LeagueId) -> Self {
        Self {
            league_id,
            league_name: Resolved::default(),
            roster_id: Resolved::default(),
        }
    }

    pub fn with_roster_id(self, roster_id: RosterId) -> Self {
        self.roster_id.fill(Some(roster_id));
        self
    }
}

#[derive(Debug)]
pub struct Account {
    pub tag: String,
    pub username: String,
    pub user_id: Resolved<UserId>,
    pub leagues: Vec<Arc<LeagueBinding>>,
}

impl Account {
    pub fn new(tag: impl Into<String>, username: impl Into<String>, leagues: Vec<LeagueBinding>) -> Self {
        Self {
            tag: tag.into(),
            username: username.into(),
            user_id: Resolved::default(),
            leagues: leagues.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn with_user_id(self, user_id: UserId) -> Self {
        self.user_id.fill(Some(user_id));
        self
    }
}

#[derive(Debug)]
pub struct AppConfig {
    pub accounts: Vec<Arc<Account>>,
    pub endpoints: Endpoints,
    pub request_interval: Duration,
    pub cache_ttl: Duration,
    /// First variable found holding a placeholder, reported when no usable
    /// account remains.
    pub placeholder_var: Option<String>,
}

impl AppConfig {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: accounts.into_iter().map(Arc::new).collect(),
            endpoints: Endpoints::default(),
            request_interval: DEFAULT_REQUEST_INTERVAL,
            cache_ttl: DEFAULT_CACHE_TTL,
            placeholder_var: None,
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_request_interval(mut self, interval: Duration) -> Self {
        self.request_interval = interval;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Parse configuration from `KEY=value` pairs.
    ///
    /// Tagged accounts: `SLEEPER_USERNAME_<TAG>` with comma separated
    /// `SLEEPER_LEAGUE_ID_<TAG>`. The legacy single-account variables are
    /// appended as tag `default` unless that handle is already configured.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .filter(|(k, _)| k.starts_with("SLEEPER_"))
            .collect();

        let mut config = Self::new(Vec::new());
        let mut accounts = Vec::new();

        let user_prefix = format!("{}_", USERNAME_VAR);
        for (key, username) in &vars {
            let Some(tag) = key.strip_prefix(&user_prefix) else {
                continue;
            };
            let league_var = format!("{}_{}", LEAGUE_ID_VAR, tag);
            let Some(leagues) = vars.get(&league_var) else {
                warn!(tag, "{} is set but {} is missing; skipping account", key, league_var);
                continue;
            };
            match parse_account(tag, key, username, &league_var, leagues) {
                Ok(account) => accounts.push(account),
                Err(var) => {
                    config.placeholder_var.get_or_insert(var);
                }
            }
        }

        if let (Some(username), Some(leagues)) = (vars.get(USERNAME_VAR), vars.get(LEAGUE_ID_VAR)) {
            let already = accounts
                .iter()
                .any(|a: &Account| a.username.eq_ignore_ascii_case(username.trim()));
            if !already {
                match parse_account(LEGACY_TAG, USERNAME_VAR, username, LEAGUE_ID_VAR, leagues) {
                    Ok(mut account) => {
                        if let Some(uid) = vars.get(USER_ID_VAR).filter(|v| !is_placeholder(v)) {
                            account = account.with_user_id(UserId::new(uid.trim()));
                        }
                        if let Some(rid) = vars.get(ROSTER_ID_VAR).and_then(|v| v.parse().ok()) {
                            if let Some(first) = account.leagues.first() {
                                first.roster_id.fill(Some(rid));
                            }
                        }
                        accounts.push(account);
                    }
                    Err(var) => {
                        config.placeholder_var.get_or_insert(var);
                    }
                }
            }
        }

        if let Some(ms) = vars.get(REQUEST_INTERVAL_VAR).and_then(|v| v.trim().parse().ok()) {
            config.request_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = vars.get(CACHE_TTL_VAR).and_then(|v| v.trim().parse().ok()) {
            config.cache_ttl = Duration::from_secs(secs);
        }

        config.accounts = accounts.into_iter().map(Arc::new).collect();
        config
    }

    /// Fails with a remediation message when no usable account exists.
    pub fn ensure_configured(&self) -> Result<()> {
        if !self.accounts.is_empty() {
            return Ok(());
        }
        match &self.placeholder_var {
            Some(var) => Err(SleeperError::PlaceholderConfig { var: var.clone() }),
            None => Err(SleeperError::no_accounts()),
        }
    }

    pub fn find_binding(&self, league_id: &LeagueId) -> Option<(Arc<Account>, Arc<LeagueBinding>)> {
        self.accounts.iter().find_map(|account| {
            account
                .leagues
                .iter()
                .find(|b| &b.league_id == league_id)
                .map(|b| (Arc::clone(account), Arc::clone(b)))
        })
    }
}

/// Returns the offending variable name when a value is a placeholder.
fn parse_account(
    tag: &str,
    user_var: &str,
    username: &str,
    league_var: &str,
    leagues: &str,
) -> std::result::Result<Account, String> {
    if is_placeholder(username) {
        return Err(user_var.to_string());
    }
    let ids: Vec<&str> = leagues
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if ids.is_empty() || ids.iter().any(|id| is_placeholder(id)) {
        return Err(league_var.to_string());
    }

    let bindings = ids
        .into_iter()
        .map(|id| LeagueBinding::new(LeagueId::new(id)))
        .collect();
    Ok(Account::new(tag, username.trim(), bindings))
}

pub fn is_placeholder(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v.is_empty()
        || v.starts_with("your_")
        || v.starts_with("your-")
        || v.starts_with('<')
        || v == "changeme"
        || v == "xxx"
}
