//! Resolve a loose natural-language hint ("my dynasty league", "bob") to a
//! configured account, one of its league bindings, and the account's roster
//! in that league.
//!
//! Matching order, first hit wins:
//! 1. no hint, one account with one league: that league
//! 2. hint matches an account handle: its only league, or the league whose
//!    display name matches the hint
//! 3. no handle matched: hint equals a league id or matches a league display
//!    name, across every account
//! 4. the first configured account's first league
//!
//! All substring matches are case-insensitive and work in either direction.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    cli::types::{RosterId, UserId},
    config::{Account, AppConfig, LeagueBinding},
    core::cache::PeriodCache,
    error::{Result, SleeperError},
    sleeper::http::SleeperClient,
};

#[cfg(test)]
mod tests;

/// A resolved account/league pair. `roster_id` is `None` when the roster
/// could not be determined; callers report that as a not-found result.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub account: Arc<Account>,
    pub binding: Arc<LeagueBinding>,
    pub roster_id: Option<RosterId>,
}

impl Resolution {
    pub fn require_roster(&self) -> Result<RosterId> {
        self.roster_id.ok_or_else(|| SleeperError::RosterNotFound {
            league_id: self.binding.league_id.to_string(),
            username: self.account.username.clone(),
        })
    }
}

pub struct IdentityResolver<'a> {
    config: &'a AppConfig,
    client: &'a SleeperClient,
    cache: &'a PeriodCache,
}

fn loosely_matches(hint_lower: &str, candidate: &str) -> bool {
    let candidate = candidate.trim().to_lowercase();
    !candidate.is_empty() && (hint_lower.contains(&candidate) || candidate.contains(hint_lower))
}

type Pair = (Arc<Account>, Arc<LeagueBinding>);

impl<'a> IdentityResolver<'a> {
    pub fn new(config: &'a AppConfig, client: &'a SleeperClient, cache: &'a PeriodCache) -> Self {
        Self {
            config,
            client,
            cache,
        }
    }

    pub async fn resolve(&self, hint: Option<&str>) -> Result<Resolution> {
        self.config.ensure_configured()?;
        let hint = hint.map(str::trim).filter(|h| !h.is_empty());

        let (account, binding) = self.select(hint).await?;
        debug!(
            account = %account.username,
            league = %binding.league_id,
            ?hint,
            "resolved league"
        );
        let roster_id = self.ensure_roster_id(&account, &binding).await;

        Ok(Resolution {
            account,
            binding,
            roster_id,
        })
    }

    async fn select(&self, hint: Option<&str>) -> Result<Pair> {
        let accounts = &self.config.accounts;

        let Some(hint) = hint else {
            if let [only] = accounts.as_slice() {
                if let [binding] = only.leagues.as_slice() {
                    return Ok((Arc::clone(only), Arc::clone(binding)));
                }
            }
            return self.fallback();
        };
        let hint_lower = hint.to_lowercase();

        let mut handle_matched = false;
        for account in accounts {
            if !loosely_matches(&hint_lower, &account.username) {
                continue;
            }
            handle_matched = true;
            if let [binding] = account.leagues.as_slice() {
                return Ok((Arc::clone(account), Arc::clone(binding)));
            }
            for binding in &account.leagues {
                if self.name_matches(binding, &hint_lower).await {
                    return Ok((Arc::clone(account), Arc::clone(binding)));
                }
            }
        }
        if handle_matched {
            return self.fallback();
        }

        if let Some(pair) = self.config.find_binding(&hint.into()) {
            return Ok(pair);
        }
        for account in accounts {
            for binding in &account.leagues {
                if self.name_matches(binding, &hint_lower).await {
                    return Ok((Arc::clone(account), Arc::clone(binding)));
                }
            }
        }

        self.fallback()
    }

    fn fallback(&self) -> Result<Pair> {
        self.config
            .accounts
            .iter()
            .find_map(|a| a.leagues.first().map(|b| (Arc::clone(a), Arc::clone(b))))
            .ok_or_else(SleeperError::no_accounts)
    }

    async fn name_matches(&self, binding: &LeagueBinding, hint_lower: &str) -> bool {
        self.league_name(binding)
            .await
            .is_some_and(|name| loosely_matches(hint_lower, &name))
    }

    /// Cached display name, fetched on first use. Lookup failures only mean
    /// the league cannot be matched by name.
    pub async fn league_name(&self, binding: &LeagueBinding) -> Option<String> {
        if let Some(name) = binding.league_name.get() {
            return Some(name);
        }
        match self.client.league(&binding.league_id).await {
            Ok(league) => {
                let name = league.name.filter(|n| !n.trim().is_empty());
                binding.league_name.fill(name.clone());
                name
            }
            Err(e) => {
                warn!(league = %binding.league_id, error = %e, "league name lookup failed");
                None
            }
        }
    }

    /// Resolve (once) the account's roster in the bound league. Failures are
    /// logged and leave the binding unresolved.
    pub async fn ensure_roster_id(&self, account: &Account, binding: &LeagueBinding) -> Option<RosterId> {
        if let Some(roster_id) = binding.roster_id.get() {
            return Some(roster_id);
        }
        match self.lookup_roster(account, binding).await {
            Ok(found) => {
                if found.is_none() {
                    warn!(
                        account = %account.username,
                        league = %binding.league_id,
                        "no roster owned by account"
                    );
                }
                binding.roster_id.fill(found);
                found
            }
            Err(e) => {
                warn!(
                    account = %account.username,
                    league = %binding.league_id,
                    error = %e,
                    "roster resolution failed"
                );
                None
            }
        }
    }

    async fn user_id(&self, account: &Account) -> Result<UserId> {
        if let Some(id) = account.user_id.get() {
            return Ok(id);
        }
        let user = self.client.user(&account.username).await?;
        account.user_id.fill(Some(user.user_id.clone()));
        Ok(user.user_id)
    }

    async fn lookup_roster(&self, account: &Account, binding: &LeagueBinding) -> Result<Option<RosterId>> {
        let user_id = self.user_id(account).await?;
        let rosters = self.cache.rosters(self.client, &binding.league_id).await?;
        if let Some(r) = rosters.iter().find(|r| r.is_owned_by(&user_id)) {
            return Ok(Some(r.roster_id));
        }

        // The handle lookup and the league's membership records can disagree;
        // match the member list by display name before giving up.
        let members = self.client.league_users(&binding.league_id).await?;
        let member = members
            .iter()
            .find(|m| {
                m.display_name
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(&account.username))
            })
            .or_else(|| members.iter().find(|m| m.user_id == user_id));

        Ok(member.and_then(|m| {
            debug!(from = %user_id, to = %m.user_id, "using league member id");
            rosters
                .iter()
                .find(|r| r.is_owned_by(&m.user_id))
                .map(|r| r.roster_id)
        }))
    }
}
