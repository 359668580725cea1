//! Identity resolution tests against a mocked Sleeper API

use super::*;
use crate::{
    cli::types::LeagueId,
    sleeper::http::Endpoints,
};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

struct Harness {
    config: AppConfig,
    client: SleeperClient,
    cache: PeriodCache,
}

impl Harness {
    fn new(server: &MockServer, accounts: Vec<Account>) -> Self {
        Self {
            config: AppConfig::new(accounts),
            client: SleeperClient::new(Endpoints::single_host(&server.uri()), Duration::ZERO)
                .unwrap(),
            cache: PeriodCache::new(Duration::from_secs(300)),
        }
    }

    fn resolver(&self) -> IdentityResolver<'_> {
        IdentityResolver::new(&self.config, &self.client, &self.cache)
    }
}

fn bindings(ids: &[&str]) -> Vec<LeagueBinding> {
    ids.iter().map(|id| LeagueBinding::new(LeagueId::new(*id))).collect()
}

async fn mount_user(server: &MockServer, handle: &str, user_id: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/user/{}", handle)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": user_id, "username": handle, "display_name": handle
        })))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_league(server: &MockServer, league: &str, name: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/league/{}", league)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "league_id": league, "name": name, "season": "2024"
        })))
        .mount(server)
        .await;
}

async fn mount_rosters(server: &MockServer, league: &str, owners: &[(u32, &str)], expected: u64) {
    let rows: Vec<_> = owners
        .iter()
        .map(|(rid, owner)| json!({ "roster_id": rid, "owner_id": owner, "players": [] }))
        .collect();
    Mock::given(method("GET"))
        .and(path(format!("/league/{}/rosters", league)))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .expect(expected)
        .mount(server)
        .await;
}

#[cfg(test)]
mod identity_tests {
    use super::*;

    #[tokio::test]
    async fn test_single_account_single_league_without_hint() {
        let server = MockServer::start().await;
        mount_user(&server, "alice", "u-alice", 1).await;
        mount_rosters(&server, "L1", &[(1, "u-bob"), (2, "u-alice")], 1).await;

        let h = Harness::new(&server, vec![Account::new("A", "alice", bindings(&["L1"]))]);

        let first = h.resolver().resolve(None).await.unwrap();
        assert_eq!(first.binding.league_id, LeagueId::new("L1"));
        assert_eq!(first.roster_id, Some(RosterId::new(2)));

        // Second resolution reuses the resolved roster id.
        let second = h.resolver().resolve(None).await.unwrap();
        assert_eq!(second.roster_id, Some(RosterId::new(2)));
        assert_eq!(h.config.accounts[0].user_id.get(), Some(UserId::new("u-alice")));
    }

    #[tokio::test]
    async fn test_hint_matches_league_name_under_owning_account() {
        let server = MockServer::start().await;
        mount_league(&server, "L1", "Work Redraft").await;
        mount_league(&server, "L2", "Family Keeper").await;
        mount_league(&server, "L3", "Dynasty Degens").await;
        mount_user(&server, "bob", "u-bob", 1).await;
        mount_rosters(&server, "L3", &[(5, "u-bob")], 1).await;

        let h = Harness::new(
            &server,
            vec![
                Account::new("A", "alice", bindings(&["L1", "L2"])),
                Account::new("B", "bob", bindings(&["L3"])),
            ],
        );

        let res = h.resolver().resolve(Some("DYNASTY")).await.unwrap();
        assert_eq!(res.account.username, "bob");
        assert_eq!(res.binding.league_id, LeagueId::new("L3"));
        assert_eq!(res.roster_id, Some(RosterId::new(5)));
        assert_eq!(res.binding.league_name.get().as_deref(), Some("Dynasty Degens"));
    }

    #[tokio::test]
    async fn test_handle_match_picks_league_by_name() {
        let server = MockServer::start().await;
        mount_league(&server, "L1", "Work Redraft").await;
        mount_league(&server, "L2", "Alice Keeper League").await;

        let h = Harness::new(
            &server,
            vec![Account::new("A", "alice", bindings(&["L1", "L2"])).with_user_id(UserId::new("u-a"))],
        );
        h.config.accounts[0].leagues[1]
            .roster_id
            .fill(Some(RosterId::new(9)));

        let res = h.resolver().resolve(Some("alice keeper")).await.unwrap();
        assert_eq!(res.binding.league_id, LeagueId::new("L2"));
        assert_eq!(res.roster_id, Some(RosterId::new(9)));
    }

    #[tokio::test]
    async fn test_handle_match_without_league_name_uses_first_configured_league() {
        let server = MockServer::start().await;
        mount_league(&server, "L1", "Alpha").await;
        mount_league(&server, "L4", "Bobcats Keeper").await;
        mount_league(&server, "L2", "Beta").await;
        mount_league(&server, "L3", "Gamma").await;

        let h = Harness::new(
            &server,
            vec![
                Account::new("A", "alice", bindings(&["L1", "L4"])).with_user_id(UserId::new("u-a")),
                Account::new("B", "bob", bindings(&["L2", "L3"])),
            ],
        );
        h.config.accounts[0].leagues[0]
            .roster_id
            .fill(Some(RosterId::new(1)));

        // "bob" names an account, so the league-name scan across accounts is skipped.
        let res = h.resolver().resolve(Some("bob")).await.unwrap();
        assert_eq!(res.account.username, "alice");
        assert_eq!(res.binding.league_id, LeagueId::new("L1"));
        assert_eq!(res.roster_id, Some(RosterId::new(1)));
    }

    #[tokio::test]
    async fn test_exact_league_id_hint() {
        let server = MockServer::start().await;
        mount_league(&server, "100", "Alpha").await;

        let mut second = LeagueBinding::new(LeagueId::new("200"));
        second = second.with_roster_id(RosterId::new(3));
        let h = Harness::new(
            &server,
            vec![Account::new(
                "A",
                "alice",
                vec![LeagueBinding::new(LeagueId::new("100")), second],
            )],
        );

        let res = h.resolver().resolve(Some("200")).await.unwrap();
        assert_eq!(res.binding.league_id, LeagueId::new("200"));
        assert_eq!(res.roster_id, Some(RosterId::new(3)));
    }

    #[tokio::test]
    async fn test_unmatched_hint_falls_back_to_first_binding() {
        let server = MockServer::start().await;
        mount_league(&server, "L1", "Alpha").await;
        mount_league(&server, "L2", "Beta").await;

        let h = Harness::new(
            &server,
            vec![Account::new("A", "alice", bindings(&["L1", "L2"]))
                .with_user_id(UserId::new("u-a"))],
        );
        h.config.accounts[0].leagues[0]
            .roster_id
            .fill(Some(RosterId::new(1)));

        let res = h.resolver().resolve(Some("zzz")).await.unwrap();
        assert_eq!(res.binding.league_id, LeagueId::new("L1"));
    }

    #[tokio::test]
    async fn test_league_name_failure_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/league/L1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        mount_league(&server, "L2", "Beta Ball").await;

        let h = Harness::new(
            &server,
            vec![Account::new("A", "alice", bindings(&["L1", "L2"]))
                .with_user_id(UserId::new("u-a"))],
        );
        h.config.accounts[0].leagues[1]
            .roster_id
            .fill(Some(RosterId::new(4)));

        let res = h.resolver().resolve(Some("beta")).await.unwrap();
        assert_eq!(res.binding.league_id, LeagueId::new("L2"));
        assert!(h.config.accounts[0].leagues[0].league_name.get().is_none());
    }

    #[tokio::test]
    async fn test_member_list_fallback_when_owner_id_mismatches() {
        let server = MockServer::start().await;
        mount_user(&server, "alice", "u-stale", 1).await;
        mount_rosters(&server, "L1", &[(1, "u-bob"), (7, "u-real")], 1).await;
        Mock::given(method("GET"))
            .and(path("/league/L1/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "user_id": "u-bob", "display_name": "bob" },
                { "user_id": "u-real", "display_name": "Alice" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let h = Harness::new(&server, vec![Account::new("A", "alice", bindings(&["L1"]))]);
        let res = h.resolver().resolve(None).await.unwrap();
        assert_eq!(res.roster_id, Some(RosterId::new(7)));
    }

    #[tokio::test]
    async fn test_roster_failure_is_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/alice"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let h = Harness::new(&server, vec![Account::new("A", "alice", bindings(&["L1"]))]);
        let res = h.resolver().resolve(None).await.unwrap();
        assert_eq!(res.roster_id, None);
        match res.require_roster() {
            Err(SleeperError::RosterNotFound { league_id, username }) => {
                assert_eq!(league_id, "L1");
                assert_eq!(username, "alice");
            }
            other => panic!("Expected RosterNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_configuration() {
        let server = MockServer::start().await;
        let h = Harness::new(&server, Vec::new());
        let err = h.resolver().resolve(Some("anything")).await.unwrap_err();
        assert!(matches!(err, SleeperError::NotConfigured { .. }));
    }

    #[test]
    fn test_loosely_matches_both_directions() {
        assert!(loosely_matches("my dynasty league", "Dynasty"));
        assert!(loosely_matches("dyn", "Dynasty Degens"));
        assert!(!loosely_matches("keeper", "Dynasty"));
        assert!(!loosely_matches("anything", "  "));
    }
}
