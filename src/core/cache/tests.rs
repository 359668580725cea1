//! Period cache behavior against a mocked Sleeper API

use super::*;
use crate::sleeper::http::Endpoints;
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer) -> SleeperClient {
    SleeperClient::new(Endpoints::single_host(&server.uri()), Duration::ZERO).unwrap()
}

fn state(season: u16, week: u16) -> NflState {
    NflState {
        week: Week::new(week),
        season: Season::new(season),
        season_type: Some("regular".to_string()),
        display_week: None,
        leg: None,
    }
}

async fn mount_matchups(server: &MockServer, league: &str, week: u16, expected: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/league/{}/matchups/{}", league, week)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "roster_id": 1, "matchup_id": 1, "points": 88.2 },
            { "roster_id": 2, "matchup_id": 1, "points": 91.0 }
        ])))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_rosters(server: &MockServer, league: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/league/{}/rosters", league)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "roster_id": 1, "owner_id": "u1", "players": ["p1"] }
        ])))
        .expect(expected)
        .mount(server)
        .await;
}

#[cfg(test)]
mod period_cache_tests {
    use super::*;

    #[tokio::test]
    async fn test_active_period_hit_returns_same_snapshot() {
        let server = MockServer::start().await;
        mount_matchups(&server, "L1", 6, 1).await;
        let client = client_for(&server);

        let cache = PeriodCache::new(Duration::from_secs(300));
        cache.observe_state(&state(2024, 6));

        let league = LeagueId::new("L1");
        let first = cache.matchups(&client, &league, Week::new(6)).await.unwrap();
        let second = cache.matchups(&client, &league, Week::new(6)).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().matchups, 1);
    }

    #[tokio::test]
    async fn test_non_active_period_bypasses_cache() {
        let server = MockServer::start().await;
        mount_matchups(&server, "L1", 3, 2).await;
        let client = client_for(&server);

        let cache = PeriodCache::new(Duration::from_secs(300));
        cache.observe_state(&state(2024, 6));

        let league = LeagueId::new("L1");
        let first = cache.matchups(&client, &league, Week::new(3)).await.unwrap();
        let second = cache.matchups(&client, &league, Week::new(3)).await.unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[tokio::test]
    async fn test_unknown_active_period_bypasses_cache() {
        let server = MockServer::start().await;
        mount_rosters(&server, "L1", 2).await;
        let client = client_for(&server);

        let cache = PeriodCache::new(Duration::from_secs(300));
        let league = LeagueId::new("L1");
        cache.rosters(&client, &league).await.unwrap();
        cache.rosters(&client, &league).await.unwrap();

        assert_eq!(cache.stats().leagues, 0);
    }

    #[tokio::test]
    async fn test_expiry_clears_every_league() {
        let server = MockServer::start().await;
        mount_rosters(&server, "L1", 2).await;
        mount_rosters(&server, "L2", 1).await;
        let client = client_for(&server);

        let cache = PeriodCache::new(Duration::from_millis(100));
        cache.observe_state(&state(2024, 6));

        let l1 = LeagueId::new("L1");
        let l2 = LeagueId::new("L2");
        cache.rosters(&client, &l1).await.unwrap();
        cache.rosters(&client, &l2).await.unwrap();
        assert_eq!(cache.stats().leagues, 2);

        tokio::time::sleep(Duration::from_millis(150)).await;

        // Touching only L1 drops L2 as well.
        cache.rosters(&client, &l1).await.unwrap();
        let stats = cache.stats();
        assert_eq!(stats.leagues, 1);
        assert_eq!(stats.rosters, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/league/L1/matchups/6"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_matchups(&server, "L1", 6, 1).await;
        let client = client_for(&server);

        let cache = PeriodCache::new(Duration::from_secs(300));
        cache.observe_state(&state(2024, 6));
        let league = LeagueId::new("L1");

        assert!(cache.matchups(&client, &league, Week::new(6)).await.is_err());
        assert_eq!(cache.stats(), CacheStats::default());

        let rows = cache.matchups(&client, &league, Week::new(6)).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_period_rollover_refetches_matchups() {
        let server = MockServer::start().await;
        mount_matchups(&server, "L1", 6, 1).await;
        mount_matchups(&server, "L1", 7, 1).await;
        let client = client_for(&server);

        let cache = PeriodCache::new(Duration::from_secs(300));
        let league = LeagueId::new("L1");

        cache.observe_state(&state(2024, 6));
        cache.matchups(&client, &league, Week::new(6)).await.unwrap();

        cache.observe_state(&state(2024, 7));
        let week7 = cache.matchups(&client, &league, Week::new(7)).await.unwrap();
        let again = cache.matchups(&client, &league, Week::new(7)).await.unwrap();
        assert!(Arc::ptr_eq(&week7, &again));
    }

    #[tokio::test]
    async fn test_bulk_projections_keyed_by_period() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projections/nfl/2024/6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "player_id": "p1", "stats": { "pts_ppr": 12.3 } }
            ])))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);

        let cache = PeriodCache::new(Duration::from_secs(300));
        cache.observe_state(&state(2024, 6));
        let league = LeagueId::new("L1");

        let a = cache
            .bulk_projections(&client, &league, Season::new(2024), Week::new(6))
            .await
            .unwrap();
        let b = cache
            .bulk_projections(&client, &league, Season::new(2024), Week::new(6))
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.stats().bulk_projections, 1);
    }

    #[tokio::test]
    async fn test_player_projections_are_memoized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projections/nfl/player/p9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "6": { "stats": { "pts_half_ppr": 8.0 }, "week": 6 }
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);

        let cache = PeriodCache::new(Duration::from_secs(300));
        cache.observe_state(&state(2024, 6));
        let league = LeagueId::new("L1");
        let player = PlayerId::new("p9");

        cache
            .player_projections(&client, &league, &player, Season::new(2024))
            .await
            .unwrap();
        let rows = cache
            .player_projections(&client, &league, &player, Season::new(2024))
            .await
            .unwrap();
        assert!(rows["6"].is_some());
        assert_eq!(cache.stats().player_projections, 1);
    }

    #[test]
    fn test_clear_and_active_period() {
        let cache = PeriodCache::new(Duration::from_secs(1));
        assert_eq!(cache.active_period(), None);
        cache.observe_state(&state(2024, 2));
        assert_eq!(cache.active_period(), Some((Season::new(2024), Week::new(2))));
        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
        assert_eq!(cache.ttl(), Duration::from_secs(1));
    }
}
