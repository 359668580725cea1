//! HTTP client tests against a mocked Sleeper API

use super::*;
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

async fn client_for(server: &MockServer) -> SleeperClient {
    SleeperClient::new(Endpoints::single_host(&server.uri()), Duration::ZERO).unwrap()
}

#[cfg(test)]
mod http_tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.api_base, "https://api.sleeper.app/v1");
        assert_eq!(endpoints.projections_base, "https://api.sleeper.com");
        assert_eq!(endpoints.cdn_base, "https://sleepercdn.com");
    }

    #[test]
    fn test_single_host_strips_trailing_slash() {
        let endpoints = Endpoints::single_host("http://127.0.0.1:9999/");
        assert_eq!(endpoints.api_base, "http://127.0.0.1:9999");
        assert_eq!(endpoints.cdn_base, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_avatar_url() {
        let client = SleeperClient::new(Endpoints::default(), Duration::ZERO).unwrap();
        assert_eq!(
            client.avatar_url("abc123", false),
            "https://sleepercdn.com/avatars/abc123"
        );
        assert_eq!(
            client.avatar_url("abc123", true),
            "https://sleepercdn.com/avatars/thumbs/abc123"
        );
    }

    #[tokio::test]
    async fn test_user_by_handle() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user_id": "111", "username": "alice", "display_name": "Alice", "avatar": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let user = client_for(&server).await.user("alice").await.unwrap();
        assert_eq!(user.user_id, UserId::new("111"));
        assert_eq!(user.display_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_unknown_user_is_no_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/ghost"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.user("ghost").await.unwrap_err();
        match err {
            SleeperError::NoData { what } => assert_eq!(what, "user ghost"),
            other => panic!("Expected NoData, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/state/nfl"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = client_for(&server).await.state().await.unwrap_err();
        match err {
            SleeperError::Status { status, url } => {
                assert_eq!(status, 429);
                assert!(url.ends_with("/state/nfl"));
            }
            other => panic!("Expected Status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/league/1/rosters"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .league_rosters(&LeagueId::new("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, SleeperError::Json(_)));
    }

    #[tokio::test]
    async fn test_user_leagues_by_season() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/111/leagues/nfl/2024"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "league_id": "L1", "name": "Work Redraft", "season": "2024" },
                { "league_id": "L2", "name": null, "season": "2024" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let leagues = client_for(&server)
            .await
            .user_leagues(&UserId::new("111"), Season::new(2024))
            .await
            .unwrap();
        assert_eq!(leagues.len(), 2);
        assert_eq!(leagues[0].league_id, LeagueId::new("L1"));
        assert_eq!(leagues[0].name.as_deref(), Some("Work Redraft"));
        assert!(leagues[1].name.is_none());
    }

    #[tokio::test]
    async fn test_trending_players_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/players/nfl/trending/add"))
            .and(query_param("lookback_hours", "24"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "player_id": "9001", "count": 1520 },
                { "player_id": "9002", "count": 88 }
            ])))
            .mount(&server)
            .await;

        let trending = client_for(&server)
            .await
            .trending_players(TrendingKind::Add, 24, 50)
            .await
            .unwrap();
        assert_eq!(trending.len(), 2);
        assert_eq!(trending[0].count, 1520);
    }

    #[tokio::test]
    async fn test_bulk_projections_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projections/nfl/2024/5"))
            .and(query_param("season_type", "regular"))
            .and(query_param("position[]", "WR"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "player_id": "6794", "stats": { "rec": 6.1, "rec_yd": 78.0, "pts_ppr": 15.9 } }
            ])))
            .mount(&server)
            .await;

        let rows = client_for(&server)
            .await
            .bulk_projections(Season::new(2024), Week::new(5), &[Position::WR])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].player_id, Some(PlayerId::new("6794")));
        assert_eq!(rows[0].stats.get("rec_yd"), Some(&78.0));
    }

    #[tokio::test]
    async fn test_player_stats_weekly_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats/nfl/player/4046"))
            .and(query_param("season", "2024"))
            .and(query_param("grouping", "week"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "1": { "stats": { "pass_yd": 291.0, "pass_td": 2.0 }, "week": 1 },
                "2": null
            })))
            .mount(&server)
            .await;

        let weeks = client_for(&server)
            .await
            .player_stats(&PlayerId::new("4046"), Season::new(2024))
            .await
            .unwrap();
        let week1 = weeks["1"].as_ref().unwrap();
        assert_eq!(week1.stats.get("pass_td"), Some(&2.0));
        assert!(weeks["2"].is_none());
    }

    #[tokio::test]
    async fn test_requests_are_paced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/state/nfl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "week": 3, "season": "2024"
            })))
            .expect(3)
            .mount(&server)
            .await;

        let interval = Duration::from_millis(40);
        let client = SleeperClient::new(Endpoints::single_host(&server.uri()), interval).unwrap();
        let start = tokio::time::Instant::now();
        for _ in 0..3 {
            client.state().await.unwrap();
        }
        assert!(start.elapsed() >= interval * 2);
    }
}
