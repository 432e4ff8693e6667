//! Client for the game service's REST endpoint and game feeds.

use serde_json::Value;
use tracing::debug;
use turncall_core::GameStateSource;
use turncall_types::{FeedEntry, GameId, Snapshot};

use crate::envelope::parse_state;
use crate::error::ClientError;
use crate::feed::parse_feed;

/// Default REST endpoint of the game service.
pub const DEFAULT_API_URL: &str = "http://warfish.net/war/services/rest.py";

/// Method name of the state query.
pub const STATE_METHOD: &str = "warfish.tables.getState";

/// Where and how to query the game service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// REST endpoint URL.
    pub api_url: String,
    /// Value of the `_method` parameter for state queries.
    pub method: String,
    /// Sections requested with every state query (`players` at minimum).
    pub sections: Vec<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            method: STATE_METHOD.to_owned(),
            sections: vec!["players".to_owned()],
        }
    }
}

/// HTTP client for game rosters and game feeds.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Create a client that sends requests through `http`.
    pub const fn new(http: reqwest::Client, config: UpstreamConfig) -> Self {
        Self { http, config }
    }

    /// The configuration this client was built with.
    pub const fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Fetch the current roster of game `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the request fails and
    /// [`ClientError::Upstream`] if the response has no body, is not
    /// JSON, or lacks the players section.
    pub async fn fetch_game_state(&self, id: &GameId) -> Result<Snapshot, ClientError> {
        let sections = self.config.sections.join(",");
        let params = [
            ("_format", "json"),
            ("_method", self.config.method.as_str()),
            ("gid", id.as_str()),
            ("sections", sections.as_str()),
        ];

        let response = self
            .http
            .get(&self.config.api_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ClientError::Http(format!("state request for game {id} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Upstream(format!(
                "game service returned {status} for game {id}"
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Http(format!("state body for game {id} unreadable: {e}")))?;

        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)
                .map_err(|e| ClientError::Upstream(format!("invalid JSON for game {id}: {e}")))?
        };

        let snapshot = parse_state(&body)?;
        debug!(game_id = %id, players = snapshot.len(), "game state fetched");
        Ok(snapshot)
    }

    /// Fetch the games advertised by the feed at `feed_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the request fails and
    /// [`ClientError::Feed`] if the document is not a feed.
    pub async fn fetch_feed_entries(&self, feed_url: &str) -> Result<Vec<FeedEntry>, ClientError> {
        let response = self
            .http
            .get(feed_url)
            .send()
            .await
            .map_err(|e| ClientError::Http(format!("feed request to {feed_url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Feed(format!("{feed_url} returned {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Http(format!("feed body from {feed_url} unreadable: {e}")))?;

        let entries = parse_feed(&bytes)?;
        debug!(feed_url, entries = entries.len(), "feed fetched");
        Ok(entries)
    }
}

impl GameStateSource for UpstreamClient {
    type Error = ClientError;

    async fn fetch_game_state(&self, id: &GameId) -> Result<Snapshot, ClientError> {
        Self::fetch_game_state(self, id).await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::stub::StubServer;

    const STATE: &str = r#"{
        "_content": {"players": {"_content": {"player": [
            {"id": "0", "name": "amy", "profileid": "111", "isturn": "1", "active": "1"},
            {"id": "1", "name": "bob", "profileid": "222", "isturn": "0", "active": "1"}
        ]}}},
        "stat": "ok"
    }"#;

    const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Games</title><link>http://warfish.net/</link>
<description>mine</description>
<item><title>1. Classic</title><link>http://warfish.net/war/play/game?gid=42</link></item>
</channel></rss>"#;

    fn client(api_url: String, sections: &[&str]) -> UpstreamClient {
        let config = UpstreamConfig {
            api_url,
            sections: sections.iter().map(|s| (*s).to_owned()).collect(),
            ..UpstreamConfig::default()
        };
        UpstreamClient::new(reqwest::Client::new(), config)
    }

    #[test]
    fn default_config_requests_players() {
        let config = UpstreamConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.method, STATE_METHOD);
        assert_eq!(config.sections, vec!["players".to_owned()]);
    }

    #[tokio::test]
    async fn state_query_carries_method_game_and_sections() {
        let stub = StubServer::json(STATE).await;
        let client = client(format!("{}/rest.py", stub.url), &["players", "board"]);

        let snapshot = client
            .fetch_game_state(&GameId::from("20129138"))
            .await
            .unwrap_or_default();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot.players_on_turn().first().map(|p| p.name.as_str()),
            Some("amy")
        );

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        let request = requests.first().cloned();
        assert!(request.as_ref().is_some_and(|r| r.method == "GET" && r.path == "/rest.py"));
        let param = |key: &str| request.as_ref().and_then(|r| r.param(key));
        assert_eq!(param("_format").as_deref(), Some("json"));
        assert_eq!(param("_method").as_deref(), Some("warfish.tables.getState"));
        assert_eq!(param("gid").as_deref(), Some("20129138"));
        assert_eq!(param("sections").as_deref(), Some("players,board"));
    }

    #[tokio::test]
    async fn empty_state_body_is_upstream_error() {
        let stub = StubServer::json("").await;
        let client = client(stub.url.clone(), &["players"]);

        let result = client.fetch_game_state(&GameId::from("1")).await;
        assert!(matches!(result, Err(ClientError::Upstream(m)) if m.contains("no body")));
    }

    #[tokio::test]
    async fn state_error_status_is_upstream_error() {
        let stub = StubServer::start(StatusCode::BAD_GATEWAY, "text/plain", "down").await;
        let client = client(stub.url.clone(), &["players"]);

        let result = client.fetch_game_state(&GameId::from("1")).await;
        assert!(matches!(result, Err(ClientError::Upstream(_))));
    }

    #[tokio::test]
    async fn unreachable_service_is_http_error() {
        let client = client("http://127.0.0.1:9/rest.py".to_owned(), &["players"]);
        let result = client.fetch_game_state(&GameId::from("1")).await;
        assert!(matches!(result, Err(ClientError::Http(_))));
    }

    #[tokio::test]
    async fn feed_is_fetched_and_decoded() {
        let stub = StubServer::start(StatusCode::OK, "application/rss+xml", RSS).await;
        let client = client(DEFAULT_API_URL.to_owned(), &["players"]);

        let entries = client
            .fetch_feed_entries(&format!("{}/rss/mine", stub.url))
            .await
            .unwrap_or_default();
        assert_eq!(
            entries,
            vec![FeedEntry {
                game_id: GameId::from("42"),
                title: "Classic".to_owned(),
            }]
        );
        assert!(stub.requests().first().is_some_and(|r| r.path == "/rss/mine"));
    }

    #[tokio::test]
    async fn missing_feed_is_feed_error() {
        let stub = StubServer::start(StatusCode::NOT_FOUND, "text/plain", "gone").await;
        let client = client(DEFAULT_API_URL.to_owned(), &["players"]);

        let result = client.fetch_feed_entries(&stub.url).await;
        assert!(matches!(result, Err(ClientError::Feed(_))));
    }
}
