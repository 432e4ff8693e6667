//! Configuration for the engine binary.
//!
//! All configuration is loaded from environment variables. The engine
//! needs to know how to reach the game service and the chat platform,
//! which games to track from the start, and where to listen for
//! commands.

use std::time::Duration;

use turncall_api::ServerConfig;
use turncall_clients::chat::DEFAULT_CHAT_API_URL;
use turncall_clients::upstream::{DEFAULT_API_URL, STATE_METHOD};
use turncall_clients::UpstreamConfig;
use turncall_types::{ChannelId, GameId};

use crate::error::EngineError;

/// Complete engine configuration loaded from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Game service endpoint and query shape.
    pub upstream: UpstreamConfig,
    /// Chat API base URL.
    pub chat_api_url: String,
    /// Chat API bearer token.
    pub chat_token: String,
    /// Games tracked from startup.
    pub game_ids: Vec<GameId>,
    /// Channel that receives notifications for `game_ids`.
    pub default_channel: Option<ChannelId>,
    /// Time between polls of one game.
    pub poll_interval: Duration,
    /// Timeout applied to every outbound HTTP request.
    pub http_timeout: Duration,
    /// Command server listen address.
    pub server: ServerConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `SLACK_TOKEN` -- chat API bearer token
    ///
    /// Optional variables:
    /// - `REST_API_URL` -- game service endpoint (default `http://warfish.net/war/services/rest.py`)
    /// - `STATE_SECTIONS` -- comma-separated state sections (default `players`)
    /// - `CHAT_API_URL` -- chat API base URL (default `https://slack.com/api`)
    /// - `GAME_IDS` -- comma-separated games to track at startup
    /// - `DEFAULT_CHANNEL` -- channel for the startup games
    /// - `POLL_INTERVAL_MS` -- poll period in milliseconds (default 300000)
    /// - `HTTP_TIMEOUT_MS` -- outbound request timeout in milliseconds (default 10000)
    /// - `HOST` -- listen host (default `0.0.0.0`)
    /// - `PORT` -- listen port (default 8080)
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EngineError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let chat_token = var("SLACK_TOKEN")
            .ok_or_else(|| EngineError::Config("missing required env var SLACK_TOKEN".to_owned()))?;

        let sections = var("STATE_SECTIONS").map_or_else(
            || vec!["players".to_owned()],
            |raw| {
                let mut sections = split_list(&raw);
                if !sections.iter().any(|s| s == "players") {
                    sections.insert(0, "players".to_owned());
                }
                sections
            },
        );

        let upstream = UpstreamConfig {
            api_url: var("REST_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            method: STATE_METHOD.to_owned(),
            sections,
        };

        let poll_interval_ms: u64 = parse_or(var("POLL_INTERVAL_MS"), "POLL_INTERVAL_MS", 300_000)?;
        if poll_interval_ms == 0 {
            return Err(EngineError::Config(
                "POLL_INTERVAL_MS must be greater than zero".to_owned(),
            ));
        }
        let http_timeout_ms: u64 = parse_or(var("HTTP_TIMEOUT_MS"), "HTTP_TIMEOUT_MS", 10_000)?;
        let port: u16 = parse_or(var("PORT"), "PORT", 8080)?;

        Ok(Self {
            upstream,
            chat_api_url: var("CHAT_API_URL").unwrap_or_else(|| DEFAULT_CHAT_API_URL.to_owned()),
            chat_token,
            game_ids: var("GAME_IDS")
                .map(|raw| split_list(&raw).into_iter().map(GameId::new).collect())
                .unwrap_or_default(),
            default_channel: var("DEFAULT_CHANNEL").map(|c| ChannelId::new(c.trim())),
            poll_interval: Duration::from_millis(poll_interval_ms),
            http_timeout: Duration::from_millis(http_timeout_ms),
            server: ServerConfig {
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
                port,
            },
        })
    }
}

/// Split a comma-separated list, dropping blanks.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Parse an optional value, falling back to `default` when absent.
fn parse_or<T>(value: Option<String>, name: &str, default: T) -> Result<T, EngineError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |v| {
        v.trim()
            .parse()
            .map_err(|e| EngineError::Config(format!("invalid {name}: {e}")))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<EngineConfig, EngineError> {
        let map: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        EngineConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_with_only_token() {
        let config = load(&[("SLACK_TOKEN", "xoxb-1")]);
        assert!(config.is_ok());
        let Ok(config) = config else { return };

        assert_eq!(config.upstream, UpstreamConfig::default());
        assert_eq!(config.chat_api_url, DEFAULT_CHAT_API_URL);
        assert!(config.game_ids.is_empty());
        assert!(config.default_channel.is_none());
        assert_eq!(config.poll_interval, Duration::from_secs(300));
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn missing_token_is_error() {
        assert!(matches!(load(&[]), Err(EngineError::Config(_))));
        assert!(matches!(
            load(&[("SLACK_TOKEN", "  ")]),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn game_ids_are_trimmed() {
        let config = load(&[
            ("SLACK_TOKEN", "xoxb-1"),
            ("GAME_IDS", " 20129138, 44843295 ,,"),
        ]);
        let ids = config.map(|c| c.game_ids).unwrap_or_default();
        assert_eq!(
            ids,
            vec![GameId::from("20129138"), GameId::from("44843295")]
        );
    }

    #[test]
    fn sections_always_include_players() {
        let config = load(&[("SLACK_TOKEN", "x"), ("STATE_SECTIONS", "cards,board")]);
        let sections = config.map(|c| c.upstream.sections).unwrap_or_default();
        assert_eq!(sections, vec!["players", "cards", "board"]);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        assert!(matches!(
            load(&[("SLACK_TOKEN", "x"), ("PORT", "eighty")]),
            Err(EngineError::Config(m)) if m.contains("PORT")
        ));
        assert!(matches!(
            load(&[("SLACK_TOKEN", "x"), ("POLL_INTERVAL_MS", "0")]),
            Err(EngineError::Config(_))
        ));
    }
}
