//! Turncall engine binary.
//!
//! Wires the game store, the outbound clients and the command server
//! together, starts polling the games configured in `GAME_IDS`, and runs
//! until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from the environment
//! 3. Build the shared HTTP client and the upstream/chat clients
//! 4. Create the game store and user mappings
//! 5. Start tracking the default games in the background
//! 6. Serve commands until shutdown, then stop every poller

mod config;
mod error;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use turncall_api::{start_server, AppState};
use turncall_clients::{ChatClient, UpstreamClient};
use turncall_core::render::render_turn_message;
use turncall_core::{track_game, GameStore, TrackRequest, UserMappings};

use crate::config::EngineConfig;
use crate::error::EngineError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the command server
/// cannot start.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("turncall-engine starting");

    // 2. Load configuration.
    let config = EngineConfig::from_env()?;
    info!(
        api_url = config.upstream.api_url,
        chat_api_url = config.chat_api_url,
        default_games = config.game_ids.len(),
        poll_interval_ms = config.poll_interval.as_millis(),
        "configuration loaded"
    );

    // 3. Outbound clients.
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .user_agent(concat!("turncall/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| EngineError::HttpClient(e.to_string()))?;
    let upstream = Arc::new(UpstreamClient::new(http.clone(), config.upstream.clone()));
    let chat = ChatClient::new(http, &config.chat_api_url, &config.chat_token);

    // 4. Stores.
    let store = Arc::new(GameStore::new());
    let users = Arc::new(UserMappings::new());
    let state = Arc::new(AppState::new(
        Arc::clone(&store),
        users,
        upstream,
        chat,
        config.poll_interval,
    ));

    // 5. Default games.
    track_default_games(&state, &config);

    // 6. Serve until Ctrl-C.
    let served = start_server(&config.server, Arc::clone(&state), shutdown_signal()).await;

    store.shutdown().await;
    served.map_err(EngineError::from)?;

    info!("turncall-engine stopped");
    Ok(())
}

/// Start tracking every game from `GAME_IDS` on background tasks.
fn track_default_games(state: &Arc<AppState>, config: &EngineConfig) {
    for id in &config.game_ids {
        let state = Arc::clone(state);
        let request = TrackRequest {
            id: id.clone(),
            name: None,
            channel: config.default_channel.clone(),
        };

        tokio::spawn(async move {
            let id = request.id.clone();
            match track_game(
                &state.store,
                request,
                &state.upstream,
                &state.notifier,
                state.poll_interval,
            )
            .await
            {
                Ok(game) => {
                    let turn = game
                        .current
                        .as_ref()
                        .map(|s| render_turn_message(s.players_on_turn()))
                        .unwrap_or_default();
                    info!(game_id = %id, turn = %turn, "default game loaded");
                }
                Err(e) => warn!(game_id = %id, error = %e, "default game has no baseline yet"),
            }
        });
    }
}

/// Resolve on `Ctrl-C`.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
