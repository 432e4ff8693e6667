//! The "start tracking a game" workflow.
//!
//! Used both for the default games configured at startup and for games
//! added through chat commands: register the game, fetch its first
//! roster as a baseline, and hand it to a poller.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use turncall_types::{ChannelId, GameId};

use crate::game::Game;
use crate::source::{EventSink, GameStateSource};
use crate::store::GameStore;

/// Errors that can occur while starting to track a game.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    /// The initial roster could not be fetched.
    #[error("failed to fetch game {id}: {message}")]
    Fetch {
        /// The game that failed.
        id: GameId,
        /// Description of the source failure.
        message: String,
    },
}

/// A game to start tracking.
#[derive(Debug, Clone)]
pub struct TrackRequest {
    /// Upstream game id.
    pub id: GameId,
    /// Display name, if known.
    pub name: Option<String>,
    /// Channel that should receive the game's notifications.
    pub channel: Option<ChannelId>,
}

impl TrackRequest {
    /// Track `id` with no name or channel.
    pub const fn new(id: GameId) -> Self {
        Self {
            id,
            name: None,
            channel: None,
        }
    }
}

/// Register a game, fetch its roster and start polling it.
///
/// The poller is started even when the first fetch fails; the game then
/// gets its baseline on the next scheduled poll. Tracking a game that is
/// already polled refreshes its roster and forwards any resulting events
/// to `sink`; no second poller is started.
///
/// # Errors
///
/// Returns [`TrackError::Fetch`] if the first roster could not be fetched.
pub async fn track_game<S, N>(
    store: &Arc<GameStore>,
    request: TrackRequest,
    source: &Arc<S>,
    sink: &Arc<N>,
    interval: Duration,
) -> Result<Game, TrackError>
where
    S: GameStateSource,
    N: EventSink,
{
    let TrackRequest { id, name, channel } = request;

    store.get_or_create(&id).await;
    if let Some(name) = name {
        store.set_name(&id, name).await;
    }
    if let Some(channel) = channel {
        store.bind_channel(&id, channel).await;
    }

    let fetched = source.fetch_game_state(&id).await;
    let started = store
        .start_polling(&id, interval, Arc::clone(source), Arc::clone(sink))
        .await;

    let snapshot = fetched.map_err(|e| {
        warn!(game_id = %id, error = %e, new_poller = started, "initial fetch failed");
        TrackError::Fetch {
            id: id.clone(),
            message: e.to_string(),
        }
    })?;
    let players = snapshot.len();
    let events = store.update(&id, snapshot).await;

    let game = store.get_or_create(&id).await;
    if !events.is_empty() {
        sink.on_update(&game, &events).await;
    }
    info!(game_id = %id, players, new_poller = started, "game tracked");

    Ok(game)
}
