//! Shared application state for the API server.
//!
//! [`AppState`] carries the process-wide stores and clients into every
//! handler. The stores are created once at startup by the engine binary;
//! nothing here is a global.

use std::sync::Arc;
use std::time::Duration;

use turncall_clients::{ChatClient, ChatNotifier, UpstreamClient};
use turncall_core::{GameStore, UserMappings};

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Tracked games and their pollers.
    pub store: Arc<GameStore>,
    /// Chat user to game profile bindings.
    pub users: Arc<UserMappings>,
    /// Game service and feed client.
    pub upstream: Arc<UpstreamClient>,
    /// Chat client used for command replies.
    pub chat: ChatClient,
    /// Event sink handed to every poller started from a command.
    pub notifier: Arc<ChatNotifier>,
    /// Poll interval for games added through commands.
    pub poll_interval: Duration,
}

impl AppState {
    /// Assemble the state; the notifier is built from `chat` and `users`.
    pub fn new(
        store: Arc<GameStore>,
        users: Arc<UserMappings>,
        upstream: Arc<UpstreamClient>,
        chat: ChatClient,
        poll_interval: Duration,
    ) -> Self {
        let notifier = Arc::new(ChatNotifier::new(chat.clone(), Arc::clone(&users)));
        Self {
            store,
            users,
            upstream,
            chat,
            notifier,
            poll_interval,
        }
    }
}
