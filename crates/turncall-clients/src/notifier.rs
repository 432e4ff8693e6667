//! Chat-backed [`EventSink`].
//!
//! Renders the lines for an update and posts them as one message to the
//! game's channel. Players on turn whose profile is bound to a chat user
//! are mentioned so the platform pings them.

use std::sync::Arc;

use tracing::{debug, warn};
use turncall_core::render::render_event_messages;
use turncall_core::{EventSink, Game, UserMappings};
use turncall_types::EventSet;

use crate::chat::ChatClient;

/// Posts game events to chat.
#[derive(Debug, Clone)]
pub struct ChatNotifier {
    chat: ChatClient,
    users: Arc<UserMappings>,
}

impl ChatNotifier {
    /// Create a notifier posting through `chat`, mentioning users from `users`.
    pub const fn new(chat: ChatClient, users: Arc<UserMappings>) -> Self {
        Self { chat, users }
    }

    /// Build the message for an update, or `None` if there is nothing to say.
    pub async fn compose(&self, game: &Game, events: &EventSet) -> Option<String> {
        let lines = render_event_messages(game, events);
        if lines.is_empty() {
            return None;
        }

        let mut message = format!("*{}*\n{}", game.label(), lines.join("\n"));

        if !events.now_on_turn.is_empty() {
            let mentions = self.mentions(game).await;
            if !mentions.is_empty() {
                message.push('\n');
                message.push_str(&mentions.join(" "));
            }
        }

        Some(message)
    }

    /// `<@USER>` mentions for bound players on turn.
    async fn mentions(&self, game: &Game) -> Vec<String> {
        let Some(current) = &game.current else {
            return Vec::new();
        };

        let mut mentions = Vec::new();
        for player in current.players_on_turn() {
            if let Some(user) = self.users.user_for(&player.profile_id).await {
                mentions.push(format!("<@{user}>"));
            }
        }
        mentions
    }
}

impl EventSink for ChatNotifier {
    async fn on_update(&self, game: &Game, events: &EventSet) {
        let Some(channel) = &game.channel else {
            if !events.is_empty() {
                debug!(game_id = %game.id, "no channel bound, dropping events");
            }
            return;
        };
        let Some(message) = self.compose(game, events).await else {
            return;
        };

        if let Err(e) = self.chat.post_message(channel, &message).await {
            warn!(game_id = %game.id, channel = %channel, error = %e, "notification not delivered");
        }
    }
}
