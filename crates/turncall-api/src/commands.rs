//! Slash-command webhook handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Command text |
//! |--------|------|--------------|
//! | `POST` | `/commands/profile` | game profile id |
//! | `POST` | `/commands/game` | game id or game link |
//! | `POST` | `/commands/feed` | feed URL |
//!
//! Every handler replies at once with `{"text": ...}`. The game and feed
//! handlers then continue on a spawned task and POST their result to the
//! command's `response_url`.

use std::sync::Arc;

use axum::extract::State;
use axum::{Form, Json};
use futures::future::join_all;
use tracing::{info, warn};
use turncall_clients::feed::game_id_from_link;
use turncall_core::render::render_turn_message;
use turncall_core::{track_game, Game, TrackRequest};
use turncall_types::{ChannelId, ChatUserId, FeedEntry, GameId, ProfileId};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Form payload posted by the chat platform for every command.
#[derive(Debug, Default, serde::Deserialize)]
pub struct CommandForm {
    /// Command argument.
    #[serde(default)]
    pub text: String,
    /// Chat user who issued the command.
    #[serde(default)]
    pub user_id: String,
    /// Display name of that user.
    #[serde(default)]
    pub user_name: String,
    /// Where to POST the delayed result.
    #[serde(default)]
    pub response_url: Option<String>,
    /// Channel the command was issued in.
    #[serde(default)]
    pub channel_id: Option<String>,
}

impl CommandForm {
    fn argument(&self) -> Option<&str> {
        self.text.split_whitespace().next()
    }

    fn channel(&self) -> Option<ChannelId> {
        self.channel_id
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ChannelId::from)
    }
}

/// Immediate acknowledgment, also the body of delayed replies.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CommandReply {
    /// Message shown to the caller.
    pub text: String,
}

fn reply(text: impl Into<String>) -> Json<CommandReply> {
    Json(CommandReply { text: text.into() })
}

// ---------------------------------------------------------------------------
// POST /commands/profile
// ---------------------------------------------------------------------------

/// Bind the calling chat user to the game profile id in `text`.
pub async fn set_profile(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CommandForm>,
) -> Json<CommandReply> {
    let Some(profile) = form.argument() else {
        return reply("Usage: /profile <profile id>");
    };
    if form.user_id.trim().is_empty() {
        warn!(profile = %profile, "profile command without user_id");
        return reply("Could not tell who sent that command, nothing was bound");
    }

    let user = ChatUserId::from(form.user_id.trim());
    let profile = ProfileId::from(profile);
    let previous = state.users.bind(user, profile.clone()).await;

    let who = if form.user_name.is_empty() {
        form.user_id.as_str()
    } else {
        form.user_name.as_str()
    };
    let text = match previous {
        Some(old) if old != profile => format!("{who} is now profile {profile} (was {old})"),
        _ => format!("{who} is profile {profile}"),
    };
    reply(text)
}

// ---------------------------------------------------------------------------
// POST /commands/game
// ---------------------------------------------------------------------------

/// Start tracking the game whose id (or link) is in `text`.
pub async fn add_game(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CommandForm>,
) -> Json<CommandReply> {
    let Some(argument) = form.argument() else {
        return reply("Usage: /game <game id or game link>");
    };
    let id = game_id_from_link(argument).unwrap_or_else(|| GameId::from(argument));

    info!(game_id = %id, user = %form.user_name, "add game command");
    let ack = format!("Looking up game {id}...");

    let request = TrackRequest {
        id,
        name: None,
        channel: form.channel(),
    };
    let response_url = form.response_url;
    tokio::spawn(async move {
        if let Some(game) = track(&state, request).await {
            respond(&state, response_url.as_deref(), &summary(&game)).await;
        }
    });

    reply(ack)
}

// ---------------------------------------------------------------------------
// POST /commands/feed
// ---------------------------------------------------------------------------

/// Start tracking every game listed in the feed at `text`.
pub async fn add_feed(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CommandForm>,
) -> Json<CommandReply> {
    let Some(feed_url) = form.argument().map(ToOwned::to_owned) else {
        return reply("Usage: /feed <feed url>");
    };

    info!(feed_url = %feed_url, user = %form.user_name, "add feed command");
    let ack = format!("Reading games from {feed_url}...");

    let channel = form.channel();
    let response_url = form.response_url;
    tokio::spawn(async move {
        let entries = match state.upstream.fetch_feed_entries(&feed_url).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(feed_url = %feed_url, error = %e, "feed lookup failed");
                return;
            }
        };

        let text = track_feed_entries(&state, entries, channel).await;
        respond(&state, response_url.as_deref(), &text).await;
    });

    reply(ack)
}

/// Track every feed entry concurrently and summarize the ones that worked.
async fn track_feed_entries(
    state: &AppState,
    entries: Vec<FeedEntry>,
    channel: Option<ChannelId>,
) -> String {
    if entries.is_empty() {
        return "No games found in that feed".to_owned();
    }

    let requests = entries.into_iter().map(|entry| TrackRequest {
        id: entry.game_id,
        name: Some(entry.title),
        channel: channel.clone(),
    });
    let games: Vec<Game> = join_all(requests.map(|request| track(state, request)))
        .await
        .into_iter()
        .flatten()
        .collect();

    if games.is_empty() {
        return "None of the games in that feed could be loaded".to_owned();
    }
    games.iter().map(summary).collect::<Vec<_>>().join("\n")
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Run the tracking workflow, logging failures.
async fn track(state: &AppState, request: TrackRequest) -> Option<Game> {
    match track_game(
        &state.store,
        request,
        &state.upstream,
        &state.notifier,
        state.poll_interval,
    )
    .await
    {
        Ok(game) => Some(game),
        Err(e) => {
            warn!(error = %e, "game could not be tracked");
            None
        }
    }
}

/// `*Label*: It is X's turn`.
fn summary(game: &Game) -> String {
    let turn = game
        .current
        .as_ref()
        .map(|s| render_turn_message(s.players_on_turn()))
        .unwrap_or_default();
    format!("*{}*: {turn}", game.label())
}

/// POST a delayed reply, if the command came with a `response_url`.
async fn respond(state: &AppState, response_url: Option<&str>, text: &str) {
    let Some(url) = response_url.filter(|u| !u.is_empty()) else {
        return;
    };
    if let Err(e) = state.chat.post_response(url, text).await {
        warn!(error = %e, "command reply not delivered");
    }
}
