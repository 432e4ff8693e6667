//! Axum router construction for the API.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::commands;
use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /health` -- liveness probe (`HEAD` is answered too)
/// - `POST /commands/profile` -- bind the caller to a game profile
/// - `POST /commands/game` -- start tracking a game by id
/// - `POST /commands/feed` -- start tracking every game in a feed
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/commands/profile", post(commands::set_profile))
        .route("/commands/game", post(commands::add_game))
        .route("/commands/feed", post(commands::add_feed))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
