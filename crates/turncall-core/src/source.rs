//! Seams between the store's pollers and the outside world.
//!
//! A poller needs something that fetches rosters ([`GameStateSource`])
//! and something that acts on the resulting events ([`EventSink`]). The
//! HTTP-backed implementations live in `turncall-clients`; tests plug in
//! in-memory fakes.

use std::fmt::Display;
use std::future::Future;

use turncall_types::{EventSet, GameId, Snapshot};

use crate::game::Game;

/// A source of game rosters.
pub trait GameStateSource: Send + Sync + 'static {
    /// Error returned when a fetch fails.
    type Error: Display + Send;

    /// Fetch the current roster of `id`.
    fn fetch_game_state(
        &self,
        id: &GameId,
    ) -> impl Future<Output = Result<Snapshot, Self::Error>> + Send;
}

/// Consumer of the events produced by a store update.
pub trait EventSink: Send + Sync + 'static {
    /// Called after every successful poll, including polls with no events.
    ///
    /// `game` is the record as it stands after the update, so both the
    /// new and the replaced roster are available on it.
    fn on_update(&self, game: &Game, events: &EventSet) -> impl Future<Output = ()> + Send;
}

/// An event sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl EventSink for NoOpSink {
    async fn on_update(&self, _game: &Game, _events: &EventSet) {}
}
