//! In-memory game store and per-game pollers.
//!
//! [`GameStore`] is created once at startup, shared through an [`Arc`],
//! and holds the only copy of every tracked game's roster. An update
//! diffs the incoming roster against the current one, keeps the replaced
//! roster as `previous`, and returns the [`EventSet`] to the caller.
//!
//! # Polling
//!
//! [`GameStore::start_polling`] spawns one Tokio task per game. The task
//! waits one interval, fetches through a [`GameStateSource`], applies the
//! roster, and hands the result to an [`EventSink`]. A failed fetch is
//! logged and the schedule continues. Stop requests are only observed
//! while a poller is waiting for its next tick, so a fetch that is
//! already in flight still lands in the store.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use turncall_types::{ChannelId, EventSet, GameId, Snapshot};

use crate::differ::diff_optional;
use crate::game::Game;
use crate::source::{EventSink, GameStateSource};

/// Handle to a running poller task.
#[derive(Debug)]
struct Poller {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Process-wide store of tracked games.
#[derive(Debug, Default)]
pub struct GameStore {
    games: RwLock<BTreeMap<GameId, Game>>,
    pollers: Mutex<BTreeMap<GameId, Poller>>,
}

impl GameStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the record for `id`, creating an empty one if needed.
    pub async fn get_or_create(&self, id: &GameId) -> Game {
        let mut games = self.games.write().await;
        games
            .entry(id.clone())
            .or_insert_with(|| Game::new(id.clone()))
            .clone()
    }

    /// Return the record for `id`, if it is tracked.
    pub async fn get(&self, id: &GameId) -> Option<Game> {
        self.games.read().await.get(id).cloned()
    }

    /// Ids of all tracked games, in sorted order.
    pub async fn game_ids(&self) -> Vec<GameId> {
        self.games.read().await.keys().cloned().collect()
    }

    /// Number of tracked games.
    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }

    /// Whether no games are tracked.
    pub async fn is_empty(&self) -> bool {
        self.games.read().await.is_empty()
    }

    /// Route notifications for `id` to `channel`.
    pub async fn bind_channel(&self, id: &GameId, channel: ChannelId) {
        let mut games = self.games.write().await;
        let game = games
            .entry(id.clone())
            .or_insert_with(|| Game::new(id.clone()));
        debug!(game_id = %id, channel = %channel, "channel bound");
        game.channel = Some(channel);
    }

    /// Set the display name of `id`.
    pub async fn set_name(&self, id: &GameId, name: impl Into<String>) {
        let mut games = self.games.write().await;
        games
            .entry(id.clone())
            .or_insert_with(|| Game::new(id.clone()))
            .name = Some(name.into());
    }

    /// Store `snapshot` as the current roster of `id` and return what changed.
    ///
    /// The first roster stored for a game yields an empty [`EventSet`].
    pub async fn update(&self, id: &GameId, snapshot: Snapshot) -> EventSet {
        self.apply(id, snapshot).await.1
    }

    /// Replace the current roster and return the updated record with its events.
    async fn apply(&self, id: &GameId, snapshot: Snapshot) -> (Game, EventSet) {
        let mut games = self.games.write().await;
        let game = games
            .entry(id.clone())
            .or_insert_with(|| Game::new(id.clone()));

        let events = diff_optional(game.current.as_ref(), &snapshot);
        game.previous = game.current.replace(snapshot);
        game.updated_at = Some(Utc::now());

        (game.clone(), events)
    }

    /// Fetch, apply and dispatch one roster for `id`.
    ///
    /// Returns `None` when the fetch failed. Failures are logged only.
    pub async fn poll_once<S, N>(&self, id: &GameId, source: &S, sink: &N) -> Option<EventSet>
    where
        S: GameStateSource,
        N: EventSink,
    {
        let snapshot = match source.fetch_game_state(id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(game_id = %id, error = %e, "poll failed");
                return None;
            }
        };

        let (game, events) = self.apply(id, snapshot).await;
        if !events.is_empty() {
            debug!(
                game_id = %id,
                joined = events.joined.len(),
                left = events.left.len(),
                eliminated = events.eliminated.len(),
                now_on_turn = events.now_on_turn.len(),
                game_over = events.game_over,
                "game changed"
            );
        }
        sink.on_update(&game, &events).await;
        Some(events)
    }

    /// Start polling `id` every `interval`.
    ///
    /// Returns `false` without spawning anything if `id` already has a
    /// poller. The first fetch happens one interval after this call.
    pub async fn start_polling<S, N>(
        self: &Arc<Self>,
        id: &GameId,
        interval: Duration,
        source: Arc<S>,
        sink: Arc<N>,
    ) -> bool
    where
        S: GameStateSource,
        N: EventSink,
    {
        let mut pollers = self.pollers.lock().await;
        if pollers.contains_key(id) {
            debug!(game_id = %id, "poller already running");
            return false;
        }

        self.get_or_create(id).await;

        let (stop, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_poller(
            Arc::clone(self),
            id.clone(),
            interval,
            source,
            sink,
            stop_rx,
        ));
        pollers.insert(id.clone(), Poller { stop, handle });

        info!(game_id = %id, interval_ms = interval.as_millis(), "polling started");
        true
    }

    /// Stop polling `id`. Returns `false` if it was not being polled.
    pub async fn stop_polling(&self, id: &GameId) -> bool {
        let Some(poller) = self.pollers.lock().await.remove(id) else {
            return false;
        };
        // Send fails only if the task already exited.
        let _ = poller.stop.send(true);
        info!(game_id = %id, "polling stopped");
        true
    }

    /// Whether `id` currently has a poller.
    pub async fn is_polling(&self, id: &GameId) -> bool {
        self.pollers.lock().await.contains_key(id)
    }

    /// Stop every poller and wait for in-flight polls to finish.
    pub async fn shutdown(&self) {
        let pollers = std::mem::take(&mut *self.pollers.lock().await);
        let count = pollers.len();

        for poller in pollers.values() {
            let _ = poller.stop.send(true);
        }
        for (id, poller) in pollers {
            if let Err(e) = poller.handle.await {
                warn!(game_id = %id, error = %e, "poller task failed");
            }
        }

        info!(pollers = count, "game store shut down");
    }
}

/// Body of a poller task.
async fn run_poller<S, N>(
    store: Arc<GameStore>,
    id: GameId,
    period: Duration,
    source: Arc<S>,
    sink: Arc<N>,
    mut stop: watch::Receiver<bool>,
) where
    S: GameStateSource,
    N: EventSink,
{
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        store.poll_once(&id, source.as_ref(), sink.as_ref()).await;
    }

    debug!(game_id = %id, "poller exited");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use turncall_types::Player;

    use super::*;

    /// Serves a fixed roster; the first `failures` fetches fail.
    struct FakeSource {
        calls: AtomicUsize,
        failures: usize,
        delay: Duration,
        snapshot: Snapshot,
    }

    impl FakeSource {
        fn new(snapshot: Snapshot) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures: 0,
                delay: Duration::ZERO,
                snapshot,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl GameStateSource for FakeSource {
        type Error = String;

        async fn fetch_game_state(&self, _id: &GameId) -> Result<Snapshot, String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if n < self.failures {
                return Err("connection refused".to_owned());
            }
            Ok(self.snapshot.clone())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        updates: std::sync::Mutex<Vec<EventSet>>,
    }

    impl RecordingSink {
        fn count(&self) -> usize {
            self.updates.lock().map(|u| u.len()).unwrap_or(0)
        }
    }

    impl EventSink for RecordingSink {
        async fn on_update(&self, _game: &Game, events: &EventSet) {
            if let Ok(mut updates) = self.updates.lock() {
                updates.push(events.clone());
            }
        }
    }

    fn roster(on_turn: &str) -> Snapshot {
        Snapshot::new(vec![
            Player::new("1", "amy").on_turn(on_turn == "1"),
            Player::new("2", "bob").on_turn(on_turn == "2"),
        ])
    }

    #[tokio::test]
    async fn first_update_is_baseline() {
        let store = GameStore::new();
        let id = GameId::from("100");

        let events = store.update(&id, roster("1")).await;
        assert!(events.is_empty());

        let events = store.update(&id, roster("2")).await;
        assert_eq!(events.now_on_turn.len(), 1);

        let game = store.get(&id).await.unwrap();
        assert_eq!(game.previous, Some(roster("1")));
        assert_eq!(game.current, Some(roster("2")));
        assert!(game.updated_at.is_some());
    }

    #[tokio::test]
    async fn get_or_create_is_stable() {
        let store = GameStore::new();
        let id = GameId::from("7");
        store.get_or_create(&id).await;
        store.bind_channel(&id, ChannelId::from("C1")).await;
        let game = store.get_or_create(&id).await;
        assert_eq!(game.channel, Some(ChannelId::from("C1")));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn start_polling_is_idempotent() {
        let store = Arc::new(GameStore::new());
        let id = GameId::from("100");
        let source = Arc::new(FakeSource::new(roster("1")));
        let sink = Arc::new(RecordingSink::default());
        let period = Duration::from_secs(60);

        assert!(
            store
                .start_polling(&id, period, Arc::clone(&source), Arc::clone(&sink))
                .await
        );
        assert!(
            !store
                .start_polling(&id, period, Arc::clone(&source), Arc::clone(&sink))
                .await
        );

        tokio::time::sleep(period * 3 + Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 3);
        assert_eq!(sink.count(), 3);

        store.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_polls_do_not_cancel_schedule() {
        let store = Arc::new(GameStore::new());
        let id = GameId::from("100");
        let mut fake = FakeSource::new(roster("1"));
        fake.failures = 2;
        let source = Arc::new(fake);
        let sink = Arc::new(RecordingSink::default());
        let period = Duration::from_secs(10);

        store
            .start_polling(&id, period, Arc::clone(&source), Arc::clone(&sink))
            .await;
        tokio::time::sleep(period * 4 + Duration::from_secs(1)).await;

        assert_eq!(source.calls(), 4);
        assert_eq!(sink.count(), 2);
        assert!(store.get(&id).await.unwrap().current.is_some());

        store.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_polling_halts_schedule() {
        let store = Arc::new(GameStore::new());
        let id = GameId::from("100");
        let source = Arc::new(FakeSource::new(roster("1")));
        let sink = Arc::new(RecordingSink::default());
        let period = Duration::from_secs(10);

        store
            .start_polling(&id, period, Arc::clone(&source), Arc::clone(&sink))
            .await;
        tokio::time::sleep(period + Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 1);

        assert!(store.stop_polling(&id).await);
        assert!(!store.stop_polling(&id).await);
        assert!(!store.is_polling(&id).await);

        tokio::time::sleep(period * 5).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_poll_lands_after_stop() {
        let store = Arc::new(GameStore::new());
        let id = GameId::from("100");
        let mut fake = FakeSource::new(roster("2"));
        fake.delay = Duration::from_secs(5);
        let source = Arc::new(fake);
        let sink = Arc::new(RecordingSink::default());
        let period = Duration::from_secs(10);

        store
            .start_polling(&id, period, Arc::clone(&source), Arc::clone(&sink))
            .await;

        // The fetch starts at 10s and completes at 15s.
        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(source.calls(), 1);
        store.stop_polling(&id).await;

        tokio::time::sleep(Duration::from_secs(10)).await;
        let game = store.get(&id).await.unwrap();
        assert_eq!(game.current, Some(roster("2")));
        assert_eq!(source.calls(), 1);
    }
}
