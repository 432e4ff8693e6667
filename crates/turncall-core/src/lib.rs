//! Game-state tracking for Turncall.
//!
//! This crate owns everything between "an upstream roster arrived" and
//! "these sentences should be posted":
//!
//! - [`differ`] -- compares two snapshots and produces an [`EventSet`]
//! - [`game`] -- the per-game record held by the store
//! - [`store`] -- the [`GameStore`] and its per-game pollers
//! - [`source`] -- the [`GameStateSource`] and [`EventSink`] seams
//! - [`users`] -- chat user to upstream profile bindings
//! - [`render`] -- natural-language rendering of event sets
//! - [`tracker`] -- the "start tracking a game" workflow
//!
//! [`EventSet`]: turncall_types::EventSet

pub mod differ;
pub mod game;
pub mod render;
pub mod source;
pub mod store;
pub mod tracker;
pub mod users;

pub use differ::{diff, diff_optional};
pub use game::Game;
pub use source::{EventSink, GameStateSource, NoOpSink};
pub use store::GameStore;
pub use tracker::{track_game, TrackError, TrackRequest};
pub use users::UserMappings;
