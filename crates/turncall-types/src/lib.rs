//! Shared type definitions for the Turncall game notifier.
//!
//! This crate is the single source of truth for the data model used
//! across the workspace: identifiers, player rosters, the event sets
//! derived from comparing two rosters, and feed entries.
//!
//! # Modules
//!
//! - [`ids`] -- String newtypes for games, profiles, chat users and channels
//! - [`roster`] -- [`Player`] and [`Snapshot`]
//! - [`events`] -- [`EventSet`], the semantic difference between snapshots
//! - [`feed`] -- [`FeedEntry`] produced by game feeds

pub mod events;
pub mod feed;
pub mod ids;
pub mod roster;

pub use events::EventSet;
pub use feed::FeedEntry;
pub use ids::{ChannelId, ChatUserId, GameId, ProfileId};
pub use roster::{Player, Snapshot};
