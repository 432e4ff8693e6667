//! Entries read from a game feed.

use serde::{Deserialize, Serialize};

use crate::ids::GameId;

/// One game advertised by an RSS/Atom feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Game id taken from the `gid` query parameter of the entry link.
    pub game_id: GameId,
    /// Entry title with its numbering prefix removed.
    pub title: String,
}
