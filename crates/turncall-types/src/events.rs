//! Semantic differences between two rosters of the same game.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::ProfileId;

/// Player-state transitions detected between two snapshots.
///
/// Produced by the differ and handed straight to whoever triggered the
/// update. Never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSet {
    /// Profiles that appeared in the roster.
    pub joined: BTreeSet<ProfileId>,
    /// Profiles that disappeared from the roster.
    pub left: BTreeSet<ProfileId>,
    /// Profiles that became inactive.
    pub eliminated: BTreeSet<ProfileId>,
    /// Profiles whose turn started.
    pub now_on_turn: BTreeSet<ProfileId>,
    /// Someone was on turn before and nobody is now.
    pub game_over: bool,
}

impl EventSet {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.joined.is_empty()
            && self.left.is_empty()
            && self.eliminated.is_empty()
            && self.now_on_turn.is_empty()
            && !self.game_over
    }
}
