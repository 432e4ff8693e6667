//! Player rosters.
//!
//! A [`Snapshot`] is the roster of one game at one point in time, in the
//! order the upstream service reported it.

use serde::{Deserialize, Serialize};

use crate::ids::ProfileId;

/// One seat in a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable upstream identity of the person in this seat.
    pub profile_id: ProfileId,
    /// Seat number within the game.
    pub seat: String,
    /// Display name shown by the upstream service.
    pub name: String,
    /// Whether it is currently this player's turn.
    pub is_turn: bool,
    /// Whether the player is still in the game (false once eliminated).
    pub active: bool,
}

impl Player {
    /// Create an active player who is not on turn.
    pub fn new(profile_id: impl Into<ProfileId>, name: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            seat: String::new(),
            name: name.into(),
            is_turn: false,
            active: true,
        }
    }

    /// Set the seat number.
    #[must_use]
    pub fn with_seat(mut self, seat: impl Into<String>) -> Self {
        self.seat = seat.into();
        self
    }

    /// Set whether it is this player's turn.
    #[must_use]
    pub const fn on_turn(mut self, is_turn: bool) -> Self {
        self.is_turn = is_turn;
        self
    }

    /// Set whether the player is still active.
    #[must_use]
    pub const fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// Roster of a single game at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Players in upstream order.
    pub players: Vec<Player>,
}

impl Snapshot {
    /// Wrap a list of players.
    pub const fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    /// Number of players in the roster.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the roster has no players.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Look up a player by profile id.
    pub fn find(&self, profile_id: &ProfileId) -> Option<&Player> {
        self.players.iter().find(|p| &p.profile_id == profile_id)
    }

    /// Players whose turn it currently is.
    pub fn players_on_turn(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_turn).collect()
    }

    /// Whether at least one player is on turn.
    pub fn has_turn(&self) -> bool {
        self.players.iter().any(|p| p.is_turn)
    }

    /// Iterate over profile ids in roster order.
    pub fn profile_ids(&self) -> impl Iterator<Item = &ProfileId> {
        self.players.iter().map(|p| &p.profile_id)
    }
}
