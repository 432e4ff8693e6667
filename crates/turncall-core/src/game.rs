//! Per-game record held by the [`GameStore`](crate::store::GameStore).

use chrono::{DateTime, Utc};
use serde::Serialize;
use turncall_types::{ChannelId, GameId, Snapshot};

/// Everything the process knows about one tracked game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    /// Upstream game id.
    pub id: GameId,
    /// Display name, when one is known (feed titles carry one).
    pub name: Option<String>,
    /// Latest roster, absent until the first successful fetch.
    pub current: Option<Snapshot>,
    /// Roster replaced by the latest update.
    pub previous: Option<Snapshot>,
    /// Chat channel that receives this game's notifications.
    pub channel: Option<ChannelId>,
    /// When `current` was last replaced.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Game {
    /// Create an empty record for `id`.
    pub const fn new(id: GameId) -> Self {
        Self {
            id,
            name: None,
            current: None,
            previous: None,
            channel: None,
            updated_at: None,
        }
    }

    /// Human-facing label: the display name, or `game <id>`.
    pub fn label(&self) -> String {
        self.name
            .as_ref()
            .map_or_else(|| format!("game {}", self.id), Clone::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_name() {
        let mut game = Game::new(GameId::from("123"));
        assert_eq!(game.label(), "game 123");

        game.name = Some("Friday Night Risk".to_owned());
        assert_eq!(game.label(), "Friday Night Risk");
    }
}
