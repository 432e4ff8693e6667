//! Natural-language rendering of roster events.
//!
//! Names are capitalized and sorted before they are joined:
//!
//! | Count | Rendering |
//! |-------|-----------|
//! | 1 | `Amy` |
//! | 2 | `Amy and Bob` |
//! | 3+ | `Amy, Bob, and Chris` |

use std::collections::BTreeSet;

use turncall_types::{EventSet, Player, ProfileId, Snapshot};

use crate::game::Game;

/// Message sent when nobody is on turn.
pub const GAME_OVER: &str = "Game over!";

/// Render whose turn it is, e.g. `It is Amy and Bob's turn`.
///
/// An empty set of players renders [`GAME_OVER`].
pub fn render_turn_message<'a>(players: impl IntoIterator<Item = &'a Player>) -> String {
    let mut names = sorted_names(players);
    let Some(last) = names.pop() else {
        return GAME_OVER.to_owned();
    };
    names.push(possessive(&last));
    format!("It is {} turn", join_names(&names))
}

/// Render `… was eliminated` / `… were eliminated`.
pub fn render_eliminated_message<'a>(
    players: impl IntoIterator<Item = &'a Player>,
) -> Option<String> {
    let names = sorted_names(players);
    let verb = if names.len() == 1 { "was" } else { "were" };
    (!names.is_empty()).then(|| format!("{} {verb} eliminated", join_names(&names)))
}

/// Render `… joined`.
pub fn render_joined_message<'a>(players: impl IntoIterator<Item = &'a Player>) -> Option<String> {
    with_suffix(players, "joined")
}

/// Render `… left`.
pub fn render_left_message<'a>(players: impl IntoIterator<Item = &'a Player>) -> Option<String> {
    with_suffix(players, "left")
}

/// Render every line an [`EventSet`] calls for, in posting order.
///
/// Joined, eliminated and turn names come from the current roster; left
/// names come from the replaced one. A turn change renders everyone who
/// is on turn now, not only the players whose turn just started.
pub fn render_event_messages(game: &Game, events: &EventSet) -> Vec<String> {
    let current = game.current.as_ref();
    let previous = game.previous.as_ref();
    let mut lines = Vec::new();

    if let Some(line) = render_joined_message(resolve(&events.joined, current)) {
        lines.push(line);
    }
    if let Some(line) = render_left_message(resolve(&events.left, previous)) {
        lines.push(line);
    }
    if let Some(line) = render_eliminated_message(resolve(&events.eliminated, current)) {
        lines.push(line);
    }

    if !events.now_on_turn.is_empty() {
        let on_turn = current.map(Snapshot::players_on_turn).unwrap_or_default();
        lines.push(render_turn_message(on_turn));
    } else if events.game_over {
        lines.push(GAME_OVER.to_owned());
    }

    lines
}

fn resolve<'a>(ids: &BTreeSet<ProfileId>, snapshot: Option<&'a Snapshot>) -> Vec<&'a Player> {
    snapshot.map_or_else(Vec::new, |s| ids.iter().filter_map(|id| s.find(id)).collect())
}

fn with_suffix<'a>(players: impl IntoIterator<Item = &'a Player>, suffix: &str) -> Option<String> {
    let names = sorted_names(players);
    (!names.is_empty()).then(|| format!("{} {suffix}", join_names(&names)))
}

fn sorted_names<'a>(players: impl IntoIterator<Item = &'a Player>) -> Vec<String> {
    let mut names: Vec<String> = players.into_iter().map(|p| capitalize(&p.name)).collect();
    names.sort();
    names
}

/// Upper-case the first character.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// `Gus` -> `Gus'`, `Amy` -> `Amy's`.
fn possessive(name: &str) -> String {
    if name.to_lowercase().ends_with('s') {
        format!("{name}'")
    } else {
        format!("{name}'s")
    }
}

fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}
