//! Snapshot differ.
//!
//! Compares the previous and next roster of a game and derives the
//! semantic events the notifier cares about.
//!
//! Joined and left detection only runs when the roster size changes. A
//! same-size membership swap therefore produces no joined or left events.
//! This is a known gap that is kept as-is.

use std::collections::BTreeSet;

use turncall_types::{EventSet, ProfileId, Snapshot};

/// Compute the events that turn `previous` into `next`.
///
/// Both snapshots must belong to the same game.
pub fn diff(previous: &Snapshot, next: &Snapshot) -> EventSet {
    let mut events = EventSet::default();

    if previous.len() != next.len() {
        let before: BTreeSet<&ProfileId> = previous.profile_ids().collect();
        let after: BTreeSet<&ProfileId> = next.profile_ids().collect();

        events.joined = after.difference(&before).map(|id| (*id).clone()).collect();
        events.left = before.difference(&after).map(|id| (*id).clone()).collect();
    }

    let was_on_turn = ids_where(previous, |p| p.is_turn);
    events.now_on_turn = ids_where(next, |p| p.is_turn)
        .difference(&was_on_turn)
        .cloned()
        .collect();

    let was_eliminated = ids_where(previous, |p| !p.active);
    events.eliminated = ids_where(next, |p| !p.active)
        .difference(&was_eliminated)
        .cloned()
        .collect();

    events.game_over = previous.has_turn() && !next.has_turn();

    events
}

/// Like [`diff`], but a missing previous snapshot yields no events.
///
/// The first roster ever seen for a game is a baseline, not a change.
pub fn diff_optional(previous: Option<&Snapshot>, next: &Snapshot) -> EventSet {
    previous.map_or_else(EventSet::default, |prev| diff(prev, next))
}

fn ids_where(
    snapshot: &Snapshot,
    pred: impl Fn(&turncall_types::Player) -> bool,
) -> BTreeSet<ProfileId> {
    snapshot
        .players
        .iter()
        .filter(|p| pred(p))
        .map(|p| p.profile_id.clone())
        .collect()
}
