//! Decoding of the game service's `getState` envelope.
//!
//! The roster sits at `_content.players._content.player`. Flags arrive
//! as `"0"`/`"1"` strings, and a game with a single seat may carry one
//! player object instead of an array.

use serde_json::Value;
use tracing::warn;
use turncall_types::{Player, ProfileId, Snapshot};

use crate::error::ClientError;

/// Decode a `getState` response body into a [`Snapshot`].
///
/// # Errors
///
/// Returns [`ClientError::Upstream`] when the body is empty or the
/// players section is missing.
pub fn parse_state(body: &Value) -> Result<Snapshot, ClientError> {
    if body.is_null() {
        return Err(ClientError::Upstream("Invalid response (no body)".to_owned()));
    }

    let player_section = content(body)
        .and_then(|c| c.get("players"))
        .and_then(content)
        .and_then(|c| c.get("player"))
        .filter(|p| !p.is_null())
        .ok_or_else(|| ClientError::Upstream("Invalid response (no players)".to_owned()))?;

    let raw_players: Vec<&Value> = match player_section {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![player_section],
        other => {
            return Err(ClientError::Upstream(format!(
                "Invalid response (players is {other})"
            )))
        }
    };

    let players = raw_players
        .into_iter()
        .filter_map(|raw| {
            let player = parse_player(raw);
            if player.is_none() {
                warn!(player = %raw, "skipping player without profile id");
            }
            player
        })
        .collect();

    Ok(Snapshot::new(players))
}

/// The `_content` member of an envelope node.
fn content(node: &Value) -> Option<&Value> {
    node.get("_content").or_else(|| node.get("content"))
}

fn parse_player(raw: &Value) -> Option<Player> {
    let profile_id = text(raw, "profileid")?;

    Some(Player {
        profile_id: ProfileId::new(profile_id),
        seat: text(raw, "id").unwrap_or_default(),
        name: text(raw, "name").unwrap_or_default(),
        is_turn: flag(raw, "isturn").unwrap_or(false),
        active: flag(raw, "active").unwrap_or(true),
    })
}

/// A string or number field rendered as text.
fn text(raw: &Value, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A `"1"`/`1`/`true` style flag.
fn flag(raw: &Value, key: &str) -> Option<bool> {
    match raw.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|v| v != 0),
        Value::String(s) => match s.trim() {
            "1" | "true" => Some(true),
            "0" | "false" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn envelope(players: &Value) -> Value {
        json!({
            "_content": {
                "players": {
                    "_content": { "player": players }
                }
            },
            "stat": "ok"
        })
    }

    #[test]
    fn parses_string_flags() {
        let body = envelope(&json!([
            {"id": "0", "name": "amy", "profileid": "111", "isturn": "1", "active": "1"},
            {"id": "1", "name": "bob", "profileid": "222", "isturn": "0", "active": "0"}
        ]));

        let snapshot = parse_state(&body).unwrap_or_default();
        assert_eq!(snapshot.len(), 2);

        let amy = snapshot.find(&ProfileId::from("111"));
        assert_eq!(amy.map(|p| (p.is_turn, p.active)), Some((true, true)));
        let bob = snapshot.find(&ProfileId::from("222"));
        assert_eq!(bob.map(|p| (p.is_turn, p.active, p.seat.as_str())), Some((false, false, "1")));
    }

    #[test]
    fn single_player_object_is_accepted() {
        let body = envelope(&json!({"id": 0, "name": "gus", "profileid": 9, "isturn": 1}));
        let snapshot = parse_state(&body).unwrap_or_default();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.players_on_turn().len(), 1);
        assert!(snapshot.find(&ProfileId::from("9")).is_some());
    }

    #[test]
    fn missing_body_is_upstream_error() {
        let err = parse_state(&Value::Null);
        assert!(matches!(err, Err(ClientError::Upstream(m)) if m.contains("no body")));
    }

    #[test]
    fn missing_players_is_upstream_error() {
        let body = json!({"_content": {"board": {}}});
        let err = parse_state(&body);
        assert!(matches!(err, Err(ClientError::Upstream(m)) if m.contains("no players")));
    }

    #[test]
    fn plain_content_keys_are_accepted() {
        let body = json!({
            "content": {"players": {"content": {"player": [
                {"id": "0", "name": "amy", "profileid": "1"}
            ]}}}
        });
        assert_eq!(parse_state(&body).map(|s| s.len()).unwrap_or(0), 1);
    }

    #[test]
    fn players_without_identity_are_skipped() {
        let body = envelope(&json!([
            {"name": "ghost"},
            {"id": "1", "name": "bob", "profileid": "222"}
        ]));
        let snapshot = parse_state(&body).unwrap_or_default();
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn seat_id_is_not_a_profile_id() {
        let body = envelope(&json!([
            {"id": "1", "name": "amy"},
            {"id": "2", "name": "bob", "profileid": "1"}
        ]));
        let snapshot = parse_state(&body).unwrap_or_default();
        let ids: Vec<&ProfileId> = snapshot.profile_ids().collect();
        assert_eq!(ids, vec![&ProfileId::from("1")]);
        assert_eq!(
            snapshot.find(&ProfileId::from("1")).map(|p| p.name.as_str()),
            Some("bob")
        );
    }
}
