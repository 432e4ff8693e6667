//! RSS/Atom feed decoding.
//!
//! Every entry whose link carries a `gid` query parameter becomes a
//! [`FeedEntry`]. Entries without a usable link are skipped; only a feed
//! that cannot be parsed at all is an error.

use reqwest::Url;
use tracing::debug;
use turncall_types::{FeedEntry, GameId};

use crate::error::ClientError;

/// Decode a raw feed document.
///
/// # Errors
///
/// Returns [`ClientError::Feed`] if the document is not RSS or Atom.
pub fn parse_feed(document: &[u8]) -> Result<Vec<FeedEntry>, ClientError> {
    let feed =
        feed_rs::parser::parse(document).map_err(|e| ClientError::Feed(format!("{e}")))?;

    let entries = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let title = entry.title.map(|t| t.content).unwrap_or_default();
            let Some(link) = entry.links.first() else {
                debug!(title = %title, "feed entry has no link");
                return None;
            };
            let Some(game_id) = game_id_from_link(&link.href) else {
                debug!(title = %title, link = %link.href, "feed entry link has no gid");
                return None;
            };
            Some(FeedEntry {
                game_id,
                title: strip_title_prefix(&title),
            })
        })
        .collect();

    Ok(entries)
}

/// Base for relative links; only their query string is read.
const RELATIVE_BASE: &str = "http://localhost/";

/// The `gid` query parameter of `link`, which may be relative.
pub fn game_id_from_link(link: &str) -> Option<GameId> {
    let url = Url::parse(link)
        .or_else(|_| Url::parse(RELATIVE_BASE).and_then(|base| base.join(link)))
        .ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "gid")
        .map(|(_, value)| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .map(GameId::new)
}

/// Remove a leading `12.` or `[12]` numbering prefix from a title.
///
/// Titles that consist of nothing but a prefix are returned trimmed.
pub fn strip_title_prefix(title: &str) -> String {
    let trimmed = title.trim();

    let rest = if let Some(inner) = trimmed.strip_prefix('[') {
        inner.split_once(']').map_or(trimmed, |(_, rest)| rest)
    } else {
        let after_digits = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
        if after_digits.len() == trimmed.len() {
            trimmed
        } else {
            after_digits.strip_prefix('.').unwrap_or(after_digits)
        }
    };

    let rest = rest.trim_start();
    if rest.is_empty() {
        trimmed.to_owned()
    } else {
        rest.to_owned()
    }
}
