//! Network clients for Turncall.
//!
//! - [`upstream`] -- [`UpstreamClient`]: game rosters and game feeds
//! - [`envelope`] -- decoding of the game service's JSON envelope
//! - [`feed`] -- RSS/Atom feed decoding into [`FeedEntry`] values
//! - [`chat`] -- [`ChatClient`]: channel posts and command replies
//! - [`notifier`] -- [`ChatNotifier`], the chat-backed event sink
//!
//! All clients share one [`reqwest::Client`] so connection pools and
//! timeouts are configured in a single place.
//!
//! [`FeedEntry`]: turncall_types::FeedEntry

pub mod chat;
pub mod envelope;
pub mod error;
pub mod feed;
pub mod notifier;
pub mod upstream;

#[cfg(test)]
mod stub;

pub use chat::ChatClient;
pub use error::ClientError;
pub use notifier::ChatNotifier;
pub use upstream::{UpstreamClient, UpstreamConfig};
