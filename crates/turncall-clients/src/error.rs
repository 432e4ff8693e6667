//! Error types for the network clients.

/// Errors that can occur while talking to the game service, a feed, or
/// the chat platform.
///
/// Every caller logs and drops these; none are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The game service answered with a missing or malformed body.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// A feed could not be parsed.
    #[error("feed error: {0}")]
    Feed(String),

    /// A chat message could not be delivered.
    #[error("chat delivery error: {0}")]
    ChatDelivery(String),

    /// The HTTP request itself failed.
    #[error("HTTP error: {0}")]
    Http(String),
}
