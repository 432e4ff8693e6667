//! Error types for the engine binary.

/// Top-level error for the engine binary.
///
/// Only startup can fail; everything after startup is logged and
/// swallowed where it happens.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// The shared HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// The API server failed to start or crashed.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: turncall_api::ServerError,
    },
}
