//! Chat platform client.
//!
//! Speaks the Slack Web API `chat.postMessage` method for channel posts,
//! and plain JSON POSTs for slash-command `response_url` replies.

use serde::{Deserialize, Serialize};
use tracing::debug;
use turncall_types::ChannelId;

use crate::error::ClientError;

/// Default chat API base URL.
pub const DEFAULT_CHAT_API_URL: &str = "https://slack.com/api";

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct CommandReply<'a> {
    text: &'a str,
}

/// The `{ok, error}` part of every Web API response.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the chat platform.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl ChatClient {
    /// Create a client authenticating with `token` against `api_url`.
    pub fn new(http: reqwest::Client, api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_owned(),
            token: token.into(),
        }
    }

    /// Post `text` to `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ChatDelivery`] if the request fails or the
    /// platform answers `ok: false`.
    pub async fn post_message(&self, channel: &ChannelId, text: &str) -> Result<(), ClientError> {
        let url = format!("{}/chat.postMessage", self.api_url);
        let body = PostMessage {
            channel: channel.as_str(),
            text,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::ChatDelivery(format!("post to {channel} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::ChatDelivery(format!(
                "chat API returned {status} for {channel}"
            )));
        }

        let api: ApiResponse = response.json().await.map_err(|e| {
            ClientError::ChatDelivery(format!("chat API response unreadable: {e}"))
        })?;
        if !api.ok {
            return Err(ClientError::ChatDelivery(format!(
                "chat API rejected post to {channel}: {}",
                api.error.as_deref().unwrap_or("unknown error")
            )));
        }

        debug!(channel = %channel, "message posted");
        Ok(())
    }

    /// Answer a slash command through its `response_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ChatDelivery`] if the reply is not accepted.
    pub async fn post_response(&self, response_url: &str, text: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(response_url)
            .json(&CommandReply { text })
            .send()
            .await
            .map_err(|e| ClientError::ChatDelivery(format!("command reply failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::ChatDelivery(format!(
                "command reply returned {status}"
            )));
        }

        debug!(response_url, "command reply posted");
        Ok(())
    }
}
