//! Local HTTP stub for client tests.
//!
//! Serves one canned response for every request and records what it was
//! sent, so tests can assert on the wire format of outbound calls.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::Request;
use axum::http::{StatusCode, header};
use tokio::net::TcpListener;

/// One request as seen by the stub.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl Recorded {
    /// Decoded value of query parameter `key`.
    pub fn param(&self, key: &str) -> Option<String> {
        let url = reqwest::Url::parse(&format!(
            "http://stub{}?{}",
            self.path,
            self.query.as_deref().unwrap_or_default()
        ))
        .ok()?;
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// The body parsed as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// A running stub server.
pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubServer {
    /// Serve `body` with `status` and `content_type` on an ephemeral port.
    pub async fn start(status: StatusCode, content_type: &'static str, body: &'static str) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&requests);

        let app = Router::new().fallback(move |request: Request| {
            let recorder = Arc::clone(&recorder);
            async move {
                let (parts, body_in) = request.into_parts();
                let bytes = axum::body::to_bytes(body_in, usize::MAX).await.unwrap();
                recorder.lock().unwrap().push(Recorded {
                    method: parts.method.to_string(),
                    path: parts.uri.path().to_owned(),
                    query: parts.uri.query().map(ToOwned::to_owned),
                    authorization: parts
                        .headers
                        .get(header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .map(ToOwned::to_owned),
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
                (status, [(header::CONTENT_TYPE, content_type)], body)
            }
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        Self {
            url: format!("http://{addr}"),
            requests,
        }
    }

    /// Serve a JSON body with 200 OK.
    pub async fn json(body: &'static str) -> Self {
        Self::start(StatusCode::OK, "application/json", body).await
    }

    /// Everything received so far.
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}
