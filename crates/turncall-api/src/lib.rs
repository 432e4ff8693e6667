//! Command webhook and health API for Turncall.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Command webhooks** (`/commands/*`) for slash commands that bind a
//!   chat user to a game profile, add a game, or add every game in a feed
//! - **Health endpoint** (`/health`) for load balancers
//!
//! # Architecture
//!
//! Command handlers answer synchronously with a short acknowledgment and
//! do the upstream work on a spawned task. The eventual result is POSTed
//! to the command's `response_url`. Failures of that background work are
//! logged and never reported back to the caller.

pub mod commands;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use state::AppState;
