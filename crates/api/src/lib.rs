//! HTTP relay for ledgeguard.
//!
//! A small axum service with two jobs: relay "protection executed"
//! notifications from the front-end into the user's Telegram chat, and
//! give the stateless front-end a server-side check for protection
//! deep-link signatures.

pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;
