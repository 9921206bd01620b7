//! Telegram chat bot for ledgeguard.
//!
//! Long-polls the Bot API for commands and inline-button presses, shows
//! mocked positions with their risk scores, and hands out HMAC-signed
//! protection deep links. All state lives in the other crates; this one
//! is dispatch and plumbing.

pub mod callbacks;
pub mod commands;
pub mod config;
pub mod context;
pub mod poller;
