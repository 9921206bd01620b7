//! Domain layer for the ledgeguard notification backend.
//!
//! This crate has no I/O beyond logging. It holds the deep-link
//! authorization service, the mocked position store, risk
//! classification thresholds and the SafetyVault contract metadata,
//! so it can be used by both the API relay and the chat bot without
//! pulling in their runtime stacks.

pub mod contract;
pub mod deeplink;
pub mod position;
pub mod risk;
