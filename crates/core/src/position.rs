//! Mocked lending-position lookup.
//!
//! This is a demo backend: there is no protocol indexer and no database,
//! so the store hands out one canonical high-risk XLM position for every
//! query. The shape matches what a real position service would return,
//! which keeps the bot and API code paths honest.

use serde::Serialize;

use crate::risk::{self, RiskLevel};

/// Canonical demo position id used when the caller supplies none.
pub const DEMO_POSITION_ID: &str = "XLM-123";

/// A lending position snapshot.
///
/// Monetary fields are USD values; `ltv` and `risk_score` are fractions
/// in `[0, 1]`.
#[derive(Debug, Clone, Serialize)]
pub struct Position {
    pub id: String,
    pub asset: String,
    pub pool: String,
    /// Supplied amount in USD (mirrors `collateral` for the demo data).
    pub amount: f64,
    pub collateral: f64,
    pub debt: f64,
    pub ltv: f64,
    pub health_factor: f64,
    pub risk_score: f64,
    pub liquidation_price: f64,
}

impl Position {
    /// Traffic-light classification of this position's risk score.
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score)
    }

    /// Whether the position qualifies for an "activate protection"
    /// action in the bot UI.
    pub fn needs_protection(&self) -> bool {
        risk::needs_protection(self.risk_score)
    }
}

// ---------------------------------------------------------------------------
// PositionStore
// ---------------------------------------------------------------------------

/// Position-lookup collaborator backed by hardcoded demo data.
#[derive(Debug, Clone, Default)]
pub struct PositionStore;

impl PositionStore {
    pub fn new() -> Self {
        Self
    }

    /// Detailed data for a single position.
    ///
    /// An empty id resolves to [`DEMO_POSITION_ID`]; any other id is
    /// echoed back on the same demo snapshot.
    pub fn position_details(&self, position_id: &str) -> Position {
        let id = if position_id.is_empty() {
            DEMO_POSITION_ID
        } else {
            position_id
        };
        demo_position(id)
    }

    /// All positions held by a user. The demo store returns the single
    /// high-risk position regardless of `user_id`.
    pub fn positions_for_user(&self, _user_id: &str) -> Vec<Position> {
        vec![demo_position(DEMO_POSITION_ID)]
    }
}

/// The one high-risk position every demo flow is built around.
fn demo_position(id: &str) -> Position {
    Position {
        id: id.to_string(),
        asset: "XLM".to_string(),
        pool: "XLM-LENDING".to_string(),
        amount: 10_000.0,
        collateral: 10_000.0,
        debt: 8_500.0,
        ltv: 0.85,
        health_factor: 1.15,
        risk_score: 0.85,
        liquidation_price: 0.095,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_id_resolves_to_demo_position() {
        let store = PositionStore::new();
        assert_eq!(store.position_details("").id, DEMO_POSITION_ID);
    }

    #[test]
    fn custom_id_is_preserved() {
        let store = PositionStore::new();
        assert_eq!(store.position_details("BTC-7").id, "BTC-7");
    }

    #[test]
    fn demo_position_is_high_risk() {
        let store = PositionStore::new();
        let positions = store.positions_for_user("555000111");
        assert_eq!(positions.len(), 1);

        let p = &positions[0];
        assert_eq!(p.risk_level(), RiskLevel::High);
        assert!(p.needs_protection());
        assert!(p.ltv > 0.8);
        assert!(p.health_factor < 1.2);
    }

    #[test]
    fn amount_mirrors_collateral() {
        let store = PositionStore::new();
        let p = store.position_details(DEMO_POSITION_ID);
        assert_eq!(p.amount, p.collateral);
    }
}
