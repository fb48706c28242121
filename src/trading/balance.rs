//! Simulated per-venue asset balances.

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::TradingError;
use crate::market::types::split_trading_pair;
use crate::trading::order::{OrderCandidate, Side};

/// Balance of one asset on one connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetBalance {
    /// Connector holding the asset.
    pub connector: String,
    /// Asset symbol.
    pub asset: String,
    /// Amount held.
    pub amount: Decimal,
}

/// Balances keyed by connector and asset.
#[derive(Debug, Default)]
pub struct Balances {
    inner: DashMap<(String, String), Decimal>,
}

impl Balances {
    /// Create empty balances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the balance of `asset` on `connector`.
    pub fn set(&self, connector: &str, asset: &str, amount: Decimal) {
        self.inner
            .insert((connector.to_string(), asset.to_string()), amount);
    }

    /// Balance of `asset` on `connector`, zero if never set.
    pub fn get(&self, connector: &str, asset: &str) -> Decimal {
        self.inner
            .get(&(connector.to_string(), asset.to_string()))
            .map(|v| *v)
            .unwrap_or(Decimal::ZERO)
    }

    /// Check that the order can be paid for: quote asset for a buy, base asset for a sell.
    pub fn check_funds(&self, order: &OrderCandidate) -> Result<(), TradingError> {
        let (base, quote) = split_trading_pair(&order.trading_pair);
        let (asset, required) = match order.side {
            Side::Buy => (quote, order.notional()),
            Side::Sell => (base, order.amount),
        };

        let available = self.get(&order.connector, asset);
        if available < required {
            return Err(TradingError::InsufficientFunds {
                connector: order.connector.clone(),
                asset: asset.to_string(),
                required,
                available,
            });
        }
        Ok(())
    }

    /// Apply a fill of `amount` at `price`.
    pub fn apply_fill(&self, connector: &str, trading_pair: &str, side: Side, amount: Decimal, price: Decimal) {
        let (base, quote) = split_trading_pair(trading_pair);
        let notional = amount * price;
        let (base_delta, quote_delta) = match side {
            Side::Buy => (amount, -notional),
            Side::Sell => (-amount, notional),
        };

        *self
            .inner
            .entry((connector.to_string(), base.to_string()))
            .or_insert(Decimal::ZERO) += base_delta;
        *self
            .inner
            .entry((connector.to_string(), quote.to_string()))
            .or_insert(Decimal::ZERO) += quote_delta;
    }

    /// All balances sorted by connector then asset.
    pub fn snapshot(&self) -> Vec<AssetBalance> {
        let mut balances: Vec<AssetBalance> = self
            .inner
            .iter()
            .map(|entry| AssetBalance {
                connector: entry.key().0.clone(),
                asset: entry.key().1.clone(),
                amount: *entry.value(),
            })
            .collect();
        balances.sort_by(|a, b| (&a.connector, &a.asset).cmp(&(&b.connector, &b.asset)));
        balances
    }
}
