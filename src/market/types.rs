//! Venue and quote types shared by quote providers and the optimizer.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A connector paired with the trading pair it is quoted on.
///
/// Venue identity is plain data compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Venue {
    /// Connector name (e.g., "binance").
    pub connector: String,
    /// Trading pair on that connector (e.g., "BTC-USDT").
    pub trading_pair: String,
}

impl Venue {
    /// Create a new venue.
    pub fn new(connector: impl Into<String>, trading_pair: impl Into<String>) -> Self {
        Self {
            connector: connector.into(),
            trading_pair: trading_pair.into(),
        }
    }

    /// Base asset of the trading pair ("BTC" for "BTC-USDT").
    pub fn base_asset(&self) -> &str {
        split_trading_pair(&self.trading_pair).0
    }

    /// Quote asset of the trading pair ("USDT" for "BTC-USDT").
    pub fn quote_asset(&self) -> &str {
        split_trading_pair(&self.trading_pair).1
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.connector, self.trading_pair)
    }
}

/// Split "BASE-QUOTE" into its assets. A pair without a dash is all base.
pub fn split_trading_pair(pair: &str) -> (&str, &str) {
    pair.split_once('-').unwrap_or((pair, ""))
}

/// Size-dependent quote for one side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Average execution price for the requested amount (quote per base).
    pub price: Decimal,
    /// Fee rate charged on this side.
    pub fee: Decimal,
}

impl Quote {
    /// Create a new quote.
    pub fn new(price: Decimal, fee: Decimal) -> Self {
        Self { price, fee }
    }
}

/// Best prices currently available on a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopOfBook {
    /// Best price a seller receives.
    pub best_bid: Option<Decimal>,
    /// Best price a buyer pays.
    pub best_ask: Option<Decimal>,
}

impl TopOfBook {
    /// Mid price between best bid and ask.
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }
}
