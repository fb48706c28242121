//! Order types and candidates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order.
    #[strum(to_string = "BUY", serialize = "buy")]
    Buy,
    /// Sell order.
    #[strum(to_string = "SELL", serialize = "sell")]
    Sell,
}

impl Side {
    /// Check if this is the buy side.
    pub fn is_buy(&self) -> bool {
        matches!(self, Side::Buy)
    }
}

/// Order kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Executes immediately against resting liquidity.
    #[default]
    #[strum(to_string = "TAKER", serialize = "taker")]
    Taker,
    /// Rests on the book.
    #[strum(to_string = "MAKER", serialize = "maker")]
    Maker,
}

/// Protected order instruction for one leg of an arbitrage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderCandidate {
    /// Connector the order is routed to.
    pub connector: String,
    /// Trading pair to trade.
    pub trading_pair: String,
    /// Order side (buy/sell).
    pub side: Side,
    /// Order kind.
    pub order_type: OrderType,
    /// Base amount.
    pub amount: Decimal,
    /// Limit price including the slippage buffer.
    pub price: Decimal,
}

impl OrderCandidate {
    /// Create a new taker candidate.
    pub fn taker(
        connector: impl Into<String>,
        trading_pair: impl Into<String>,
        side: Side,
        amount: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            connector: connector.into(),
            trading_pair: trading_pair.into(),
            side,
            order_type: OrderType::Taker,
            amount,
            price,
        }
    }

    /// Whether the order would rest on the book.
    pub fn is_maker(&self) -> bool {
        matches!(self.order_type, OrderType::Maker)
    }

    /// Quote amount at the limit price.
    pub fn notional(&self) -> Decimal {
        self.amount * self.price
    }

    /// Validate order parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.connector.is_empty() {
            return Err("connector is required".to_string());
        }
        if self.trading_pair.is_empty() {
            return Err("trading_pair is required".to_string());
        }
        if self.price <= Decimal::ZERO {
            return Err("price must be positive".to_string());
        }
        if self.amount <= Decimal::ZERO {
            return Err("amount must be positive".to_string());
        }
        Ok(())
    }
}
