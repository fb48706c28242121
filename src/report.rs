//! Read-only status reporting.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;

use crate::arbitrage::Opportunity;
use crate::market::Venue;
use crate::trading::{ActiveOrder, AssetBalance};

/// Prices of one venue at report time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketSnapshot {
    /// Connector name.
    pub connector: String,
    /// Trading pair.
    pub trading_pair: String,
    /// Price a sell would receive (best bid).
    pub sell_price: Option<Decimal>,
    /// Price a buy would pay (best ask).
    pub buy_price: Option<Decimal>,
    /// Midpoint of the two.
    pub mid_price: Option<Decimal>,
}

impl MarketSnapshot {
    /// Snapshot with no prices, for venues that could not be queried.
    pub fn unpriced(venue: &Venue) -> Self {
        Self {
            connector: venue.connector.clone(),
            trading_pair: venue.trading_pair.clone(),
            sell_price: None,
            buy_price: None,
            mid_price: None,
        }
    }
}

/// Point-in-time view of the engine for operators.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Per-venue prices.
    pub markets: Vec<MarketSnapshot>,
    /// Asset balances.
    pub balances: Vec<AssetBalance>,
    /// Orders not yet completed.
    pub active_orders: Vec<ActiveOrder>,
    /// Summary of the last published proposal.
    pub last_proposal: Option<String>,
    /// Report time.
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
}

/// One-line summary of an opportunity.
pub fn profitability_msg(opportunity: &Opportunity) -> String {
    let pct = (opportunity.profit_pct * Decimal::ONE_HUNDRED).round_dp(2);
    format!(
        "Last Optimal Proposal: Size {:.6}, Profitability: {:.2}%",
        opportunity.proposal.amount(),
        pct
    )
}

fn price(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |p| p.normalize().to_string())
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Markets")?;
        writeln!(
            f,
            "  {:<12} {:<12} {:>16} {:>16} {:>16}",
            "Exchange", "Market", "Sell Price", "Buy Price", "Mid Price"
        )?;
        for m in &self.markets {
            writeln!(
                f,
                "  {:<12} {:<12} {:>16} {:>16} {:>16}",
                m.connector,
                m.trading_pair,
                price(m.sell_price),
                price(m.buy_price),
                price(m.mid_price)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "# Assets")?;
        if self.balances.is_empty() {
            writeln!(f, "  No balances.")?;
        }
        for b in &self.balances {
            writeln!(f, "  {:<12} {:<8} {:>20}", b.connector, b.asset, b.amount.normalize())?;
        }

        writeln!(f)?;
        writeln!(f, "# Active Orders")?;
        if self.active_orders.is_empty() {
            writeln!(f, "  No active orders.")?;
        }
        for o in &self.active_orders {
            let c = &o.candidate;
            writeln!(
                f,
                "  {:<12} {:<12} {:<4} {:>14} {:>16}",
                c.connector,
                c.trading_pair,
                c.side,
                c.amount.normalize(),
                c.price.normalize()
            )?;
        }

        writeln!(f)?;
        writeln!(f, "# Profitability")?;
        match &self.last_proposal {
            Some(msg) => write!(f, "  - {}", msg),
            None => write!(f, "  No arbitrage opportunities found yet."),
        }
    }
}
