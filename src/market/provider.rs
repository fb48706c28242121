//! Quote provider capability consumed by the optimizer.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::types::{Quote, TopOfBook, Venue};
use crate::error::QuoteError;

/// A venue able to quote size-dependent buy and sell prices.
///
/// Implementations report `InsufficientLiquidity` when the requested amount
/// cannot be filled and `Unavailable` on connectivity failures. Timeouts are
/// the implementation's concern.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Venue this provider quotes.
    fn venue(&self) -> &Venue;

    /// Average price and fee to buy `amount` of the base asset.
    async fn quote_buy(&self, trading_pair: &str, amount: Decimal) -> Result<Quote, QuoteError>;

    /// Average price and fee received for selling `amount` of the base asset.
    async fn quote_sell(&self, trading_pair: &str, amount: Decimal) -> Result<Quote, QuoteError>;

    /// Current best bid and ask, used for reporting.
    async fn top_of_book(&self, trading_pair: &str) -> Result<TopOfBook, QuoteError>;
}
