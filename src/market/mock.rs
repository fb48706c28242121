//! Mock quote provider for unit testing.
//!
//! Prices are scripted as functions of the requested amount so tests can shape
//! arbitrary size-to-price curves without building order books.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::provider::QuoteProvider;
use super::types::{Quote, TopOfBook, Venue};
use crate::error::QuoteError;

/// Price curve: amount to price, `None` when the amount cannot be filled.
pub type PriceCurve = Arc<dyn Fn(Decimal) -> Option<Decimal> + Send + Sync>;

/// Configuration for mock provider behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Fee rate charged on buys.
    pub buy_fee: Decimal,
    /// Fee rate charged on sells.
    pub sell_fee: Decimal,
}

/// Mock quote provider for testing.
#[derive(Clone)]
pub struct MockQuoteProvider {
    venue: Venue,
    config: MockConfig,
    buy_curve: PriceCurve,
    sell_curve: PriceCurve,
    unavailable: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl fmt::Debug for MockQuoteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockQuoteProvider")
            .field("venue", &self.venue)
            .field("config", &self.config)
            .field("calls", &self.calls())
            .finish()
    }
}

impl MockQuoteProvider {
    /// Provider quoting the same buy and sell price for every amount.
    pub fn flat(venue: Venue, buy_price: Decimal, sell_price: Decimal) -> Self {
        Self {
            venue,
            config: MockConfig::default(),
            buy_curve: Arc::new(move |_| Some(buy_price)),
            sell_curve: Arc::new(move |_| Some(sell_price)),
            unavailable: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the buy-side price curve.
    pub fn with_buy_curve<F>(mut self, curve: F) -> Self
    where
        F: Fn(Decimal) -> Option<Decimal> + Send + Sync + 'static,
    {
        self.buy_curve = Arc::new(curve);
        self
    }

    /// Set the sell-side price curve.
    pub fn with_sell_curve<F>(mut self, curve: F) -> Self
    where
        F: Fn(Decimal) -> Option<Decimal> + Send + Sync + 'static,
    {
        self.sell_curve = Arc::new(curve);
        self
    }

    /// Charge the same fee on both sides.
    pub fn with_fee(mut self, fee: Decimal) -> Self {
        self.config.buy_fee = fee;
        self.config.sell_fee = fee;
        self
    }

    /// Replace the mock configuration.
    pub fn with_config(mut self, config: MockConfig) -> Self {
        self.config = config;
        self
    }

    /// Make every subsequent call fail as unavailable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of quote calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn quote(&self, curve: &PriceCurve, fee: Decimal, amount: Decimal) -> Result<Quote, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(QuoteError::Unavailable {
                venue: self.venue.connector.clone(),
                reason: "Mock connectivity failure".to_string(),
            });
        }

        match curve(amount) {
            Some(price) => Ok(Quote::new(price, fee)),
            None => Err(QuoteError::InsufficientLiquidity {
                venue: self.venue.connector.clone(),
                required: amount,
                available: Decimal::ZERO,
            }),
        }
    }
}

#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    fn venue(&self) -> &Venue {
        &self.venue
    }

    async fn quote_buy(&self, _trading_pair: &str, amount: Decimal) -> Result<Quote, QuoteError> {
        self.quote(&self.buy_curve, self.config.buy_fee, amount).await
    }

    async fn quote_sell(&self, _trading_pair: &str, amount: Decimal) -> Result<Quote, QuoteError> {
        self.quote(&self.sell_curve, self.config.sell_fee, amount).await
    }

    async fn top_of_book(&self, _trading_pair: &str) -> Result<TopOfBook, QuoteError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(QuoteError::Unavailable {
                venue: self.venue.connector.clone(),
                reason: "Mock connectivity failure".to_string(),
            });
        }

        let smallest = Decimal::new(1, 8);
        Ok(TopOfBook {
            best_bid: (self.sell_curve)(smallest),
            best_ask: (self.buy_curve)(smallest),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn flat_provider_quotes_constant_prices() {
        let mock = MockQuoteProvider::flat(Venue::new("binance", "BTC-USDT"), dec!(100), dec!(99))
            .with_fee(dec!(0.001));

        let buy = mock.quote_buy("BTC-USDT", dec!(5)).await.unwrap();
        let sell = mock.quote_sell("BTC-USDT", dec!(5)).await.unwrap();

        assert_eq!(buy, Quote::new(dec!(100), dec!(0.001)));
        assert_eq!(sell, Quote::new(dec!(99), dec!(0.001)));
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn curve_returning_none_is_insufficient_liquidity() {
        let mock = MockQuoteProvider::flat(Venue::new("binance", "BTC-USDT"), dec!(100), dec!(99))
            .with_buy_curve(|amount| (amount <= dec!(1)).then_some(dec!(100)));

        assert!(mock.quote_buy("BTC-USDT", dec!(1)).await.is_ok());
        let err = mock.quote_buy("BTC-USDT", dec!(2)).await.unwrap_err();
        assert!(matches!(err, QuoteError::InsufficientLiquidity { .. }));
    }

    #[tokio::test]
    async fn mock_failure_mode() {
        let mock = MockQuoteProvider::flat(Venue::new("binance", "BTC-USDT"), dec!(100), dec!(99));
        mock.set_unavailable(true);

        let err = mock.quote_sell("BTC-USDT", dec!(1)).await.unwrap_err();
        assert!(matches!(err, QuoteError::Unavailable { .. }));
        assert!(mock.top_of_book("BTC-USDT").await.is_err());
    }

    #[tokio::test]
    async fn clones_share_call_counter() {
        let mock = MockQuoteProvider::flat(Venue::new("binance", "BTC-USDT"), dec!(100), dec!(99));
        let clone = mock.clone();

        clone.quote_buy("BTC-USDT", dec!(1)).await.unwrap();
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn config_sets_per_side_fees() {
        let mock = MockQuoteProvider::flat(Venue::new("binance", "BTC-USDT"), dec!(100), dec!(99))
            .with_config(MockConfig {
                buy_fee: dec!(0.001),
                sell_fee: dec!(0.002),
            });

        assert_eq!(mock.quote_buy("BTC-USDT", dec!(1)).await.unwrap().fee, dec!(0.001));
        assert_eq!(mock.quote_sell("BTC-USDT", dec!(1)).await.unwrap().fee, dec!(0.002));
    }
}
