//! Order-book backed quote provider.
//!
//! Quotes are produced by walking an L2 snapshot: a buy consumes asks from the
//! best price upward, a sell consumes bids from the best price downward, and
//! the quoted price is the volume-weighted average over the levels consumed.
//! Snapshots are replaced wholesale each cycle so every decision sees fresh
//! quotes.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::provider::QuoteProvider;
use super::types::{Quote, TopOfBook, Venue};
use crate::error::{BotError, QuoteError};

/// Single price level in an order book.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceLevel {
    /// Price at this level.
    pub price: Decimal,
    /// Total base amount available at this price.
    pub size: Decimal,
}

impl PriceLevel {
    /// Create a new price level.
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }
}

/// L2 order book snapshot for one venue.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderBook {
    /// Bid levels sorted by price descending.
    #[serde(default)]
    pub bids: Vec<PriceLevel>,
    /// Ask levels sorted by price ascending.
    #[serde(default)]
    pub asks: Vec<PriceLevel>,
    /// Taker fee rate charged by the venue.
    #[serde(default)]
    pub fee_rate: Decimal,
}

impl OrderBook {
    /// Sort both sides best-first and drop empty levels.
    pub fn normalized(mut self) -> Self {
        self.bids.retain(|l| l.size > Decimal::ZERO);
        self.asks.retain(|l| l.size > Decimal::ZERO);
        self.bids.sort_by(|a, b| b.price.cmp(&a.price));
        self.asks.sort_by(|a, b| a.price.cmp(&b.price));
        self
    }

    /// Get the best bid price.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|l| l.price)
    }

    /// Get the best ask price.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|l| l.price)
    }
}

/// Walk `levels` (already sorted best-first) to fill `target_size` and return
/// the volume-weighted average price.
///
/// The average is measured as a premium over the best level, so a fill that
/// stays inside it quotes exactly that level's price at any size. Returns the
/// amount that could be filled as `Err` when the book is too thin.
pub fn walk_levels(levels: &[PriceLevel], target_size: Decimal) -> Result<Decimal, Decimal> {
    let Some(best) = levels.first() else {
        return Err(Decimal::ZERO);
    };

    let mut remaining = target_size;
    let mut premium = Decimal::ZERO;

    for level in levels {
        if remaining.is_zero() {
            break;
        }

        let fill_size = remaining.min(level.size);
        premium += fill_size * (level.price - best.price);
        remaining -= fill_size;
    }

    if !remaining.is_zero() {
        return Err(target_size - remaining);
    }

    if premium.is_zero() {
        return Ok(best.price);
    }
    Ok(best.price + premium / target_size)
}

/// Quote provider backed by a replaceable order book snapshot.
#[derive(Debug)]
pub struct BookQuoteProvider {
    venue: Venue,
    book: RwLock<Option<OrderBook>>,
}

impl BookQuoteProvider {
    /// Create a provider with no snapshot yet; quotes fail as unavailable until one arrives.
    pub fn new(venue: Venue) -> Self {
        Self {
            venue,
            book: RwLock::new(None),
        }
    }

    /// Create a provider with an initial snapshot.
    pub fn with_book(venue: Venue, book: OrderBook) -> Self {
        Self {
            venue,
            book: RwLock::new(Some(book.normalized())),
        }
    }

    /// Replace the current snapshot.
    pub async fn update(&self, book: OrderBook) {
        *self.book.write().await = Some(book.normalized());
    }

    /// Drop the current snapshot, making the venue unavailable.
    pub async fn clear(&self) {
        *self.book.write().await = None;
    }

    /// Take this venue's book from `books`, or clear the snapshot when the
    /// set has none for its connector and trading pair. Returns whether a
    /// book was found.
    pub async fn refresh_from(&self, books: &BookSet) -> bool {
        let book = books
            .get(&self.venue.connector)
            .and_then(|pairs| pairs.get(&self.venue.trading_pair));

        match book {
            Some(book) => {
                self.update(book.clone()).await;
                true
            }
            None => {
                self.clear().await;
                false
            }
        }
    }

    /// Run `f` against the current snapshot under the read lock.
    async fn read_book<T>(
        &self,
        trading_pair: &str,
        f: impl FnOnce(&OrderBook) -> Result<T, QuoteError>,
    ) -> Result<T, QuoteError> {
        if trading_pair != self.venue.trading_pair {
            return Err(QuoteError::Unavailable {
                venue: self.venue.connector.clone(),
                reason: format!("{} is not quoted here", trading_pair),
            });
        }

        let guard = self.book.read().await;
        let book = guard.as_ref().ok_or_else(|| QuoteError::Unavailable {
            venue: self.venue.connector.clone(),
            reason: "no order book snapshot".to_string(),
        })?;
        f(book)
    }

    fn fill(&self, levels: &[PriceLevel], amount: Decimal, fee: Decimal) -> Result<Quote, QuoteError> {
        if amount <= Decimal::ZERO {
            return Err(QuoteError::InvalidQuote {
                venue: self.venue.connector.clone(),
                reason: format!("non-positive amount {}", amount),
            });
        }

        match walk_levels(levels, amount) {
            Ok(vwap) => Ok(Quote::new(vwap, fee)),
            Err(available) => Err(QuoteError::InsufficientLiquidity {
                venue: self.venue.connector.clone(),
                required: amount,
                available,
            }),
        }
    }
}

#[async_trait]
impl QuoteProvider for BookQuoteProvider {
    fn venue(&self) -> &Venue {
        &self.venue
    }

    #[instrument(skip(self), fields(venue = %self.venue.connector))]
    async fn quote_buy(&self, trading_pair: &str, amount: Decimal) -> Result<Quote, QuoteError> {
        let quote = self
            .read_book(trading_pair, |book| self.fill(&book.asks, amount, book.fee_rate))
            .await?;
        debug!(price = %quote.price, "Buy quote");
        Ok(quote)
    }

    #[instrument(skip(self), fields(venue = %self.venue.connector))]
    async fn quote_sell(&self, trading_pair: &str, amount: Decimal) -> Result<Quote, QuoteError> {
        let quote = self
            .read_book(trading_pair, |book| self.fill(&book.bids, amount, book.fee_rate))
            .await?;
        debug!(price = %quote.price, "Sell quote");
        Ok(quote)
    }

    async fn top_of_book(&self, trading_pair: &str) -> Result<TopOfBook, QuoteError> {
        self.read_book(trading_pair, |book| {
            Ok(TopOfBook {
                best_bid: book.best_bid(),
                best_ask: book.best_ask(),
            })
        })
        .await
    }
}

/// Order book snapshots keyed by connector, then trading pair, as stored in
/// a books file.
pub type BookSet = HashMap<String, HashMap<String, OrderBook>>;

/// Read a books file.
///
/// ```json
/// {
///   "binance": {
///     "BTC-USDT": { "fee_rate": "0.001", "bids": [{"price": "100", "size": "2"}], "asks": [...] },
///     "BTC-BUSD": { "fee_rate": "0.001", "bids": [...], "asks": [...] }
///   },
///   "uniswap_v2": {
///     "WBTC-WETH": { "fee_rate": "0.003", "bids": [...], "asks": [...] }
///   }
/// }
/// ```
pub async fn load_books(path: impl AsRef<Path>) -> Result<BookSet, BotError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}
