//! Order execution collaborator.
//!
//! The engine hands order candidates to an [`OrderExecutor`] and never looks
//! back: completions arrive on a channel and are only logged and counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::balance::{AssetBalance, Balances};
use super::order::{OrderCandidate, Side};
use crate::error::TradingError;
use crate::market::Venue;
use crate::metrics;

/// Order accepted by an executor and not yet completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveOrder {
    /// Executor-assigned order id.
    pub order_id: String,
    /// The submitted candidate.
    pub candidate: OrderCandidate,
    /// Submission time.
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}

/// Notification that an order has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderCompleted {
    /// Executor-assigned order id.
    pub order_id: String,
    /// Connector the order filled on.
    pub connector: String,
    /// Trading pair.
    pub trading_pair: String,
    /// Order side.
    pub side: Side,
    /// Filled base amount.
    pub amount: Decimal,
    /// Fill price.
    pub price: Decimal,
}

/// Accepts order candidates and reports on them.
#[async_trait]
pub trait OrderExecutor: Send + Sync {
    /// Submit candidates in order, returning one order id per candidate.
    async fn submit(&self, candidates: Vec<OrderCandidate>) -> Result<Vec<String>, TradingError>;

    /// Orders submitted but not yet completed.
    fn active_orders(&self) -> Vec<ActiveOrder>;

    /// Current asset balances.
    fn balances(&self) -> Vec<AssetBalance>;
}

/// Simulated executor: every order fills at its limit price after a delay.
#[derive(Debug)]
pub struct DryRunExecutor {
    orders: Arc<DashMap<String, ActiveOrder>>,
    balances: Arc<Balances>,
    next_id: AtomicU64,
    fill_delay: Duration,
    events: mpsc::UnboundedSender<OrderCompleted>,
}

impl DryRunExecutor {
    /// Create an executor and the receiver its completions are sent to.
    pub fn new(fill_delay: Duration) -> (Self, mpsc::UnboundedReceiver<OrderCompleted>) {
        let (events, rx) = mpsc::unbounded_channel();
        let executor = Self {
            orders: Arc::new(DashMap::new()),
            balances: Arc::new(Balances::new()),
            next_id: AtomicU64::new(1),
            fill_delay,
            events,
        };
        (executor, rx)
    }

    /// Seed starting balances for a venue's base and quote assets.
    pub fn fund(&self, venue: &Venue, base: Decimal, quote: Decimal) {
        self.balances.set(&venue.connector, venue.base_asset(), base);
        self.balances.set(&venue.connector, venue.quote_asset(), quote);
    }

    fn next_order_id(&self) -> String {
        format!("dry-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn spawn_fill(&self, order_id: String) {
        let orders = Arc::clone(&self.orders);
        let balances = Arc::clone(&self.balances);
        let events = self.events.clone();
        let delay = self.fill_delay;

        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let Some((_, order)) = orders.remove(&order_id) else {
                return;
            };
            let c = order.candidate;
            balances.apply_fill(&c.connector, &c.trading_pair, c.side, c.amount, c.price);
            metrics::inc_orders_filled();

            let completed = OrderCompleted {
                order_id,
                connector: c.connector,
                trading_pair: c.trading_pair,
                side: c.side,
                amount: c.amount,
                price: c.price,
            };
            if events.send(completed).is_err() {
                debug!("Completion receiver dropped");
            }
        });
    }
}

#[async_trait]
impl OrderExecutor for DryRunExecutor {
    #[instrument(skip_all, fields(orders = candidates.len()))]
    async fn submit(&self, candidates: Vec<OrderCandidate>) -> Result<Vec<String>, TradingError> {
        // Reject the whole batch before any leg is accepted.
        for candidate in &candidates {
            candidate.validate().map_err(TradingError::InvalidParams)?;
            self.balances.check_funds(candidate)?;
        }

        let mut ids = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let order_id = self.next_order_id();
            info!(
                order_id = %order_id,
                connector = %candidate.connector,
                trading_pair = %candidate.trading_pair,
                side = %candidate.side,
                amount = %candidate.amount,
                price = %candidate.price,
                "SIMULATED order submitted"
            );
            metrics::inc_orders_submitted();

            self.orders.insert(
                order_id.clone(),
                ActiveOrder {
                    order_id: order_id.clone(),
                    candidate,
                    submitted_at: OffsetDateTime::now_utc(),
                },
            );
            self.spawn_fill(order_id.clone());
            ids.push(order_id);
        }

        Ok(ids)
    }

    fn active_orders(&self) -> Vec<ActiveOrder> {
        let mut orders: Vec<ActiveOrder> = self.orders.iter().map(|e| e.value().clone()).collect();
        orders.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at).then(a.order_id.cmp(&b.order_id)));
        orders
    }

    fn balances(&self) -> Vec<AssetBalance> {
        self.balances.snapshot()
    }
}

/// Log completions until the executor is dropped.
pub async fn log_completions(mut rx: mpsc::UnboundedReceiver<OrderCompleted>) {
    while let Some(event) = rx.recv().await {
        match event.side {
            Side::Buy => info!(
                order_id = %event.order_id,
                connector = %event.connector,
                amount = %event.amount,
                price = %event.price,
                "Buy order completed"
            ),
            Side::Sell => info!(
                order_id = %event.order_id,
                connector = %event.connector,
                amount = %event.amount,
                price = %event.price,
                "Sell order completed"
            ),
        }
    }
    warn!("Order completion channel closed");
}
