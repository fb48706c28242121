//! Decision cycle controller.
//!
//! Each cycle runs the direction selector, publishes the winning proposal and
//! submits protected orders when it clears the profitability threshold.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use super::candidates::generate_order_candidates;
use super::optimizer::Opportunity;
use super::selector::find_optimal_opportunity;
use crate::config::OptimizerConfig;
use crate::error::{BotError, QuoteError};
use crate::market::QuoteProvider;
use crate::metrics;
use crate::report::{profitability_msg, MarketSnapshot, StatusReport};
use crate::trading::{OrderCandidate, OrderExecutor};

/// Result of one decision cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Neither direction was profitable.
    NoOpportunity,
    /// The best proposal did not reach the minimum profitability.
    BelowThreshold(Opportunity),
    /// Orders were handed to the executor.
    Submitted {
        /// The executed proposal.
        opportunity: Opportunity,
        /// Candidates in proposal order.
        candidates: Vec<OrderCandidate>,
        /// Executor order ids, one per candidate.
        order_ids: Vec<String>,
    },
}

/// Controller statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ControllerStats {
    /// Cycles started.
    pub cycles: u64,
    /// Cycles that found a profitable proposal.
    pub opportunities_found: u64,
    /// Proposals submitted for execution.
    pub opportunities_executed: u64,
    /// Cycles aborted by a quote provider failure.
    pub cycles_aborted: u64,
}

#[derive(Debug, Default)]
struct StatsCounters {
    cycles: AtomicU64,
    opportunities_found: AtomicU64,
    opportunities_executed: AtomicU64,
    cycles_aborted: AtomicU64,
}

impl StatsCounters {
    fn snapshot(&self) -> ControllerStats {
        ControllerStats {
            cycles: self.cycles.load(Ordering::Relaxed),
            opportunities_found: self.opportunities_found.load(Ordering::Relaxed),
            opportunities_executed: self.opportunities_executed.load(Ordering::Relaxed),
            cycles_aborted: self.cycles_aborted.load(Ordering::Relaxed),
        }
    }
}

/// Two-venue arbitrage controller.
pub struct ArbController {
    market_1: Arc<dyn QuoteProvider>,
    market_2: Arc<dyn QuoteProvider>,
    executor: Arc<dyn OrderExecutor>,
    config: OptimizerConfig,
    last_proposal: RwLock<Option<Opportunity>>,
    stats: StatsCounters,
}

impl ArbController {
    /// Create a controller over two venues and an executor.
    pub fn new(
        market_1: Arc<dyn QuoteProvider>,
        market_2: Arc<dyn QuoteProvider>,
        executor: Arc<dyn OrderExecutor>,
        config: OptimizerConfig,
    ) -> Self {
        Self {
            market_1,
            market_2,
            executor,
            config,
            last_proposal: RwLock::new(None),
            stats: StatsCounters::default(),
        }
    }

    /// Optimizer settings in use.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Most recently published opportunity.
    pub async fn last_proposal(&self) -> Option<Opportunity> {
        self.last_proposal.read().await.clone()
    }

    /// Current statistics.
    pub fn stats(&self) -> ControllerStats {
        self.stats.snapshot()
    }

    /// Find and publish the best opportunity without executing it.
    ///
    /// The last-proposal slot is written only once both directions have been
    /// evaluated, and only when an opportunity exists.
    #[instrument(skip_all)]
    pub async fn evaluate(&self) -> Result<Option<Opportunity>, BotError> {
        self.stats.cycles.fetch_add(1, Ordering::Relaxed);
        metrics::inc_cycles();

        let best = match find_optimal_opportunity(
            self.market_1.as_ref(),
            self.market_2.as_ref(),
            &self.config,
        )
        .await
        {
            Ok(best) => best,
            Err(e) => {
                self.record_abort(&e);
                return Err(e.into());
            }
        };

        let Some(opportunity) = best else {
            debug!("No arbitrage opportunity");
            return Ok(None);
        };

        self.stats.opportunities_found.fetch_add(1, Ordering::Relaxed);
        metrics::inc_opportunities_detected();
        *self.last_proposal.write().await = Some(opportunity.clone());

        Ok(Some(opportunity))
    }

    /// Run one decision cycle.
    #[instrument(skip_all)]
    pub async fn determine_actions(&self) -> Result<CycleOutcome, BotError> {
        let _timer = metrics::timer_cycle();

        let Some(opportunity) = self.evaluate().await? else {
            return Ok(CycleOutcome::NoOpportunity);
        };

        if opportunity.profit_pct < self.config.min_profitability() {
            debug!(
                profit_pct = %opportunity.profit_pct,
                min_profitability = %self.config.min_profitability(),
                "Best proposal below threshold"
            );
            return Ok(CycleOutcome::BelowThreshold(opportunity));
        }

        info!(
            amount = %opportunity.proposal.amount(),
            buy = %opportunity.proposal.buy_side().venue,
            sell = %opportunity.proposal.sell_side().venue,
            profit_pct = %opportunity.profit_pct,
            "Found arbitrage opportunity"
        );

        let candidates = generate_order_candidates(&opportunity.proposal, &self.config).to_vec();

        let order_ids = match self.executor.submit(candidates.clone()).await {
            Ok(ids) => ids,
            Err(e) => {
                error!(error = %e, "Order submission failed");
                metrics::inc_orders_failed();
                return Err(e.into());
            }
        };

        self.stats.opportunities_executed.fetch_add(1, Ordering::Relaxed);
        metrics::inc_opportunities_executed();

        Ok(CycleOutcome::Submitted {
            opportunity,
            candidates,
            order_ids,
        })
    }

    fn record_abort(&self, err: &QuoteError) {
        warn!(error = %err, "Cycle aborted");
        self.stats.cycles_aborted.fetch_add(1, Ordering::Relaxed);
        metrics::inc_cycles_aborted();
        if let QuoteError::Unavailable { venue, .. } = err {
            metrics::inc_quote_failures(venue);
        }
    }

    /// Current prices on both venues. Venues that cannot be queried are
    /// reported without prices.
    pub async fn markets_snapshot(&self) -> Vec<MarketSnapshot> {
        join_all([&self.market_1, &self.market_2].map(|market| async move {
            let venue = market.venue();
            match market.top_of_book(&venue.trading_pair).await {
                Ok(top) => MarketSnapshot {
                    connector: venue.connector.clone(),
                    trading_pair: venue.trading_pair.clone(),
                    sell_price: top.best_bid,
                    buy_price: top.best_ask,
                    mid_price: top.mid_price(),
                },
                Err(e) => {
                    debug!(venue = %venue, error = %e, "No prices for report");
                    MarketSnapshot::unpriced(venue)
                }
            }
        }))
        .await
    }

    /// Build a status report.
    pub async fn status_report(&self) -> StatusReport {
        StatusReport {
            markets: self.markets_snapshot().await,
            balances: self.executor.balances(),
            active_orders: self.executor.active_orders(),
            last_proposal: self.last_proposal().await.as_ref().map(profitability_msg),
            generated_at: time::OffsetDateTime::now_utc(),
        }
    }
}
