//! Trade size sweep for one arbitrage direction.
//!
//! The sweep samples a fixed number of evenly spaced sizes between the
//! configured bounds and keeps the most profitable one. It is a bounded
//! approximation of the optimal size: venues with arbitrary depth give no
//! guarantee that profitability is unimodal in size, so no finer search is
//! attempted on top of it.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::proposal::{build_proposal, ArbProposal};
use crate::config::OptimizerConfig;
use crate::error::QuoteError;
use crate::market::QuoteProvider;
use crate::metrics;

/// A proposal together with its fee-aware profitability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Opportunity {
    /// Best proposal found.
    pub proposal: ArbProposal,
    /// Net profitability of the proposal, fees included.
    pub profit_pct: Decimal,
}

/// Evenly spaced sizes from `min` to `max`, both included.
///
/// The last sample is pinned to `max` so decimal rounding in the step never
/// leaves the upper bound unvisited. Fewer than two steps yields just `min`.
pub fn sweep_amounts(min: Decimal, max: Decimal, steps: usize) -> Vec<Decimal> {
    if steps < 2 {
        return vec![min];
    }

    let step = (max - min) / Decimal::from(steps - 1);
    let mut amounts: Vec<Decimal> = (0..steps - 1)
        .map(|i| min + Decimal::from(i) * step)
        .collect();
    amounts.push(max);
    amounts
}

/// Find the most profitable size for buying on `buy_market` and selling on
/// `sell_market`.
///
/// Samples the venues cannot fill are skipped. A connectivity failure aborts
/// the sweep. The first sample reaching the maximum wins, so ties go to the
/// smaller size. Returns `None` unless the best profitability is positive.
#[instrument(
    skip_all,
    fields(buy = %buy_market.venue().connector, sell = %sell_market.venue().connector)
)]
pub async fn find_best_size_for_direction(
    buy_market: &dyn QuoteProvider,
    sell_market: &dyn QuoteProvider,
    config: &OptimizerConfig,
) -> Result<Option<Opportunity>, QuoteError> {
    let amounts = sweep_amounts(
        config.min_order_amount(),
        config.max_order_amount(),
        config.sweep_steps(),
    );

    let mut best: Option<Opportunity> = None;

    for amount in amounts {
        let proposal = match build_proposal(buy_market, sell_market, amount).await {
            Ok(p) => p,
            Err(e) if e.is_sample_local() => {
                debug!(%amount, error = %e, "Skipping sample");
                metrics::inc_samples_skipped();
                continue;
            }
            Err(e) => {
                warn!(%amount, error = %e, "Quote provider failed, aborting sweep");
                return Err(e);
            }
        };

        let profit_pct = proposal.profit_pct(true);
        if best.as_ref().map_or(true, |b| profit_pct > b.profit_pct) {
            best = Some(Opportunity {
                proposal,
                profit_pct,
            });
        }
    }

    match best {
        Some(opp) if opp.profit_pct > Decimal::ZERO => {
            debug!(
                amount = %opp.proposal.amount(),
                profit_pct = %opp.profit_pct,
                "Best size for direction"
            );
            Ok(Some(opp))
        }
        _ => Ok(None),
    }
}
