//! Direction selection between the two venues.

use tracing::{debug, instrument};

use super::optimizer::{find_best_size_for_direction, Opportunity};
use crate::config::OptimizerConfig;
use crate::error::QuoteError;
use crate::market::QuoteProvider;

/// Pick between buy-on-1/sell-on-2 (`opp1`) and buy-on-2/sell-on-1 (`opp2`).
///
/// `opp1` wins only when strictly more profitable; an exact tie goes to `opp2`.
pub fn select_better(opp1: Option<Opportunity>, opp2: Option<Opportunity>) -> Option<Opportunity> {
    match (opp1, opp2) {
        (Some(opp1), Some(opp2)) => {
            if opp1.profit_pct > opp2.profit_pct {
                Some(opp1)
            } else {
                Some(opp2)
            }
        }
        (opp1, opp2) => opp1.or(opp2),
    }
}

/// Run the size sweep in both directions and return the better opportunity.
///
/// Both sweeps run concurrently and must both finish before a winner is
/// chosen; a connectivity failure in either aborts the selection.
#[instrument(skip_all)]
pub async fn find_optimal_opportunity(
    market_1: &dyn QuoteProvider,
    market_2: &dyn QuoteProvider,
    config: &OptimizerConfig,
) -> Result<Option<Opportunity>, QuoteError> {
    let (opp1, opp2) = tokio::try_join!(
        find_best_size_for_direction(market_1, market_2, config),
        find_best_size_for_direction(market_2, market_1, config),
    )?;

    debug!(
        direction_1 = ?opp1.as_ref().map(|o| o.profit_pct),
        direction_2 = ?opp2.as_ref().map(|o| o.profit_pct),
        "Directional sweeps complete"
    );

    Ok(select_better(opp1, opp2))
}
