//! Arbitrage proposals and their profitability.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::trace;

use crate::error::QuoteError;
use crate::market::{Quote, QuoteProvider, Venue};
use crate::trading::Side;

/// One leg of an arbitrage proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposalSide {
    /// Venue the leg trades on.
    pub venue: Venue,
    /// Buy or sell.
    pub side: Side,
    /// Base amount.
    pub amount: Decimal,
    /// Quoted average execution price for `amount`.
    pub price: Decimal,
    /// Fee rate on this leg.
    pub fee: Decimal,
}

impl ProposalSide {
    /// Build a leg from a venue quote, checking the quote is usable.
    pub fn from_quote(venue: &Venue, side: Side, amount: Decimal, quote: Quote) -> Result<Self, QuoteError> {
        let invalid = |reason: String| QuoteError::InvalidQuote {
            venue: venue.connector.clone(),
            reason,
        };

        if amount <= Decimal::ZERO {
            return Err(invalid(format!("non-positive amount {}", amount)));
        }
        if quote.price <= Decimal::ZERO {
            return Err(invalid(format!("non-positive {} price {}", side, quote.price)));
        }
        if quote.fee < Decimal::ZERO || quote.fee >= Decimal::ONE {
            return Err(invalid(format!("fee {} outside [0, 1)", quote.fee)));
        }

        Ok(Self {
            venue: venue.clone(),
            side,
            amount,
            price: quote.price,
            fee: quote.fee,
        })
    }

    /// Check if this is the buy leg.
    pub fn is_buy(&self) -> bool {
        self.side.is_buy()
    }
}

/// Matched buy and sell of the same base amount on two venues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArbProposal {
    /// First leg (the buy, as built by [`build_proposal`]).
    pub first_side: ProposalSide,
    /// Second leg.
    pub second_side: ProposalSide,
}

impl ArbProposal {
    /// Pair two legs. Returns `None` unless they are one buy and one sell of
    /// the same amount on different venues.
    pub fn new(first_side: ProposalSide, second_side: ProposalSide) -> Option<Self> {
        let valid = first_side.side != second_side.side
            && first_side.amount == second_side.amount
            && first_side.venue != second_side.venue;

        valid.then_some(Self {
            first_side,
            second_side,
        })
    }

    /// Base amount traded on each leg.
    pub fn amount(&self) -> Decimal {
        self.first_side.amount
    }

    /// The buying leg.
    pub fn buy_side(&self) -> &ProposalSide {
        if self.first_side.is_buy() {
            &self.first_side
        } else {
            &self.second_side
        }
    }

    /// The selling leg.
    pub fn sell_side(&self) -> &ProposalSide {
        if self.first_side.is_buy() {
            &self.second_side
        } else {
            &self.first_side
        }
    }

    /// Both legs in order.
    pub fn sides(&self) -> [&ProposalSide; 2] {
        [&self.first_side, &self.second_side]
    }

    /// Net return of the round trip: `proceeds / outlay - 1`.
    ///
    /// With `account_for_fee` the buy outlay grows by the buy fee and the sell
    /// proceeds shrink by the sell fee, so the result never exceeds the
    /// fee-less figure. Both legs carry the same amount, so it cancels and the
    /// ratio is taken over unit prices; equal prices give equal results at
    /// every size.
    pub fn profit_pct(&self, account_for_fee: bool) -> Decimal {
        let buy = self.buy_side();
        let sell = self.sell_side();

        let (buy_fee, sell_fee) = if account_for_fee {
            (buy.fee, sell.fee)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        let outlay = buy.price * (Decimal::ONE + buy_fee);
        let proceeds = sell.price * (Decimal::ONE - sell_fee);

        proceeds / outlay - Decimal::ONE
    }
}

/// Quote both venues for `amount` and pair the results into a proposal that
/// buys on `buy_market` and sells on `sell_market`.
pub async fn build_proposal(
    buy_market: &dyn QuoteProvider,
    sell_market: &dyn QuoteProvider,
    amount: Decimal,
) -> Result<ArbProposal, QuoteError> {
    let buy_venue = buy_market.venue();
    let sell_venue = sell_market.venue();

    let buy_quote = buy_market.quote_buy(&buy_venue.trading_pair, amount).await?;
    let sell_quote = sell_market.quote_sell(&sell_venue.trading_pair, amount).await?;

    trace!(
        %amount,
        buy_price = %buy_quote.price,
        sell_price = %sell_quote.price,
        "Quoted sample"
    );

    let first = ProposalSide::from_quote(buy_venue, Side::Buy, amount, buy_quote)?;
    let second = ProposalSide::from_quote(sell_venue, Side::Sell, amount, sell_quote)?;

    ArbProposal::new(first, second).ok_or_else(|| QuoteError::InvalidQuote {
        venue: buy_venue.connector.clone(),
        reason: format!("cannot pair {} with itself", buy_venue),
    })
}
