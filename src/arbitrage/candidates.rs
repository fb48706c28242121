//! Conversion of a winning proposal into protected order candidates.

use rust_decimal::Decimal;

use super::proposal::{ArbProposal, ProposalSide};
use crate::config::OptimizerConfig;
use crate::trading::{OrderCandidate, Side};

/// Limit price for `side` after applying `buffer`.
///
/// Buys are allowed to pay up to `buffer` more than quoted, sells to receive
/// up to `buffer` less. A sell buffer of 1 or more floors the price at zero,
/// which the executor then refuses.
pub fn buffered_price(quoted: Decimal, side: Side, buffer: Decimal) -> Decimal {
    let adjustment = match side {
        Side::Buy => Decimal::ONE + buffer,
        Side::Sell => Decimal::ONE - buffer,
    };
    (quoted * adjustment).max(Decimal::ZERO)
}

/// Taker candidate for one proposal leg, using its venue's slippage buffer.
pub fn create_order_candidate(side: &ProposalSide, config: &OptimizerConfig) -> OrderCandidate {
    let buffer = config.slippage_buffer(&side.venue.connector);

    OrderCandidate::taker(
        side.venue.connector.clone(),
        side.venue.trading_pair.clone(),
        side.side,
        side.amount,
        buffered_price(side.price, side.side, buffer),
    )
}

/// One taker candidate per leg, in proposal order.
pub fn generate_order_candidates(proposal: &ArbProposal, config: &OptimizerConfig) -> [OrderCandidate; 2] {
    proposal.sides().map(|side| create_order_candidate(side, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::market::Venue;
    use crate::trading::OrderType;
    use rust_decimal_macros::dec;

    fn config() -> OptimizerConfig {
        Config {
            market_1_slippage_buffer: dec!(0.01),
            market_2_slippage_buffer: dec!(0.02),
            ..Config::default()
        }
        .validate()
        .unwrap()
    }

    fn proposal() -> ArbProposal {
        ArbProposal::new(
            ProposalSide {
                venue: Venue::new("uniswap_v2", "WBTC-WETH"),
                side: Side::Buy,
                amount: dec!(0.5),
                price: dec!(100),
                fee: dec!(0.003),
            },
            ProposalSide {
                venue: Venue::new("binance", "BTC-USDT"),
                side: Side::Sell,
                amount: dec!(0.5),
                price: dec!(102),
                fee: dec!(0.001),
            },
        )
        .unwrap()
    }

    #[test]
    fn buffered_price_protects_each_side() {
        assert_eq!(buffered_price(dec!(100), Side::Buy, dec!(0.01)), dec!(101));
        assert_eq!(buffered_price(dec!(100), Side::Sell, dec!(0.01)), dec!(99));
        assert_eq!(buffered_price(dec!(100), Side::Buy, dec!(0)), dec!(100));
    }

    #[test]
    fn oversized_buffer_floors_sell_price_at_zero() {
        assert_eq!(buffered_price(dec!(100), Side::Sell, dec!(1.5)), dec!(0));
        assert_eq!(buffered_price(dec!(100), Side::Buy, dec!(1.5)), dec!(250));
    }

    #[test]
    fn candidates_use_per_venue_buffers() {
        let [buy, sell] = generate_order_candidates(&proposal(), &config());

        assert_eq!(buy.connector, "uniswap_v2");
        assert_eq!(buy.trading_pair, "WBTC-WETH");
        assert_eq!(buy.side, Side::Buy);
        assert_eq!(buy.amount, dec!(0.5));
        assert_eq!(buy.price, dec!(102)); // 100 * 1.02

        assert_eq!(sell.connector, "binance");
        assert_eq!(sell.trading_pair, "BTC-USDT");
        assert_eq!(sell.side, Side::Sell);
        assert_eq!(sell.amount, dec!(0.5));
        assert_eq!(sell.price, dec!(100.98)); // 102 * 0.99
    }

    #[test]
    fn candidates_are_takers() {
        let candidates = generate_order_candidates(&proposal(), &config());
        assert!(candidates.iter().all(|c| c.order_type == OrderType::Taker && !c.is_maker()));
    }
}
