//! Property tests for profitability, pricing and selection invariants.

use amm_arb::arbitrage::{buffered_price, select_better, sweep_amounts, ArbProposal, Opportunity, ProposalSide};
use amm_arb::config::Config;
use amm_arb::error::ConfigError;
use amm_arb::market::Venue;
use amm_arb::trading::Side;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Positive price with two decimals in (0, 100000].
fn price() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000_000).prop_map(|n| Decimal::new(n, 2))
}

/// Fraction in [0, 0.1) with four decimals.
fn fee() -> impl Strategy<Value = Decimal> {
    (0i64..1_000).prop_map(|n| Decimal::new(n, 4))
}

/// Buffer in [0, 2) with four decimals.
fn buffer() -> impl Strategy<Value = Decimal> {
    (0i64..20_000).prop_map(|n| Decimal::new(n, 4))
}

fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000).prop_map(|n| Decimal::new(n, 4))
}

fn proposal(buy_price: Decimal, sell_price: Decimal, buy_fee: Decimal, sell_fee: Decimal, amount: Decimal) -> ArbProposal {
    ArbProposal::new(
        ProposalSide {
            venue: Venue::new("binance", "BTC-USDT"),
            side: Side::Buy,
            amount,
            price: buy_price,
            fee: buy_fee,
        },
        ProposalSide {
            venue: Venue::new("uniswap_v2", "WBTC-WETH"),
            side: Side::Sell,
            amount,
            price: sell_price,
            fee: sell_fee,
        },
    )
    .unwrap()
}

fn opportunity(buy: &str, sell: &str, profit_pct: Decimal) -> Opportunity {
    let side = |connector: &str, side| ProposalSide {
        venue: Venue::new(connector, "BTC-USDT"),
        side,
        amount: Decimal::ONE,
        price: Decimal::ONE_HUNDRED,
        fee: Decimal::ZERO,
    };
    Opportunity {
        proposal: ArbProposal::new(side(buy, Side::Buy), side(sell, Side::Sell)).unwrap(),
        profit_pct,
    }
}

proptest! {
    #[test]
    fn fees_never_improve_profitability(
        buy in price(),
        sell in price(),
        buy_fee in fee(),
        sell_fee in fee(),
        amount in amount(),
    ) {
        let p = proposal(buy, sell, buy_fee, sell_fee, amount);
        prop_assert!(p.profit_pct(true) <= p.profit_pct(false));
    }

    #[test]
    fn buffers_only_protect(quoted in price(), buffer in buffer()) {
        prop_assert!(buffered_price(quoted, Side::Buy, buffer) >= quoted);
        prop_assert!(buffered_price(quoted, Side::Sell, buffer) <= quoted);
    }

    #[test]
    fn sweep_covers_the_range_in_order(
        min in amount(),
        extra in (0i64..=1_000_000).prop_map(|n| Decimal::new(n, 4)),
        steps in 2usize..64,
    ) {
        let max = min + extra;
        let amounts = sweep_amounts(min, max, steps);

        prop_assert_eq!(amounts.len(), steps);
        prop_assert_eq!(amounts[0], min);
        prop_assert_eq!(amounts[steps - 1], max);
        prop_assert!(amounts.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(amounts.iter().all(|a| *a >= min && *a <= max));
    }

    #[test]
    fn selection_keeps_the_better_direction(p1 in fee(), p2 in fee()) {
        let opp1 = opportunity("binance", "uniswap_v2", p1);
        let opp2 = opportunity("uniswap_v2", "binance", p2);

        let chosen = select_better(Some(opp1), Some(opp2)).unwrap();

        prop_assert_eq!(chosen.profit_pct, p1.max(p2));
        if p1 <= p2 {
            prop_assert_eq!(chosen.proposal.buy_side().venue.connector.as_str(), "uniswap_v2");
        }
    }

    #[test]
    fn inverted_range_never_validates(max in amount(), gap in amount()) {
        let config = Config {
            min_order_amount: max + gap,
            max_order_amount: max,
            ..Config::default()
        };
        let rejected = matches!(config.validate(), Err(ConfigError::InvertedRange { .. }));
        prop_assert!(rejected);
    }
}
