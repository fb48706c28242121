//! End-to-end cycles over order books and the dry-run executor.

use std::sync::Arc;
use std::time::Duration;

use amm_arb::arbitrage::{ArbController, CycleOutcome};
use amm_arb::config::Config;
use amm_arb::market::{load_books, BookQuoteProvider, BookSet, OrderBook, PriceLevel, QuoteProvider, Venue};
use amm_arb::trading::{DryRunExecutor, OrderCompleted, OrderExecutor, Side};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::mpsc;

fn binance() -> Venue {
    Venue::new("binance", "BTC-USDT")
}

fn uniswap() -> Venue {
    Venue::new("uniswap_v2", "WBTC-WETH")
}

fn insert(books: &mut BookSet, venue: &Venue, book: OrderBook) {
    books
        .entry(venue.connector.clone())
        .or_default()
        .insert(venue.trading_pair.clone(), book);
}

/// Binance asks start at 100, uniswap bids start at 102 but thin out after 0.3.
fn books_with_fee(fee_rate: Decimal) -> BookSet {
    let mut books = BookSet::new();
    insert(
        &mut books,
        &binance(),
        OrderBook {
            bids: vec![PriceLevel::new(dec!(99), dec!(1))],
            asks: vec![PriceLevel::new(dec!(100), dec!(0.5)), PriceLevel::new(dec!(101), dec!(1))],
            fee_rate,
        },
    );
    insert(
        &mut books,
        &uniswap(),
        OrderBook {
            bids: vec![PriceLevel::new(dec!(102), dec!(0.3)), PriceLevel::new(dec!(100), dec!(2))],
            asks: vec![PriceLevel::new(dec!(103), dec!(5))],
            fee_rate,
        },
    );
    books
}

fn books() -> BookSet {
    books_with_fee(Decimal::ZERO)
}

struct Harness {
    market_1: Arc<BookQuoteProvider>,
    market_2: Arc<BookQuoteProvider>,
    executor: Arc<DryRunExecutor>,
    completions: mpsc::UnboundedReceiver<OrderCompleted>,
    controller: ArbController,
}

fn harness(config: Config) -> Harness {
    let (executor, completions) = DryRunExecutor::new(Duration::ZERO);
    executor.fund(&binance(), dec!(10), dec!(100000));
    executor.fund(&uniswap(), dec!(10), dec!(100000));
    let executor = Arc::new(executor);

    let market_1 = Arc::new(BookQuoteProvider::new(binance()));
    let market_2 = Arc::new(BookQuoteProvider::new(uniswap()));
    let controller = ArbController::new(
        market_1.clone(),
        market_2.clone(),
        executor.clone(),
        config.validate().unwrap(),
    );

    Harness {
        market_1,
        market_2,
        executor,
        completions,
        controller,
    }
}

async fn refresh(h: &Harness, books: &BookSet) {
    assert!(h.market_1.refresh_from(books).await);
    assert!(h.market_2.refresh_from(books).await);
}

#[tokio::test]
async fn cycle_executes_buy_low_sell_high() {
    let mut h = harness(Config::default());
    refresh(&h, &books()).await;

    let outcome = h.controller.determine_actions().await.unwrap();
    let CycleOutcome::Submitted {
        opportunity,
        candidates,
        order_ids,
    } = outcome
    else {
        panic!("expected submission, got {outcome:?}");
    };

    // Profit is flat up to 0.3, so the smallest size wins.
    assert_eq!(opportunity.proposal.amount(), dec!(0.01));
    assert_eq!(opportunity.profit_pct, dec!(0.02));
    assert_eq!(order_ids.len(), 2);

    assert_eq!(candidates[0].connector, "binance");
    assert_eq!(candidates[0].side, Side::Buy);
    assert_eq!(candidates[0].price, dec!(101));
    assert_eq!(candidates[1].connector, "uniswap_v2");
    assert_eq!(candidates[1].side, Side::Sell);
    assert_eq!(candidates[1].price, dec!(100.98));

    let mut completed = vec![
        h.completions.recv().await.unwrap(),
        h.completions.recv().await.unwrap(),
    ];
    completed.sort_by(|a, b| a.order_id.cmp(&b.order_id));
    assert_eq!(completed[0].connector, "binance");
    assert_eq!(completed[1].connector, "uniswap_v2");

    let balance = |connector: &str, asset: &str| {
        h.executor
            .balances()
            .into_iter()
            .find(|b| b.connector == connector && b.asset == asset)
            .map(|b| b.amount)
            .unwrap()
    };
    assert_eq!(balance("binance", "BTC"), dec!(10.01));
    assert_eq!(balance("binance", "USDT"), dec!(99998.99));
    assert_eq!(balance("uniswap_v2", "WBTC"), dec!(9.99));
    assert_eq!(balance("uniswap_v2", "WETH"), dec!(100001.0098));
}

#[tokio::test]
async fn depth_limits_the_chosen_size() {
    let config = Config {
        min_order_amount: dec!(0.5),
        max_order_amount: dec!(1.0),
        ..Config::default()
    };
    let h = harness(config);
    refresh(&h, &books()).await;

    let best = h.controller.evaluate().await.unwrap().unwrap();

    // At 0.5 the sell walks into the 100 level: (0.3*102 + 0.2*100) / 0.5 = 101.2.
    assert_eq!(best.proposal.amount(), dec!(0.5));
    assert_eq!(best.proposal.sell_side().price, dec!(101.2));
    assert_eq!(best.profit_pct, dec!(0.012));
}

#[tokio::test]
async fn sizes_beyond_the_book_are_skipped() {
    let config = Config {
        min_order_amount: dec!(1),
        max_order_amount: dec!(3),
        sweep_steps: 3,
        ..Config::default()
    };
    let h = harness(config);
    refresh(&h, &books()).await;

    // Binance asks hold 1.5, so only size 1 can be bought there.
    let best = h.controller.evaluate().await.unwrap();
    let best = best.unwrap();
    assert_eq!(best.proposal.amount(), dec!(1));
    assert_eq!(best.proposal.buy_side().venue, binance());
}

#[tokio::test]
async fn missing_venue_book_aborts_the_cycle() {
    let h = harness(Config::default());
    let mut books = books();
    books.remove("uniswap_v2");

    assert!(h.market_1.refresh_from(&books).await);
    assert!(!h.market_2.refresh_from(&books).await);

    assert!(h.controller.determine_actions().await.is_err());
    assert!(h.controller.last_proposal().await.is_none());
    assert_eq!(h.controller.stats().cycles_aborted, 1);
}

#[tokio::test]
async fn fees_can_hold_a_cycle_below_threshold() {
    let h = harness(Config::default());
    refresh(&h, &books_with_fee(dec!(0.008))).await;

    // 102 * 0.992 / (100 * 1.008) - 1 is about 0.0038.
    let outcome = h.controller.determine_actions().await.unwrap();
    let CycleOutcome::BelowThreshold(opportunity) = outcome else {
        panic!("expected below threshold, got {outcome:?}");
    };
    assert!(opportunity.profit_pct > dec!(0.003) && opportunity.profit_pct < dec!(0.004));
    assert!(h.executor.active_orders().is_empty());
}

#[tokio::test]
async fn books_load_from_snapshot_file() {
    let path = std::env::temp_dir().join(format!("amm-arb-books-{}.json", std::process::id()));
    std::fs::write(&path, serde_json::to_string(&books()).unwrap()).unwrap();

    let loaded = load_books(&path).await.unwrap();
    std::fs::remove_file(&path).ok();

    let h = harness(Config::default());
    refresh(&h, &loaded).await;

    let top = h.market_2.top_of_book("WBTC-WETH").await.unwrap();
    assert_eq!(top.best_bid, Some(dec!(102)));
    assert_eq!(top.best_ask, Some(dec!(103)));

    let report = h.controller.status_report().await.to_string();
    assert!(report.contains("uniswap_v2"));
    assert!(report.contains("No arbitrage opportunities found yet."));
}

#[tokio::test]
async fn missing_snapshot_file_is_an_error() {
    let path = std::env::temp_dir().join("amm-arb-books-does-not-exist.json");
    assert!(load_books(&path).await.is_err());
}

#[tokio::test]
async fn one_connector_can_serve_both_markets() {
    let usdt = Venue::new("binance", "BTC-USDT");
    let busd = Venue::new("binance", "BTC-BUSD");
    let config = Config {
        connector_2: "binance".to_string(),
        trading_pair_2: "BTC-BUSD".to_string(),
        market_2_slippage_buffer: dec!(0.05),
        ..Config::default()
    };

    let (executor, _completions) = DryRunExecutor::new(Duration::ZERO);
    executor.fund(&usdt, dec!(10), dec!(100000));
    executor.fund(&busd, dec!(10), dec!(100000));
    let market_1 = Arc::new(BookQuoteProvider::new(usdt.clone()));
    let market_2 = Arc::new(BookQuoteProvider::new(busd.clone()));
    let controller = ArbController::new(
        market_1.clone(),
        market_2.clone(),
        Arc::new(executor),
        config.validate().unwrap(),
    );

    let mut books = BookSet::new();
    insert(
        &mut books,
        &usdt,
        OrderBook {
            bids: vec![PriceLevel::new(dec!(99), dec!(5))],
            asks: vec![PriceLevel::new(dec!(100), dec!(5))],
            fee_rate: Decimal::ZERO,
        },
    );
    insert(
        &mut books,
        &busd,
        OrderBook {
            bids: vec![PriceLevel::new(dec!(101), dec!(5))],
            asks: vec![PriceLevel::new(dec!(102), dec!(5))],
            fee_rate: Decimal::ZERO,
        },
    );
    assert!(market_1.refresh_from(&books).await);
    assert!(market_2.refresh_from(&books).await);

    let outcome = controller.determine_actions().await.unwrap();
    let CycleOutcome::Submitted { candidates, .. } = outcome else {
        panic!("expected submission, got {outcome:?}");
    };

    // Both legs share a connector, so both take the first market's buffer.
    assert_eq!(candidates[0].trading_pair, "BTC-USDT");
    assert_eq!(candidates[0].price, dec!(101));
    assert_eq!(candidates[1].trading_pair, "BTC-BUSD");
    assert_eq!(candidates[1].price, dec!(99.99));
}
