//! Two-venue arbitrage sizing engine entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use amm_arb::api::{create_router, AppState};
use amm_arb::arbitrage::{generate_order_candidates, ArbController, CycleOutcome};
use amm_arb::config::Config;
use amm_arb::market::{load_books, BookQuoteProvider};
use amm_arb::metrics;
use amm_arb::trading::{log_completions, DryRunExecutor};
use amm_arb::utils::shutdown_signal;

/// Two-venue arbitrage sizing engine.
#[derive(Parser, Debug)]
#[command(name = "amm-arb")]
#[command(about = "Sizes and executes arbitrage between two trading venues")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the decision loop with the HTTP server (default).
    Run {
        /// Order book snapshot file, re-read every cycle.
        #[arg(long)]
        books: Option<String>,

        /// HTTP server port for health/status/metrics.
        #[arg(short, long)]
        port: Option<u16>,

        /// Milliseconds between cycles.
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Run a single cycle against a snapshot and print the result without trading.
    Optimize {
        /// Order book snapshot file.
        #[arg(long)]
        books: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("amm_arb=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Optimize { books }) => cmd_optimize(books).await,
        Some(Command::Run {
            books,
            port,
            interval_ms,
        }) => cmd_run(books, port, interval_ms).await,
        None => cmd_run(None, None, None).await,
    }
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("AMM ARB - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    if let Err(e) = config.validate() {
        println!("FAILED");
        println!("  Error: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed"));
    }
    println!("OK");

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Market 1: {} (buffer {})", config.market_1(), config.market_1_slippage_buffer);
    println!("  Market 2: {} (buffer {})", config.market_2(), config.market_2_slippage_buffer);
    println!(
        "  Order Amount: {} .. {} in {} steps",
        config.min_order_amount, config.max_order_amount, config.sweep_steps
    );
    println!("  Min Profitability: {}", config.min_profitability);
    println!("  Books File: {}", config.books_path);
    println!("  Cycle Interval: {}ms", config.cycle_interval_ms);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Markets, executor and controller wired from configuration.
struct Engine {
    market_1: Arc<BookQuoteProvider>,
    market_2: Arc<BookQuoteProvider>,
    controller: ArbController,
}

impl Engine {
    fn build(config: &Config, executor: DryRunExecutor) -> anyhow::Result<Self> {
        let optimizer = config.validate()?;

        executor.fund(&config.market_1(), config.sim_base_balance, config.sim_quote_balance);
        executor.fund(&config.market_2(), config.sim_base_balance, config.sim_quote_balance);

        let market_1 = Arc::new(BookQuoteProvider::new(config.market_1()));
        let market_2 = Arc::new(BookQuoteProvider::new(config.market_2()));
        let controller = ArbController::new(
            market_1.clone(),
            market_2.clone(),
            Arc::new(executor),
            optimizer,
        );

        Ok(Self {
            market_1,
            market_2,
            controller,
        })
    }

    /// Reload both venues from the snapshot file.
    async fn refresh(&self, path: &str) -> amm_arb::Result<()> {
        let books = load_books(path).await?;
        for market in [&self.market_1, &self.market_2] {
            if !market.refresh_from(&books).await {
                debug!(path, "No book for venue in snapshot");
            }
        }
        Ok(())
    }
}

/// Run a single cycle and print the outcome.
async fn cmd_optimize(books: Option<String>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let books_path = books.unwrap_or_else(|| config.books_path.clone());

    let (executor, _completions) = DryRunExecutor::new(Duration::ZERO);
    let engine = Engine::build(&config, executor)?;
    engine.refresh(&books_path).await?;

    let best = engine.controller.evaluate().await?;
    println!("{}", engine.controller.status_report().await);

    if let Some(opportunity) = best {
        let min_profitability = engine.controller.config().min_profitability();
        let verdict = if opportunity.profit_pct >= min_profitability {
            "would execute"
        } else {
            "below threshold"
        };
        println!();
        println!("# Candidates ({})", verdict);
        for c in generate_order_candidates(&opportunity.proposal, engine.controller.config()) {
            println!(
                "  {:<12} {:<12} {:<4} {:>14} {:>16}",
                c.connector,
                c.trading_pair,
                c.side,
                c.amount.normalize(),
                c.price.normalize()
            );
        }
    }

    Ok(())
}

/// Run the decision loop.
async fn cmd_run(books: Option<String>, port: Option<u16>, interval_ms: Option<u64>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let books_path = books.unwrap_or_else(|| config.books_path.clone());
    let port = port.unwrap_or(config.port);
    let interval = Duration::from_millis(interval_ms.unwrap_or(config.cycle_interval_ms));

    let prometheus = PrometheusBuilder::new().install_recorder()?;
    metrics::init_metrics();

    let (executor, completions) = DryRunExecutor::new(Duration::from_millis(config.sim_fill_delay_ms));
    let engine = Engine::build(&config, executor).map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    tokio::spawn(log_completions(completions));

    info!("Configuration loaded successfully");
    info!("Market 1: {}", config.market_1());
    info!("Market 2: {}", config.market_2());
    info!(
        "Order amount: {} .. {} ({} steps)",
        config.min_order_amount, config.max_order_amount, config.sweep_steps
    );
    info!("Min profitability: {}", config.min_profitability);
    info!("Mode: SIMULATION");

    let app_state = AppState::new().with_prometheus(prometheus);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let router = create_router(app_state.clone());
    let _server_handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    info!("Starting decision loop...");
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        if let Err(e) = engine.refresh(&books_path).await {
            warn!(path = %books_path, error = %e, "Failed to load order books, skipping cycle");
            continue;
        }

        match engine.controller.determine_actions().await {
            Ok(CycleOutcome::Submitted { order_ids, .. }) => {
                info!(orders = ?order_ids, "Orders submitted");
            }
            Ok(CycleOutcome::BelowThreshold(opportunity)) => {
                debug!(profit_pct = %opportunity.profit_pct, "Below threshold");
            }
            Ok(CycleOutcome::NoOpportunity) => {}
            Err(e) => warn!(error = %e, "Cycle failed"),
        }

        app_state
            .publish(engine.controller.status_report().await, engine.controller.stats())
            .await;
        app_state.set_ready(true);
    }

    let stats = engine.controller.stats();
    info!("========================================");
    info!("SHUTDOWN - FINAL SUMMARY");
    info!("========================================");
    info!("Cycles run: {}", stats.cycles);
    info!("Opportunities found: {}", stats.opportunities_found);
    info!("Opportunities executed: {}", stats.opportunities_executed);
    info!("Cycles aborted: {}", stats.cycles_aborted);
    info!("----------------------------------------");
    info!("\n{}", engine.controller.status_report().await);
    info!("========================================");

    Ok(())
}
