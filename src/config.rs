//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::market::Venue;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Markets ===
    /// First connector name.
    #[serde(default = "default_connector_1")]
    pub connector_1: String,

    /// Trading pair on the first connector.
    #[serde(default = "default_trading_pair_1")]
    pub trading_pair_1: String,

    /// Second connector name.
    #[serde(default = "default_connector_2")]
    pub connector_2: String,

    /// Trading pair on the second connector.
    #[serde(default = "default_trading_pair_2")]
    pub trading_pair_2: String,

    // === Dynamic Order Sizing ===
    /// Smallest base amount the sweep considers.
    #[serde(default = "default_min_order_amount")]
    pub min_order_amount: Decimal,

    /// Largest base amount the sweep considers.
    #[serde(default = "default_max_order_amount")]
    pub max_order_amount: Decimal,

    /// Minimum net profitability to execute (0.005 = 0.5%).
    #[serde(default = "default_min_profitability")]
    pub min_profitability: Decimal,

    /// Number of sizes sampled per direction, endpoints included.
    #[serde(default = "default_sweep_steps")]
    pub sweep_steps: usize,

    // === Slippage Buffers ===
    /// Slippage buffer for the first market (0.01 = 1%).
    #[serde(default = "default_slippage_buffer")]
    pub market_1_slippage_buffer: Decimal,

    /// Slippage buffer for the second market.
    #[serde(default = "default_slippage_buffer")]
    pub market_2_slippage_buffer: Decimal,

    // === Runtime ===
    /// Path of the order book snapshot file, re-read every cycle.
    #[serde(default = "default_books_path")]
    pub books_path: String,

    /// Milliseconds between decision cycles.
    #[serde(default = "default_cycle_interval_ms")]
    pub cycle_interval_ms: u64,

    /// Milliseconds before a dry-run order reports completion.
    #[serde(default)]
    pub sim_fill_delay_ms: u64,

    /// Starting base-asset balance on each simulated venue.
    #[serde(default = "default_sim_base_balance")]
    pub sim_base_balance: Decimal,

    /// Starting quote-asset balance on each simulated venue.
    #[serde(default = "default_sim_quote_balance")]
    pub sim_quote_balance: Decimal,

    // === Server Configuration ===
    /// HTTP server port for health/metrics endpoints.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_connector_1() -> String {
    "binance".to_string()
}

fn default_trading_pair_1() -> String {
    "BTC-USDT".to_string()
}

fn default_connector_2() -> String {
    "uniswap_v2".to_string()
}

fn default_trading_pair_2() -> String {
    "WBTC-WETH".to_string()
}

fn default_min_order_amount() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_max_order_amount() -> Decimal {
    Decimal::new(10, 1) // 1.0
}

fn default_min_profitability() -> Decimal {
    Decimal::new(5, 3) // 0.005
}

fn default_sweep_steps() -> usize {
    20
}

fn default_slippage_buffer() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_books_path() -> String {
    "books.json".to_string()
}

fn default_cycle_interval_ms() -> u64 {
    1000
}

fn default_sim_base_balance() -> Decimal {
    Decimal::new(10, 0)
}

fn default_sim_quote_balance() -> Decimal {
    Decimal::new(1_000_000, 0)
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connector_1: default_connector_1(),
            trading_pair_1: default_trading_pair_1(),
            connector_2: default_connector_2(),
            trading_pair_2: default_trading_pair_2(),
            min_order_amount: default_min_order_amount(),
            max_order_amount: default_max_order_amount(),
            min_profitability: default_min_profitability(),
            sweep_steps: default_sweep_steps(),
            market_1_slippage_buffer: default_slippage_buffer(),
            market_2_slippage_buffer: default_slippage_buffer(),
            books_path: default_books_path(),
            cycle_interval_ms: default_cycle_interval_ms(),
            sim_fill_delay_ms: 0,
            sim_base_balance: default_sim_base_balance(),
            sim_quote_balance: default_sim_quote_balance(),
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// First market as configured.
    pub fn market_1(&self) -> Venue {
        Venue::new(&self.connector_1, &self.trading_pair_1)
    }

    /// Second market as configured.
    pub fn market_2(&self) -> Venue {
        Venue::new(&self.connector_2, &self.trading_pair_2)
    }

    /// Validate and extract the optimizer configuration.
    pub fn validate(&self) -> Result<OptimizerConfig, ConfigError> {
        OptimizerConfig::try_from(self)
    }
}

/// Validated optimizer settings.
///
/// Only obtainable through [`OptimizerConfig::try_from`], so holding one
/// means every range and fraction check has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizerConfig {
    market_1: Venue,
    market_2: Venue,
    min_order_amount: Decimal,
    max_order_amount: Decimal,
    min_profitability: Decimal,
    market_1_slippage_buffer: Decimal,
    market_2_slippage_buffer: Decimal,
    sweep_steps: usize,
}

impl TryFrom<&Config> for OptimizerConfig {
    type Error = ConfigError;

    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        let fields = [
            ("connector_1", &config.connector_1),
            ("trading_pair_1", &config.trading_pair_1),
            ("connector_2", &config.connector_2),
            ("trading_pair_2", &config.trading_pair_2),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(name));
            }
        }

        if config.market_1() == config.market_2() {
            return Err(ConfigError::SameMarket(config.market_1().to_string()));
        }

        for (name, value) in [
            ("min_order_amount", config.min_order_amount),
            ("max_order_amount", config.max_order_amount),
        ] {
            if value <= Decimal::ZERO {
                return Err(ConfigError::NonPositiveAmount { name, value });
            }
        }

        if config.min_order_amount > config.max_order_amount {
            return Err(ConfigError::InvertedRange {
                min: config.min_order_amount,
                max: config.max_order_amount,
            });
        }

        if config.sweep_steps < 2 {
            return Err(ConfigError::TooFewSteps(config.sweep_steps));
        }

        if config.min_profitability < Decimal::ZERO {
            return Err(ConfigError::NegativeFraction {
                name: "min_profitability",
                value: config.min_profitability,
            });
        }

        for (name, value) in [
            ("market_1_slippage_buffer", config.market_1_slippage_buffer),
            ("market_2_slippage_buffer", config.market_2_slippage_buffer),
        ] {
            if value < Decimal::ZERO {
                return Err(ConfigError::NegativeFraction { name, value });
            }
        }

        Ok(Self {
            market_1: config.market_1(),
            market_2: config.market_2(),
            min_order_amount: config.min_order_amount,
            max_order_amount: config.max_order_amount,
            min_profitability: config.min_profitability,
            market_1_slippage_buffer: config.market_1_slippage_buffer,
            market_2_slippage_buffer: config.market_2_slippage_buffer,
            sweep_steps: config.sweep_steps,
        })
    }
}

impl OptimizerConfig {
    /// First market.
    pub fn market_1(&self) -> &Venue {
        &self.market_1
    }

    /// Second market.
    pub fn market_2(&self) -> &Venue {
        &self.market_2
    }

    /// Smallest swept amount.
    pub fn min_order_amount(&self) -> Decimal {
        self.min_order_amount
    }

    /// Largest swept amount.
    pub fn max_order_amount(&self) -> Decimal {
        self.max_order_amount
    }

    /// Profitability gate for execution.
    pub fn min_profitability(&self) -> Decimal {
        self.min_profitability
    }

    /// Number of sampled sizes per direction.
    pub fn sweep_steps(&self) -> usize {
        self.sweep_steps
    }

    /// Slippage buffer for orders routed to `connector`.
    ///
    /// Anything that is not the first connector gets the second buffer.
    pub fn slippage_buffer(&self, connector: &str) -> Decimal {
        if connector == self.market_1.connector {
            self.market_1_slippage_buffer
        } else {
            self.market_2_slippage_buffer
        }
    }
}
