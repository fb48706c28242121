//! Unified error types for the arbitrage engine.

use rust_decimal::Decimal;
use thiserror::Error;

/// Unified error type for the arbitrage engine.
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Quote provider error that aborted a cycle.
    #[error("quote error: {0}")]
    Quote(#[from] QuoteError),

    /// Trading/order error.
    #[error("trading error: {0}")]
    Trading(#[from] TradingError),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors. Any of these is fatal: the pipeline must not run.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read configuration from the environment.
    #[error("failed to load environment: {0}")]
    Env(#[from] envy::Error),

    /// Order amount range is inverted.
    #[error("min_order_amount {min} is greater than max_order_amount {max}")]
    InvertedRange {
        /// Configured minimum.
        min: Decimal,
        /// Configured maximum.
        max: Decimal,
    },

    /// An order amount bound is zero or negative.
    #[error("{name} must be positive, got {value}")]
    NonPositiveAmount {
        /// Field name.
        name: &'static str,
        /// Offending value.
        value: Decimal,
    },

    /// A fraction (profitability or slippage buffer) is negative.
    #[error("{name} must not be negative, got {value}")]
    NegativeFraction {
        /// Field name.
        name: &'static str,
        /// Offending value.
        value: Decimal,
    },

    /// Sweep needs at least both endpoints.
    #[error("sweep_steps must be at least 2, got {0}")]
    TooFewSteps(usize),

    /// Both markets name the same connector and trading pair.
    #[error("market_1 and market_2 must differ, both are {0}")]
    SameMarket(String),

    /// A required identifier is empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Errors surfaced by a quote provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    /// Venue cannot fill the requested amount.
    #[error("insufficient liquidity on {venue}: need {required}, available {available}")]
    InsufficientLiquidity {
        /// Venue connector name.
        venue: String,
        /// Requested base amount.
        required: Decimal,
        /// Amount the venue could fill.
        available: Decimal,
    },

    /// Venue returned a quote that breaks the side invariants.
    #[error("invalid quote from {venue}: {reason}")]
    InvalidQuote {
        /// Venue connector name.
        venue: String,
        /// What was wrong.
        reason: String,
    },

    /// Venue could not be reached.
    #[error("quote provider {venue} unavailable: {reason}")]
    Unavailable {
        /// Venue connector name.
        venue: String,
        /// Reason for failure.
        reason: String,
    },
}

impl QuoteError {
    /// Whether the failure only concerns the sampled amount.
    ///
    /// Sample-local failures are skipped by the sweep; anything else aborts the cycle.
    pub fn is_sample_local(&self) -> bool {
        matches!(
            self,
            QuoteError::InsufficientLiquidity { .. } | QuoteError::InvalidQuote { .. }
        )
    }
}

/// Trading and order execution errors.
#[derive(Error, Debug)]
pub enum TradingError {
    /// Invalid order parameters.
    #[error("invalid order parameters: {0}")]
    InvalidParams(String),

    /// Insufficient funds for the order.
    #[error("insufficient {asset} on {connector}: need {required}, have {available}")]
    InsufficientFunds {
        /// Connector holding the balance.
        connector: String,
        /// Asset symbol.
        asset: String,
        /// Required amount.
        required: Decimal,
        /// Available amount.
        available: Decimal,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, BotError>;
