//! Two-venue arbitrage sizing engine.
//!
//! Each cycle quotes both venues across a sweep of trade sizes, picks the
//! most profitable size and direction, and turns it into two taker orders
//! protected by per-venue slippage buffers.
//!
//! # Profitability
//!
//! For a buy at `p_buy` with fee `f_buy` and a sell at `p_sell` with fee
//! `f_sell` of the same base amount:
//!
//! ```text
//! profit_pct = p_sell * (1 - f_sell) / (p_buy * (1 + f_buy)) - 1
//!
//! buy 100, sell 101, no fees:  0.01 (1%)
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Unified error types
//! - [`market`]: Venue quotes, order books and mocks
//! - [`arbitrage`]: Proposals, size sweep, direction selection, controller
//! - [`trading`]: Order candidates and execution
//! - [`report`]: Operator status reports
//! - [`api`]: HTTP API for health/status/metrics
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod arbitrage;
pub mod config;
pub mod error;
pub mod market;
pub mod metrics;
pub mod report;
pub mod trading;
pub mod utils;

pub use config::{Config, OptimizerConfig};
pub use error::{BotError, Result};
