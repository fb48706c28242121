//! Trading module for order candidates and execution.
//!
//! This module handles:
//! - Order candidate types
//! - Order submission through an executor
//! - Simulated balance tracking

pub mod balance;
pub mod execution;
pub mod order;

pub use balance::{AssetBalance, Balances};
pub use execution::{log_completions, ActiveOrder, DryRunExecutor, OrderCompleted, OrderExecutor};
pub use order::{OrderCandidate, OrderType, Side};
