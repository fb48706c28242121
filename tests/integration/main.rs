//! Integration tests for the arbitrage engine.
//!
//! Run with: cargo test --test integration

mod pipeline;
mod properties;
