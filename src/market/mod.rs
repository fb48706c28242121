//! Market module for venues and their quotes.
//!
//! This module handles:
//! - Venue and quote types
//! - The quote provider capability consumed by the optimizer
//! - An order-book backed provider
//! - Mock provider for testing

pub mod book;
pub mod mock;
pub mod provider;
pub mod types;

pub use book::{load_books, BookQuoteProvider, BookSet, OrderBook, PriceLevel};
pub use mock::{MockConfig, MockQuoteProvider};
pub use provider::QuoteProvider;
pub use types::{Quote, TopOfBook, Venue};
