//! Arbitrage module for sizing and selecting opportunities.
//!
//! This module handles:
//! - Proposal building and profitability
//! - Trade size sweeps per direction
//! - Direction selection
//! - Order candidate generation
//! - The decision cycle controller

pub mod candidates;
pub mod controller;
pub mod optimizer;
pub mod proposal;
pub mod selector;

pub use candidates::{buffered_price, create_order_candidate, generate_order_candidates};
pub use controller::{ArbController, ControllerStats, CycleOutcome};
pub use optimizer::{find_best_size_for_direction, sweep_amounts, Opportunity};
pub use proposal::{build_proposal, ArbProposal, ProposalSide};
pub use selector::{find_optimal_opportunity, select_better};
