//! Conclave Token - Governance token with a checkpointed voting-power ledger.
//!
//! This crate provides:
//! - Balance and allowance bookkeeping for the governance token
//! - Per-account delegation with signed (off-chain) delegation support
//! - Checkpoint history answering point-in-time voting-power queries

pub mod checkpoints;
pub mod error;
pub mod token;

pub use checkpoints::{Checkpoint, CheckpointLedger};
pub use error::TokenError;
pub use token::{VotesToken, INITIAL_SUPPLY_TOKENS, TOKEN_DECIMALS, TOKEN_NAME, TOKEN_SYMBOL};
