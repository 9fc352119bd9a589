//! Conclave Governance - Proposal registry and DAO assembly.
//!
//! This crate provides:
//! - The proposal registry and its lifecycle operations (propose, vote,
//!   queue, execute, cancel, veto)
//! - The pure state evaluator deriving a proposal's lifecycle state
//! - Governor configuration with deployment-bounds validation
//! - The `Dao` facade serializing every transition behind one lock

pub mod config;
pub mod dao;
pub mod error;
pub mod governor;
pub mod proposal;
pub mod state;

pub use config::GovernorConfig;
pub use dao::Dao;
pub use error::GovernanceError;
pub use governor::Governor;
pub use proposal::{Proposal, ProposalAction, VoteReceipt, VoteSupport};
pub use state::{evaluate, ProposalState};
