use std::collections::HashMap;

use conclave_types::{Address, U256};

use crate::error::GovernanceError;

/// One operation a proposal wants executed: a call against `target`
/// carrying `value`, dispatched to `signature` with `data` as arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalAction {
    pub target: Address,
    pub value: U256,
    pub signature: String,
    pub data: Vec<u8>,
}

/// Direction of a vote. Reserved kinds beyond these two are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VoteSupport {
    Against = 0,
    For = 1,
}

impl VoteSupport {
    pub fn from_u8(value: u8) -> Result<Self, GovernanceError> {
        match value {
            0 => Ok(Self::Against),
            1 => Ok(Self::For),
            _ => Err(GovernanceError::InvalidVoteType),
        }
    }
}

/// Record of one account's vote on one proposal. Write-once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteReceipt {
    pub has_voted: bool,
    pub support: VoteSupport,
    pub votes: U256,
}

/// A governance proposal. Never destroyed; retained for audit.
///
/// Lifecycle state is not stored here: it is derived on demand from
/// these flags and timestamps plus the current clock.
#[derive(Debug, Clone)]
pub struct Proposal {
    /// 1-based monotonic id
    pub id: u64,
    pub proposer: Address,
    pub actions: Vec<ProposalAction>,
    pub description: String,
    /// Voting opens strictly after this block
    pub start_block: u64,
    /// Voting closes at the end of this block
    pub end_block: u64,
    /// Scheduled execution timestamp; 0 until queued
    pub eta: u64,
    pub for_votes: U256,
    pub against_votes: U256,
    pub canceled: bool,
    pub vetoed: bool,
    pub executed: bool,
    pub receipts: HashMap<Address, VoteReceipt>,
}

impl Proposal {
    pub fn new(
        id: u64,
        proposer: Address,
        actions: Vec<ProposalAction>,
        description: String,
        start_block: u64,
        end_block: u64,
    ) -> Self {
        Self {
            id,
            proposer,
            actions,
            description,
            start_block,
            end_block,
            eta: 0,
            for_votes: U256::ZERO,
            against_votes: U256::ZERO,
            canceled: false,
            vetoed: false,
            executed: false,
            receipts: HashMap::new(),
        }
    }

    pub fn receipt(&self, voter: &Address) -> Option<&VoteReceipt> {
        self.receipts.get(voter)
    }
}
