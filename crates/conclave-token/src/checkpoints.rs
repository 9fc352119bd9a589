use std::collections::HashMap;

use conclave_types::{Address, U256};

use crate::error::TokenError;

/// A (block, weight) snapshot of an account's voting power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// Block the weight took effect
    pub from_block: u64,
    /// Voting weight as of that block
    pub votes: U256,
}

/// Per-account checkpoint histories answering point-in-time voting-power
/// queries.
///
/// Each account owns an append-only sequence strictly increasing in
/// `from_block`; a write at the same block overwrites the last entry's
/// votes in place, so there is at most one checkpoint per (account, block).
#[derive(Debug, Default)]
pub struct CheckpointLedger {
    checkpoints: HashMap<Address, Vec<Checkpoint>>,
}

impl CheckpointLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `new_votes` for `account` as of `block`.
    ///
    /// Coalesces with the last entry when it is for the same block,
    /// otherwise appends.
    pub fn write(&mut self, account: Address, new_votes: U256, block: u64) {
        let sequence = self.checkpoints.entry(account).or_default();
        match sequence.last_mut() {
            Some(last) if last.from_block == block => last.votes = new_votes,
            _ => sequence.push(Checkpoint {
                from_block: block,
                votes: new_votes,
            }),
        }
    }

    /// Weight at the latest checkpoint, or 0 if the account has none.
    pub fn latest(&self, account: &Address) -> U256 {
        self.checkpoints
            .get(account)
            .and_then(|seq| seq.last())
            .map(|cp| cp.votes)
            .unwrap_or(U256::ZERO)
    }

    /// Weight as of `block`, which must be strictly in the past: the
    /// current block's checkpoint can still change within the same block.
    ///
    /// O(1) when `block` is at or past the last checkpoint, O(log n)
    /// binary search otherwise.
    pub fn prior(
        &self,
        account: &Address,
        block: u64,
        current_block: u64,
    ) -> Result<U256, TokenError> {
        if block >= current_block {
            return Err(TokenError::NotYetDetermined);
        }

        let Some(sequence) = self.checkpoints.get(account).filter(|seq| !seq.is_empty()) else {
            return Ok(U256::ZERO);
        };

        let last = &sequence[sequence.len() - 1];
        if block >= last.from_block {
            return Ok(last.votes);
        }
        if block < sequence[0].from_block {
            return Ok(U256::ZERO);
        }

        // Latest entry with from_block <= block.
        let idx = sequence.partition_point(|cp| cp.from_block <= block);
        Ok(sequence[idx - 1].votes)
    }

    /// Number of checkpoints recorded for `account`.
    pub fn len(&self, account: &Address) -> usize {
        self.checkpoints.get(account).map_or(0, |seq| seq.len())
    }

    pub fn is_empty(&self, account: &Address) -> bool {
        self.len(account) == 0
    }

    /// Checkpoint at `index` in the account's sequence.
    pub fn at(&self, account: &Address, index: usize) -> Option<Checkpoint> {
        self.checkpoints
            .get(account)
            .and_then(|seq| seq.get(index))
            .copied()
    }
}
