use crate::error::TypesError;

/// The host ledger's view of time: a block index paired with the block
/// timestamp, injected into every state transition.
///
/// Both components are monotonically non-decreasing. The governance core
/// never reads a wall clock; it only compares against the values carried
/// here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clock {
    /// Current block index
    pub block_number: u64,
    /// Current block timestamp (seconds)
    pub timestamp: u64,
}

impl Clock {
    /// Nominal seconds between consecutive blocks when rolling forward.
    pub const SECONDS_PER_BLOCK: u64 = 12;

    pub const fn new(block_number: u64, timestamp: u64) -> Self {
        Self {
            block_number,
            timestamp,
        }
    }

    /// Advance by `blocks`, moving the timestamp at the nominal block time.
    pub fn advance_blocks(&mut self, blocks: u64) {
        self.block_number += blocks;
        self.timestamp += blocks * Self::SECONDS_PER_BLOCK;
    }

    /// Advance the timestamp only (same block height).
    pub fn advance_seconds(&mut self, seconds: u64) {
        self.timestamp += seconds;
    }

    /// Jump to an explicit (block, timestamp) pair. Rejects regression.
    pub fn advance_to(&mut self, block_number: u64, timestamp: u64) -> Result<(), TypesError> {
        if block_number < self.block_number || timestamp < self.timestamp {
            return Err(TypesError::ClockRegression {
                from_block: self.block_number,
                to_block: block_number,
                from_time: self.timestamp,
                to_time: timestamp,
            });
        }
        self.block_number = block_number;
        self.timestamp = timestamp;
        Ok(())
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(1, 1)
    }
}
