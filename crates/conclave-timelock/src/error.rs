use thiserror::Error;

/// Errors that can occur in timelock operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimelockError {
    #[error("timelock: delay {delay} outside [{minimum}, {maximum}] seconds")]
    DelayOutOfRange {
        delay: u64,
        minimum: u64,
        maximum: u64,
    },

    #[error("timelock: estimated execution time must satisfy the delay")]
    EtaTooSoon { eta: u64, earliest: u64 },

    #[error("timelock: identical action already queued at eta")]
    DuplicateQueuedAction,

    #[error("timelock: action has not been queued")]
    ActionNotQueued,

    #[error("timelock: action has not surpassed its time lock")]
    TimelockNotReady { eta: u64, now: u64 },

    #[error("timelock: action is stale")]
    TimelockStale { deadline: u64, now: u64 },

    #[error("timelock: action reverted: {0}")]
    ActionReverted(String),

    #[error("timelock: unauthorized")]
    Unauthorized,
}
