use std::collections::HashSet;
use std::fmt;

use conclave_types::{Address, Hash, U256};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::TimelockError;

/// Window after eta during which a queued action remains executable.
pub const GRACE_PERIOD: u64 = 14 * 24 * 60 * 60;

/// Smallest allowed queueing delay.
pub const MINIMUM_DELAY: u64 = 2 * 24 * 60 * 60;

/// Largest allowed queueing delay.
pub const MAXIMUM_DELAY: u64 = 30 * 24 * 60 * 60;

/// An action scheduled for delayed execution.
///
/// Identity is the content hash over all five fields; two structurally
/// identical actions at the same eta collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedAction {
    pub target: Address,
    pub value: U256,
    pub signature: String,
    pub data: Vec<u8>,
    /// Earliest execution timestamp
    pub eta: u64,
}

impl QueuedAction {
    /// Content hash identifying this action in the queue. Variable-length
    /// fields are length-prefixed so field boundaries cannot collide.
    pub fn hash(&self) -> Hash {
        Hash::compute_multi(&[
            self.target.as_bytes(),
            &self.value.to_be_bytes(),
            &(self.signature.len() as u64).to_be_bytes(),
            self.signature.as_bytes(),
            &(self.data.len() as u64).to_be_bytes(),
            &self.data,
            &self.eta.to_be_bytes(),
        ])
    }
}

impl fmt::Display for QueuedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} eta={}", self.signature, self.target, self.eta)
    }
}

/// Failure reported by the host's call mechanism.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{0}")]
pub struct CallError(pub String);

/// The host's call mechanism, injected so the queue never performs real
/// calls itself.
pub trait ActionExecutor {
    fn call(&mut self, action: &QueuedAction) -> Result<(), CallError>;
}

/// Schedules, cancels, and executes approved actions under a minimum
/// delay and a bounded execution window.
#[derive(Debug)]
pub struct Timelock {
    admin: Address,
    pending_admin: Option<Address>,
    delay: u64,
    queued: HashSet<Hash>,
}

impl Timelock {
    /// `delay` must lie within `[MINIMUM_DELAY, MAXIMUM_DELAY]`.
    pub fn new(admin: Address, delay: u64) -> Result<Self, TimelockError> {
        if !(MINIMUM_DELAY..=MAXIMUM_DELAY).contains(&delay) {
            return Err(TimelockError::DelayOutOfRange {
                delay,
                minimum: MINIMUM_DELAY,
                maximum: MAXIMUM_DELAY,
            });
        }
        Ok(Self {
            admin,
            pending_admin: None,
            delay,
            queued: HashSet::new(),
        })
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    pub fn pending_admin(&self) -> Option<Address> {
        self.pending_admin
    }

    pub fn delay(&self) -> u64 {
        self.delay
    }

    pub fn is_queued(&self, hash: &Hash) -> bool {
        self.queued.contains(hash)
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    /// Schedule an action. Its eta must satisfy the delay, and no identical
    /// action may already be queued.
    pub fn queue_action(&mut self, action: &QueuedAction, now: u64) -> Result<Hash, TimelockError> {
        let earliest = now + self.delay;
        if action.eta < earliest {
            return Err(TimelockError::EtaTooSoon {
                eta: action.eta,
                earliest,
            });
        }
        let hash = action.hash();
        if !self.queued.insert(hash) {
            return Err(TimelockError::DuplicateQueuedAction);
        }
        info!(action = %action, %hash, "action queued");
        Ok(hash)
    }

    /// Remove an action if present. Idempotent: cancelling an unknown
    /// action is a no-op.
    pub fn cancel_action(&mut self, action: &QueuedAction) {
        if self.queued.remove(&action.hash()) {
            info!(action = %action, "action cancelled");
        }
    }

    /// Execute a queued action whose eta has passed but whose grace window
    /// has not. Dispatches through `executor`; on call failure the action
    /// stays queued and the failure surfaces as `ActionReverted`.
    pub fn execute_action(
        &mut self,
        action: &QueuedAction,
        now: u64,
        executor: &mut dyn ActionExecutor,
    ) -> Result<(), TimelockError> {
        let hash = action.hash();
        if !self.queued.contains(&hash) {
            return Err(TimelockError::ActionNotQueued);
        }
        if now < action.eta {
            return Err(TimelockError::TimelockNotReady {
                eta: action.eta,
                now,
            });
        }
        let deadline = action.eta + GRACE_PERIOD;
        if now > deadline {
            return Err(TimelockError::TimelockStale { deadline, now });
        }

        self.queued.remove(&hash);
        if let Err(err) = executor.call(action) {
            self.queued.insert(hash);
            warn!(action = %action, error = %err, "action reverted");
            return Err(TimelockError::ActionReverted(err.to_string()));
        }
        info!(action = %action, "action executed");
        Ok(())
    }

    /// Re-insert an action's hash. Used by callers restoring queue state
    /// when a multi-action execution aborts partway.
    pub fn restore_action(&mut self, action: &QueuedAction) {
        self.queued.insert(action.hash());
    }

    /// First phase of the admin handover; current admin only.
    pub fn set_pending_admin(
        &mut self,
        caller: Address,
        new_admin: Address,
    ) -> Result<(), TimelockError> {
        if caller != self.admin {
            return Err(TimelockError::Unauthorized);
        }
        self.pending_admin = Some(new_admin);
        info!(%new_admin, "pending admin set");
        Ok(())
    }

    /// Second phase: must be invoked by the pending admin exactly.
    pub fn accept_admin(&mut self, caller: Address) -> Result<(), TimelockError> {
        if self.pending_admin != Some(caller) {
            return Err(TimelockError::Unauthorized);
        }
        self.admin = caller;
        self.pending_admin = None;
        info!(admin = %caller, "admin handover complete");
        Ok(())
    }
}
