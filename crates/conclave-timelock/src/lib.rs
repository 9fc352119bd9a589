//! Conclave Timelock - Delays and bounds execution of approved actions.
//!
//! This crate provides:
//! - A queued-action set keyed by content hash, with collision detection
//! - Minimum-delay and grace-window enforcement around execution
//! - Two-step admin handover
//!
//! Actual calls are dispatched through an injected [`ActionExecutor`]; the
//! queue itself never performs external effects.

pub mod error;
pub mod queue;

pub use error::TimelockError;
pub use queue::{
    ActionExecutor, CallError, QueuedAction, Timelock, GRACE_PERIOD, MAXIMUM_DELAY, MINIMUM_DELAY,
};
