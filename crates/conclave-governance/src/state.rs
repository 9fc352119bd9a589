use conclave_timelock::GRACE_PERIOD;
use conclave_types::{Clock, U256};

use crate::proposal::Proposal;

/// Lifecycle state of a proposal, derived on demand and never stored.
///
/// Discriminants are the wire encoding and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProposalState {
    Pending = 0,
    Active = 1,
    Canceled = 2,
    Defeated = 3,
    Succeeded = 4,
    Queued = 5,
    Expired = 6,
    Executed = 7,
    Vetoed = 8,
}

/// Derive a proposal's state from its stored flags and timestamps plus
/// the current clock.
///
/// The check order is significant: cancellation and veto dominate
/// everything, the voting window dominates tally-based outcomes, and a
/// defeated tally dominates queueing/execution. `quorum_votes` is the
/// caller's current-supply quorum, not a snapshot.
pub fn evaluate(proposal: &Proposal, quorum_votes: U256, clock: &Clock) -> ProposalState {
    if proposal.canceled {
        return ProposalState::Canceled;
    }
    if proposal.vetoed {
        return ProposalState::Vetoed;
    }
    if clock.block_number <= proposal.start_block {
        return ProposalState::Pending;
    }
    if clock.block_number <= proposal.end_block {
        return ProposalState::Active;
    }
    if proposal.for_votes <= proposal.against_votes || proposal.for_votes < quorum_votes {
        return ProposalState::Defeated;
    }
    if proposal.eta == 0 {
        return ProposalState::Succeeded;
    }
    if proposal.executed {
        return ProposalState::Executed;
    }
    if clock.timestamp >= proposal.eta + GRACE_PERIOD {
        return ProposalState::Expired;
    }
    ProposalState::Queued
}
