use std::collections::HashMap;

use conclave_crypto::{ballot_digest, RecoverableSignature, SignerRecovery, SigningDomain};
use conclave_timelock::{ActionExecutor, QueuedAction, Timelock, TimelockError};
use conclave_token::VotesToken;
use conclave_types::{Address, Clock, U256};
use tracing::{info, warn};

use crate::config::GovernorConfig;
use crate::error::GovernanceError;
use crate::proposal::{Proposal, ProposalAction, VoteReceipt, VoteSupport};
use crate::state::{evaluate, ProposalState};

/// Proposal registry and lifecycle operations.
///
/// Owns the timelock it queues into. Reads voting weight and supply from
/// the token passed per call; it never mutates token state.
#[derive(Debug)]
pub struct Governor {
    config: GovernorConfig,
    vetoer: Address,
    timelock: Timelock,
    /// Arena of all proposals ever created; id = index + 1.
    proposals: Vec<Proposal>,
    latest_proposal_ids: HashMap<Address, u64>,
    domain: SigningDomain,
}

impl Governor {
    pub fn new(
        config: GovernorConfig,
        timelock: Timelock,
        vetoer: Address,
        domain: SigningDomain,
    ) -> Result<Self, GovernanceError> {
        config.validate()?;
        Ok(Self {
            config,
            vetoer,
            timelock,
            proposals: Vec::new(),
            latest_proposal_ids: HashMap::new(),
            domain,
        })
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    pub fn vetoer(&self) -> Address {
        self.vetoer
    }

    pub fn timelock(&self) -> &Timelock {
        &self.timelock
    }

    pub fn timelock_mut(&mut self) -> &mut Timelock {
        &mut self.timelock
    }

    pub fn proposal_count(&self) -> u64 {
        self.proposals.len() as u64
    }

    pub fn proposal(&self, id: u64) -> Result<&Proposal, GovernanceError> {
        if id == 0 || id > self.proposals.len() as u64 {
            return Err(GovernanceError::InvalidProposalId);
        }
        Ok(&self.proposals[(id - 1) as usize])
    }

    fn proposal_mut(&mut self, id: u64) -> Result<&mut Proposal, GovernanceError> {
        if id == 0 || id > self.proposals.len() as u64 {
            return Err(GovernanceError::InvalidProposalId);
        }
        Ok(&mut self.proposals[(id - 1) as usize])
    }

    pub fn get_receipt(&self, id: u64, voter: &Address) -> Result<Option<VoteReceipt>, GovernanceError> {
        Ok(self.proposal(id)?.receipt(voter).copied())
    }

    pub fn latest_proposal_id(&self, proposer: &Address) -> Option<u64> {
        self.latest_proposal_ids.get(proposer).copied()
    }

    pub fn proposal_threshold(&self, token: &VotesToken) -> U256 {
        self.config.proposal_threshold(token.total_supply())
    }

    pub fn quorum_votes(&self, token: &VotesToken) -> U256 {
        self.config.quorum_votes(token.total_supply())
    }

    /// Derive the proposal's lifecycle state against the current clock.
    pub fn state(
        &self,
        id: u64,
        token: &VotesToken,
        clock: &Clock,
    ) -> Result<ProposalState, GovernanceError> {
        let proposal = self.proposal(id)?;
        Ok(evaluate(proposal, self.quorum_votes(token), clock))
    }

    /// Create a proposal from four parallel action arrays.
    #[allow(clippy::too_many_arguments)]
    pub fn propose(
        &mut self,
        proposer: Address,
        targets: Vec<Address>,
        values: Vec<U256>,
        signatures: Vec<String>,
        calldatas: Vec<Vec<u8>>,
        description: &str,
        token: &VotesToken,
        clock: &Clock,
    ) -> Result<u64, GovernanceError> {
        if targets.len() != values.len()
            || targets.len() != signatures.len()
            || targets.len() != calldatas.len()
        {
            return Err(GovernanceError::ArityMismatch);
        }
        if targets.is_empty() {
            return Err(GovernanceError::NoActions);
        }
        if targets.len() > GovernorConfig::MAX_OPERATIONS {
            return Err(GovernanceError::TooManyActions);
        }

        let weight =
            token.get_prior_votes(&proposer, clock.block_number.saturating_sub(1), clock)?;
        if weight < self.proposal_threshold(token) {
            return Err(GovernanceError::ProposerBelowThreshold);
        }

        if let Some(latest) = self.latest_proposal_id(&proposer) {
            match self.state(latest, token, clock)? {
                ProposalState::Pending => {
                    return Err(GovernanceError::ProposerHasPendingProposal)
                }
                ProposalState::Active => return Err(GovernanceError::ProposerHasActiveProposal),
                _ => {}
            }
        }

        let actions = targets
            .into_iter()
            .zip(values)
            .zip(signatures)
            .zip(calldatas)
            .map(|(((target, value), signature), data)| ProposalAction {
                target,
                value,
                signature,
                data,
            })
            .collect();

        let id = self.proposals.len() as u64 + 1;
        let start_block = clock.block_number + self.config.voting_delay;
        let end_block = start_block + self.config.voting_period;
        self.proposals.push(Proposal::new(
            id,
            proposer,
            actions,
            description.to_string(),
            start_block,
            end_block,
        ));
        self.latest_proposal_ids.insert(proposer, id);
        info!(id, %proposer, start_block, end_block, "proposal created");
        Ok(id)
    }

    /// Cast a vote with the voter's weight at the proposal's snapshot
    /// block. Returns the weight counted.
    pub fn cast_vote(
        &mut self,
        voter: Address,
        id: u64,
        support: u8,
        token: &VotesToken,
        clock: &Clock,
    ) -> Result<U256, GovernanceError> {
        if self.state(id, token, clock)? != ProposalState::Active {
            return Err(GovernanceError::VotingClosed);
        }
        let support = VoteSupport::from_u8(support)?;

        let proposal = self.proposal_mut(id)?;
        if proposal.receipts.contains_key(&voter) {
            return Err(GovernanceError::AlreadyVoted);
        }

        let votes = token.get_prior_votes(&voter, proposal.start_block, clock)?;
        match support {
            VoteSupport::For => proposal.for_votes += votes,
            VoteSupport::Against => proposal.against_votes += votes,
        }
        proposal.receipts.insert(
            voter,
            VoteReceipt {
                has_voted: true,
                support,
                votes,
            },
        );
        info!(id, %voter, ?support, votes = %votes, "vote cast");
        Ok(votes)
    }

    /// Cast a vote on behalf of an off-chain signer.
    pub fn cast_vote_by_sig(
        &mut self,
        id: u64,
        support: u8,
        sig: &RecoverableSignature,
        recovery: &dyn SignerRecovery,
        token: &VotesToken,
        clock: &Clock,
    ) -> Result<U256, GovernanceError> {
        let digest = ballot_digest(&self.domain, id, support);
        let voter = recovery
            .recover_signer(&digest, sig)
            .filter(|addr| !addr.is_zero())
            .ok_or(GovernanceError::InvalidVoteSignature)?;
        self.cast_vote(voter, id, support, token, clock)
    }

    /// Schedule a succeeded proposal's actions, all at `now + delay`.
    ///
    /// Atomic: if any action collides with one already queued, the ones
    /// queued so far are withdrawn before the error returns.
    pub fn queue(
        &mut self,
        id: u64,
        token: &VotesToken,
        clock: &Clock,
    ) -> Result<(), GovernanceError> {
        if self.state(id, token, clock)? != ProposalState::Succeeded {
            return Err(GovernanceError::QueueStateMismatch);
        }

        let eta = clock.timestamp + self.timelock.delay();
        let proposal = &self.proposals[(id - 1) as usize];
        for (i, action) in proposal.actions.iter().enumerate() {
            let queued = to_queued_action(action, eta);
            if let Err(err) = self.timelock.queue_action(&queued, clock.timestamp) {
                for earlier in &proposal.actions[..i] {
                    self.timelock.cancel_action(&to_queued_action(earlier, eta));
                }
                return Err(match err {
                    TimelockError::DuplicateQueuedAction => GovernanceError::DuplicateQueuedAction,
                    other => GovernanceError::Timelock(other),
                });
            }
        }

        self.proposals[(id - 1) as usize].eta = eta;
        info!(id, eta, "proposal queued");
        Ok(())
    }

    /// Execute a queued proposal's actions in order.
    ///
    /// Atomic with respect to ledger state: a failure at any action
    /// restores the queued-action set, leaves `executed` unset, and the
    /// proposal remains `Queued`, retryable within the grace window.
    pub fn execute(
        &mut self,
        id: u64,
        executor: &mut dyn ActionExecutor,
        token: &VotesToken,
        clock: &Clock,
    ) -> Result<(), GovernanceError> {
        if self.state(id, token, clock)? != ProposalState::Queued {
            return Err(GovernanceError::ExecuteStateMismatch);
        }

        let proposal = &self.proposals[(id - 1) as usize];
        let eta = proposal.eta;
        for (i, action) in proposal.actions.iter().enumerate() {
            let queued = to_queued_action(action, eta);
            if let Err(err) = self
                .timelock
                .execute_action(&queued, clock.timestamp, executor)
            {
                warn!(id, action = i, error = %err, "execution aborted, restoring queue");
                for earlier in &proposal.actions[..i] {
                    self.timelock.restore_action(&to_queued_action(earlier, eta));
                }
                return Err(err.into());
            }
        }

        self.proposals[(id - 1) as usize].executed = true;
        info!(id, "proposal executed");
        Ok(())
    }

    /// Cancel a proposal. The proposer may cancel any time before
    /// execution; anyone may cancel once the proposer's weight has
    /// dropped below the proposal threshold.
    pub fn cancel(
        &mut self,
        caller: Address,
        id: u64,
        token: &VotesToken,
        clock: &Clock,
    ) -> Result<(), GovernanceError> {
        let proposal = self.proposal(id)?;
        if proposal.executed {
            return Err(GovernanceError::CancelExecuted);
        }
        if proposal.canceled {
            return Err(GovernanceError::CancelCanceled);
        }
        if proposal.vetoed {
            return Err(GovernanceError::CancelVetoed);
        }

        if caller != proposal.proposer {
            let weight = token.get_prior_votes(
                &proposal.proposer,
                clock.block_number.saturating_sub(1),
                clock,
            )?;
            if weight >= self.proposal_threshold(token) {
                return Err(GovernanceError::ProposerAboveThreshold);
            }
        }

        self.discard(id);
        self.proposals[(id - 1) as usize].canceled = true;
        info!(id, %caller, "proposal canceled");
        Ok(())
    }

    /// Veto a proposal; vetoer only, usable any time before execution.
    pub fn veto(&mut self, caller: Address, id: u64) -> Result<(), GovernanceError> {
        if caller != self.vetoer {
            return Err(GovernanceError::VetoerOnly);
        }
        let proposal = self.proposal(id)?;
        if proposal.executed {
            return Err(GovernanceError::VetoExecuted);
        }
        if proposal.canceled {
            return Err(GovernanceError::VetoCanceled);
        }

        self.discard(id);
        self.proposals[(id - 1) as usize].vetoed = true;
        info!(id, "proposal vetoed");
        Ok(())
    }

    /// Withdraw a proposal's actions from the timelock, if it was queued.
    fn discard(&mut self, id: u64) {
        let proposal = &self.proposals[(id - 1) as usize];
        if proposal.eta == 0 {
            return;
        }
        let eta = proposal.eta;
        for action in &proposal.actions {
            self.timelock.cancel_action(&to_queued_action(action, eta));
        }
    }

    pub fn set_vetoer(&mut self, caller: Address, new_vetoer: Address) -> Result<(), GovernanceError> {
        if caller != self.vetoer {
            return Err(GovernanceError::SetVetoerUnauthorized);
        }
        self.vetoer = new_vetoer;
        Ok(())
    }
}

fn to_queued_action(action: &ProposalAction, eta: u64) -> QueuedAction {
    QueuedAction {
        target: action.target,
        value: action.value,
        signature: action.signature.clone(),
        data: action.data.clone(),
        eta,
    }
}
