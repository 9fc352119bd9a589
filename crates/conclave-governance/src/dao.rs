use conclave_crypto::{Ed25519Recovery, RecoverableSignature, SignerRecovery, SigningDomain};
use conclave_timelock::{ActionExecutor, Timelock, TimelockError};
use conclave_token::{Checkpoint, TokenError, VotesToken, TOKEN_NAME};
use conclave_types::{Address, Clock, U256};
use parking_lot::Mutex;

use crate::config::GovernorConfig;
use crate::error::GovernanceError;
use crate::governor::Governor;
use crate::proposal::{Proposal, VoteReceipt};
use crate::state::ProposalState;

struct DaoInner {
    clock: Clock,
    token: VotesToken,
    governor: Governor,
    recovery: Box<dyn SignerRecovery + Send>,
}

/// The assembled governance system behind a single lock.
///
/// Every operation acquires the mutex, reads the clock, and delegates to
/// the components, reproducing the host ledger's single-writer model: one
/// global, strictly ordered sequence of atomic transitions. Validation
/// precedes mutation in every component operation, so a returned error
/// implies no state change.
pub struct Dao {
    inner: Mutex<DaoInner>,
}

impl Dao {
    /// Assemble a deployment: mint the supply to `deployer`, stand up the
    /// timelock (admin = `deployer`) and governor.
    pub fn new(
        deployer: Address,
        vetoer: Address,
        chain_id: u64,
        config: GovernorConfig,
        timelock_delay: u64,
    ) -> Result<Self, GovernanceError> {
        let token = VotesToken::new(deployer, chain_id);
        let timelock = Timelock::new(deployer, timelock_delay)?;
        let governor = Governor::new(
            config,
            timelock,
            vetoer,
            SigningDomain::new(TOKEN_NAME, chain_id),
        )?;
        Ok(Self {
            inner: Mutex::new(DaoInner {
                clock: Clock::default(),
                token,
                governor,
                recovery: Box::new(Ed25519Recovery),
            }),
        })
    }

    /// Swap the signer-recovery capability.
    pub fn with_recovery(self, recovery: Box<dyn SignerRecovery + Send>) -> Self {
        self.inner.lock().recovery = recovery;
        self
    }

    // --- host-driven clock ---

    pub fn clock(&self) -> Clock {
        self.inner.lock().clock
    }

    pub fn advance_blocks(&self, blocks: u64) {
        self.inner.lock().clock.advance_blocks(blocks);
    }

    pub fn advance_seconds(&self, seconds: u64) {
        self.inner.lock().clock.advance_seconds(seconds);
    }

    // --- token surface ---

    pub fn balance_of(&self, account: Address) -> U256 {
        self.inner.lock().token.balance_of(&account)
    }

    pub fn total_supply(&self) -> U256 {
        self.inner.lock().token.total_supply()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.inner.lock().token.allowance(&owner, &spender)
    }

    pub fn approve(&self, caller: Address, spender: Address, amount: U256) {
        self.inner.lock().token.approve(caller, spender, amount);
    }

    pub fn transfer(&self, caller: Address, to: Address, amount: U256) -> Result<(), TokenError> {
        let inner = &mut *self.inner.lock();
        inner.token.transfer(caller, to, amount, &inner.clock)
    }

    pub fn transfer_from(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        let inner = &mut *self.inner.lock();
        inner.token.transfer_from(caller, from, to, amount, &inner.clock)
    }

    // --- delegation and voting power ---

    pub fn delegate(&self, caller: Address, delegatee: Address) {
        let inner = &mut *self.inner.lock();
        inner.token.delegate(caller, delegatee, &inner.clock);
    }

    pub fn delegate_by_sig(
        &self,
        delegatee: Address,
        nonce: u64,
        expiry: u64,
        sig: &RecoverableSignature,
    ) -> Result<Address, TokenError> {
        let inner = &mut *self.inner.lock();
        inner.token.delegate_by_sig(
            delegatee,
            nonce,
            expiry,
            sig,
            inner.recovery.as_ref(),
            &inner.clock,
        )
    }

    pub fn delegates(&self, account: Address) -> Option<Address> {
        self.inner.lock().token.delegates(&account)
    }

    pub fn get_current_votes(&self, account: Address) -> U256 {
        self.inner.lock().token.get_current_votes(&account)
    }

    pub fn get_prior_votes(&self, account: Address, block: u64) -> Result<U256, TokenError> {
        let inner = &*self.inner.lock();
        inner.token.get_prior_votes(&account, block, &inner.clock)
    }

    pub fn num_checkpoints(&self, account: Address) -> usize {
        self.inner.lock().token.num_checkpoints(&account)
    }

    pub fn checkpoints(&self, account: Address, index: usize) -> Option<Checkpoint> {
        self.inner.lock().token.checkpoints(&account, index)
    }

    // --- proposal lifecycle ---

    pub fn propose(
        &self,
        caller: Address,
        targets: Vec<Address>,
        values: Vec<U256>,
        signatures: Vec<String>,
        calldatas: Vec<Vec<u8>>,
        description: &str,
    ) -> Result<u64, GovernanceError> {
        let inner = &mut *self.inner.lock();
        inner.governor.propose(
            caller,
            targets,
            values,
            signatures,
            calldatas,
            description,
            &inner.token,
            &inner.clock,
        )
    }

    pub fn cast_vote(&self, caller: Address, id: u64, support: u8) -> Result<U256, GovernanceError> {
        let inner = &mut *self.inner.lock();
        inner
            .governor
            .cast_vote(caller, id, support, &inner.token, &inner.clock)
    }

    pub fn cast_vote_by_sig(
        &self,
        id: u64,
        support: u8,
        sig: &RecoverableSignature,
    ) -> Result<U256, GovernanceError> {
        let inner = &mut *self.inner.lock();
        inner.governor.cast_vote_by_sig(
            id,
            support,
            sig,
            inner.recovery.as_ref(),
            &inner.token,
            &inner.clock,
        )
    }

    pub fn state(&self, id: u64) -> Result<ProposalState, GovernanceError> {
        let inner = &*self.inner.lock();
        inner.governor.state(id, &inner.token, &inner.clock)
    }

    pub fn queue(&self, id: u64) -> Result<(), GovernanceError> {
        let inner = &mut *self.inner.lock();
        inner.governor.queue(id, &inner.token, &inner.clock)
    }

    pub fn execute(&self, id: u64, executor: &mut dyn ActionExecutor) -> Result<(), GovernanceError> {
        let inner = &mut *self.inner.lock();
        inner
            .governor
            .execute(id, executor, &inner.token, &inner.clock)
    }

    pub fn cancel(&self, caller: Address, id: u64) -> Result<(), GovernanceError> {
        let inner = &mut *self.inner.lock();
        inner.governor.cancel(caller, id, &inner.token, &inner.clock)
    }

    pub fn veto(&self, caller: Address, id: u64) -> Result<(), GovernanceError> {
        self.inner.lock().governor.veto(caller, id)
    }

    pub fn set_vetoer(&self, caller: Address, new_vetoer: Address) -> Result<(), GovernanceError> {
        self.inner.lock().governor.set_vetoer(caller, new_vetoer)
    }

    // --- views ---

    pub fn proposal(&self, id: u64) -> Result<Proposal, GovernanceError> {
        self.inner.lock().governor.proposal(id).cloned()
    }

    pub fn get_receipt(&self, id: u64, voter: Address) -> Result<Option<VoteReceipt>, GovernanceError> {
        self.inner.lock().governor.get_receipt(id, &voter)
    }

    pub fn latest_proposal_id(&self, proposer: Address) -> Option<u64> {
        self.inner.lock().governor.latest_proposal_id(&proposer)
    }

    pub fn proposal_count(&self) -> u64 {
        self.inner.lock().governor.proposal_count()
    }

    pub fn proposal_threshold(&self) -> U256 {
        let inner = &*self.inner.lock();
        inner.governor.proposal_threshold(&inner.token)
    }

    pub fn quorum_votes(&self) -> U256 {
        let inner = &*self.inner.lock();
        inner.governor.quorum_votes(&inner.token)
    }

    pub fn vetoer(&self) -> Address {
        self.inner.lock().governor.vetoer()
    }

    // --- timelock admin ---

    pub fn timelock_delay(&self) -> u64 {
        self.inner.lock().governor.timelock().delay()
    }

    pub fn timelock_admin(&self) -> Address {
        self.inner.lock().governor.timelock().admin()
    }

    pub fn timelock_pending_admin(&self) -> Option<Address> {
        self.inner.lock().governor.timelock().pending_admin()
    }

    pub fn set_pending_admin(&self, caller: Address, new_admin: Address) -> Result<(), TimelockError> {
        self.inner
            .lock()
            .governor
            .timelock_mut()
            .set_pending_admin(caller, new_admin)
    }

    pub fn accept_admin(&self, caller: Address) -> Result<(), TimelockError> {
        self.inner.lock().governor.timelock_mut().accept_admin(caller)
    }
}
