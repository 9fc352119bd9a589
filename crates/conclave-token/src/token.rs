use std::collections::HashMap;

use conclave_crypto::{delegation_digest, RecoverableSignature, SignerRecovery, SigningDomain};
use conclave_types::{Address, Clock, U256};
use tracing::{debug, info};

use crate::checkpoints::{Checkpoint, CheckpointLedger};
use crate::error::TokenError;

pub const TOKEN_NAME: &str = "DAO Token";
pub const TOKEN_SYMBOL: &str = "DAO";
pub const TOKEN_DECIMALS: u8 = 18;

/// Initial supply minted to the deployer, in whole tokens.
pub const INITIAL_SUPPLY_TOKENS: u64 = 10_000_000;

/// Governance token: balance and allowance bookkeeping coupled to the
/// checkpointed voting-power ledger.
///
/// Voting weight follows delegation, not balances directly: an account's
/// balance only counts once the account has delegated (to itself or
/// someone else), and every balance change moves the delta on the current
/// delegate's checkpoint history.
#[derive(Debug)]
pub struct VotesToken {
    balances: HashMap<Address, U256>,
    allowances: HashMap<Address, HashMap<Address, U256>>,
    total_supply: U256,
    /// Absent key = never delegated; distinct from delegate == self.
    delegates: HashMap<Address, Address>,
    /// Replay protection for signed delegation, per signer.
    nonces: HashMap<Address, u64>,
    checkpoints: CheckpointLedger,
    domain: SigningDomain,
}

impl VotesToken {
    /// Mint the initial supply to `deployer`. `chain_id` is bound into the
    /// signing domain so signed messages cannot replay across deployments.
    pub fn new(deployer: Address, chain_id: u64) -> Self {
        let supply = U256::from(INITIAL_SUPPLY_TOKENS) * U256::UNIT;
        let mut balances = HashMap::new();
        balances.insert(deployer, supply);
        info!(%deployer, supply = %supply, "minted initial token supply");

        Self {
            balances,
            allowances: HashMap::new(),
            total_supply: supply,
            delegates: HashMap::new(),
            nonces: HashMap::new(),
            checkpoints: CheckpointLedger::new(),
            domain: SigningDomain::new(TOKEN_NAME, chain_id),
        }
    }

    pub fn name(&self) -> &'static str {
        TOKEN_NAME
    }

    pub fn symbol(&self) -> &'static str {
        TOKEN_SYMBOL
    }

    pub fn decimals(&self) -> u8 {
        TOKEN_DECIMALS
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn balance_of(&self, account: &Address) -> U256 {
        self.balances.get(account).copied().unwrap_or(U256::ZERO)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.allowances
            .get(owner)
            .and_then(|per_spender| per_spender.get(spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// The signing domain for delegation messages; callers build digests
    /// against it.
    pub fn domain(&self) -> &SigningDomain {
        &self.domain
    }

    pub fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, amount);
    }

    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
        clock: &Clock,
    ) -> Result<(), TokenError> {
        self.transfer_internal(from, to, amount, clock)
    }

    /// Spend `from`'s balance on behalf of `spender`. A `U256::MAX`
    /// allowance is infinite and never decremented.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
        clock: &Clock,
    ) -> Result<(), TokenError> {
        if spender != from {
            let allowed = self.allowance(&from, &spender);
            if allowed != U256::MAX {
                let remaining = allowed
                    .checked_sub(&amount)
                    .ok_or(TokenError::InsufficientAllowance)?;
                self.allowances
                    .entry(from)
                    .or_default()
                    .insert(spender, remaining);
            }
        }
        self.transfer_internal(from, to, amount, clock)
    }

    fn transfer_internal(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
        clock: &Clock,
    ) -> Result<(), TokenError> {
        if from.is_zero() {
            return Err(TokenError::TransferFromZeroAddress);
        }
        if to.is_zero() {
            return Err(TokenError::TransferToZeroAddress);
        }

        let from_old = self.balance_of(&from);
        let from_new = from_old
            .checked_sub(&amount)
            .ok_or(TokenError::InsufficientBalance)?;
        self.balances.insert(from, from_new);

        // Read after the debit so a self-transfer nets to zero
        let to_old = self.balance_of(&to);
        let to_new = to_old.saturating_add(&amount);
        self.balances.insert(to, to_new);

        self.on_balance_changed(from, from_old, from_new, clock.block_number);
        self.on_balance_changed(to, to_old, to_new, clock.block_number);
        Ok(())
    }

    /// Hook fired on every balance mutation: moves the delta on the
    /// account's current delegate. Accounts that never delegated produce
    /// no checkpoint activity.
    fn on_balance_changed(&mut self, account: Address, old_balance: U256, new_balance: U256, block: u64) {
        let Some(delegate) = self.delegates.get(&account).copied() else {
            return;
        };
        if new_balance >= old_balance {
            self.add_votes(delegate, new_balance - old_balance, block);
        } else {
            self.sub_votes(delegate, old_balance - new_balance, block);
        }
    }

    /// Set `caller`'s delegate, moving the caller's full balance-derived
    /// weight from the old delegate's running total to the new one's.
    pub fn delegate(&mut self, caller: Address, delegatee: Address, clock: &Clock) {
        let old_delegate = self.delegates.insert(caller, delegatee);
        if old_delegate == Some(delegatee) {
            return;
        }
        let amount = self.balance_of(&caller);
        info!(%caller, %delegatee, "delegate changed");

        if let Some(old) = old_delegate {
            self.sub_votes(old, amount, clock.block_number);
        }
        self.add_votes(delegatee, amount, clock.block_number);
    }

    /// Delegate on behalf of an off-chain signer.
    ///
    /// Checked in order: signature recovery, nonce, expiry. The signer's
    /// nonce increments only on success.
    pub fn delegate_by_sig(
        &mut self,
        delegatee: Address,
        nonce: u64,
        expiry: u64,
        sig: &RecoverableSignature,
        recovery: &dyn SignerRecovery,
        clock: &Clock,
    ) -> Result<Address, TokenError> {
        let digest = delegation_digest(&self.domain, delegatee, nonce, expiry);
        let signer = recovery
            .recover_signer(&digest, sig)
            .filter(|addr| !addr.is_zero())
            .ok_or(TokenError::InvalidSignature)?;

        let expected = self.nonces.get(&signer).copied().unwrap_or(0);
        if nonce != expected {
            return Err(TokenError::InvalidNonce);
        }
        if clock.timestamp > expiry {
            return Err(TokenError::SignatureExpired);
        }

        self.nonces.insert(signer, expected + 1);
        self.delegate(signer, delegatee, clock);
        Ok(signer)
    }

    /// Current delegate of `account`, `None` if it never delegated.
    pub fn delegates(&self, account: &Address) -> Option<Address> {
        self.delegates.get(account).copied()
    }

    /// Next expected delegation nonce for `account`.
    pub fn nonce(&self, account: &Address) -> u64 {
        self.nonces.get(account).copied().unwrap_or(0)
    }

    /// Weight at the latest checkpoint, or 0 if none.
    pub fn get_current_votes(&self, account: &Address) -> U256 {
        self.checkpoints.latest(account)
    }

    /// Weight as of `block`, which must be strictly before the current
    /// block.
    pub fn get_prior_votes(
        &self,
        account: &Address,
        block: u64,
        clock: &Clock,
    ) -> Result<U256, TokenError> {
        self.checkpoints.prior(account, block, clock.block_number)
    }

    pub fn num_checkpoints(&self, account: &Address) -> usize {
        self.checkpoints.len(account)
    }

    pub fn checkpoints(&self, account: &Address, index: usize) -> Option<Checkpoint> {
        self.checkpoints.at(account, index)
    }

    fn add_votes(&mut self, delegate: Address, amount: U256, block: u64) {
        if delegate.is_zero() || amount.is_zero() {
            return;
        }
        let old = self.checkpoints.latest(&delegate);
        let new = old.saturating_add(&amount);
        debug!(%delegate, block, old = %old, new = %new, "checkpoint write");
        self.checkpoints.write(delegate, new, block);
    }

    fn sub_votes(&mut self, delegate: Address, amount: U256, block: u64) {
        if delegate.is_zero() || amount.is_zero() {
            return;
        }
        let old = self.checkpoints.latest(&delegate);
        let new = old.saturating_sub(&amount);
        debug!(%delegate, block, old = %old, new = %new, "checkpoint write");
        self.checkpoints.write(delegate, new, block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_crypto::{Ed25519Recovery, Keypair};

    fn test_address(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::from_bytes(bytes)
    }

    fn setup() -> (VotesToken, Address, Clock) {
        let deployer = test_address(100);
        (VotesToken::new(deployer, 1), deployer, Clock::new(10, 1_000))
    }

    #[test]
    fn test_initial_supply_to_deployer() {
        let (token, deployer, _) = setup();
        let expected: U256 = "10000000000000000000000000".parse().unwrap();
        assert_eq!(token.balance_of(&deployer), expected);
        assert_eq!(token.total_supply(), expected);
        assert_eq!(token.name(), "DAO Token");
        assert_eq!(token.symbol(), "DAO");
        assert_eq!(token.decimals(), 18);
    }

    #[test]
    fn test_transfer_moves_balances() {
        let (mut token, deployer, clock) = setup();
        let recipient = test_address(2);
        let amount = U256::from(10u64) * U256::UNIT;

        let before = token.balance_of(&deployer);
        token.transfer(deployer, recipient, amount, &clock).unwrap();

        assert_eq!(token.balance_of(&deployer), before - amount);
        assert_eq!(token.balance_of(&recipient), amount);
    }

    #[test]
    fn test_transfer_rejects_zero_address_and_overdraft() {
        let (mut token, deployer, clock) = setup();
        let amount = U256::from(1u64);

        assert_eq!(
            token.transfer(Address::ZERO, deployer, amount, &clock),
            Err(TokenError::TransferFromZeroAddress)
        );
        assert_eq!(
            token.transfer(deployer, Address::ZERO, amount, &clock),
            Err(TokenError::TransferToZeroAddress)
        );

        let pauper = test_address(2);
        assert_eq!(
            token.transfer(pauper, deployer, amount, &clock),
            Err(TokenError::InsufficientBalance)
        );
    }

    #[test]
    fn test_self_transfer_is_neutral() {
        let (mut token, deployer, clock) = setup();
        token.delegate(deployer, deployer, &clock);
        let before = token.balance_of(&deployer);

        token
            .transfer(deployer, deployer, U256::from(100u64), &clock)
            .unwrap();
        assert_eq!(token.balance_of(&deployer), before);
        assert_eq!(token.get_current_votes(&deployer), before);
    }

    #[test]
    fn test_approve_and_allowance() {
        let (mut token, deployer, _) = setup();
        let spender = test_address(2);

        assert_eq!(token.allowance(&deployer, &spender), U256::ZERO);
        token.approve(deployer, spender, U256::from(100u64));
        assert_eq!(token.allowance(&deployer, &spender), U256::from(100u64));
        token.approve(deployer, spender, U256::from(40u64));
        assert_eq!(token.allowance(&deployer, &spender), U256::from(40u64));
    }

    #[test]
    fn test_transfer_from_decrements_allowance() {
        let (mut token, deployer, clock) = setup();
        let spender = test_address(2);
        let recipient = test_address(3);

        token.approve(deployer, spender, U256::from(100u64));
        token
            .transfer_from(spender, deployer, recipient, U256::from(60u64), &clock)
            .unwrap();
        assert_eq!(token.allowance(&deployer, &spender), U256::from(40u64));
        assert_eq!(token.balance_of(&recipient), U256::from(60u64));

        assert_eq!(
            token.transfer_from(spender, deployer, recipient, U256::from(41u64), &clock),
            Err(TokenError::InsufficientAllowance)
        );
    }

    #[test]
    fn test_infinite_allowance_not_decremented() {
        let (mut token, deployer, clock) = setup();
        let spender = test_address(2);
        let recipient = test_address(3);

        token.approve(deployer, spender, U256::MAX);
        token
            .transfer_from(spender, deployer, recipient, U256::from(60u64), &clock)
            .unwrap();
        assert_eq!(token.allowance(&deployer, &spender), U256::MAX);
    }

    #[test]
    fn test_self_spend_skips_allowance() {
        let (mut token, deployer, clock) = setup();
        let recipient = test_address(3);

        token
            .transfer_from(deployer, deployer, recipient, U256::from(5u64), &clock)
            .unwrap();
        assert_eq!(token.balance_of(&recipient), U256::from(5u64));
    }

    #[test]
    fn test_votes_activate_only_after_delegation() {
        let (mut token, deployer, clock) = setup();
        let holder = test_address(2);

        token
            .transfer(deployer, holder, U256::from(10u64), &clock)
            .unwrap();
        assert_eq!(token.get_current_votes(&holder), U256::ZERO);

        token.delegate(holder, holder, &clock);
        assert_eq!(token.get_current_votes(&holder), U256::from(10u64));
    }

    #[test]
    fn test_delegation_moves_weight_without_checkpointing_delegator() {
        // Deployer holds everything; A receives 100 and delegates to B.
        // B ends with one checkpoint of 100; A has none, its balance was
        // never activated under its own name.
        let (mut token, deployer, clock) = setup();
        let a = test_address(2);
        let b = test_address(3);

        token.transfer(deployer, a, U256::from(100u64), &clock).unwrap();
        token.delegate(a, b, &clock);

        assert_eq!(token.num_checkpoints(&b), 1);
        assert_eq!(token.get_current_votes(&b), U256::from(100u64));
        assert_eq!(token.num_checkpoints(&a), 0);
        assert_eq!(token.delegates(&a), Some(b));
        assert_eq!(token.delegates(&b), None);
    }

    #[test]
    fn test_redelegation_moves_weight_between_delegates() {
        let (mut token, deployer, mut clock) = setup();
        let holder = test_address(2);
        let first = test_address(3);
        let second = test_address(4);

        token
            .transfer(deployer, holder, U256::from(100u64), &clock)
            .unwrap();
        token.delegate(holder, first, &clock);
        clock.advance_blocks(1);
        token.delegate(holder, second, &clock);

        assert_eq!(token.get_current_votes(&first), U256::ZERO);
        assert_eq!(token.get_current_votes(&second), U256::from(100u64));
        assert_eq!(token.num_checkpoints(&first), 2);
    }

    #[test]
    fn test_checkpoint_sequence_tracks_transfers() {
        // The ledger scenario: delegate 100 in, spend 10 twice, receive 20.
        let (mut token, deployer, mut clock) = setup();
        let holder = test_address(2);
        let delegate = test_address(3);
        let sink = test_address(4);

        token
            .transfer(deployer, holder, U256::from(100u64), &clock)
            .unwrap();
        assert_eq!(token.num_checkpoints(&delegate), 0);

        clock.advance_blocks(1);
        token.delegate(holder, delegate, &clock);
        let b1 = clock.block_number;
        clock.advance_blocks(1);
        token.transfer(holder, sink, U256::from(10u64), &clock).unwrap();
        let b2 = clock.block_number;
        clock.advance_blocks(1);
        token.transfer(holder, sink, U256::from(10u64), &clock).unwrap();
        let b3 = clock.block_number;
        clock.advance_blocks(1);
        token
            .transfer(deployer, holder, U256::from(20u64), &clock)
            .unwrap();
        let b4 = clock.block_number;

        assert_eq!(token.num_checkpoints(&delegate), 4);
        let expected = [
            (b1, 100u64),
            (b2, 90),
            (b3, 80),
            (b4, 100),
        ];
        for (i, (block, votes)) in expected.iter().enumerate() {
            let cp = token.checkpoints(&delegate, i).unwrap();
            assert_eq!(cp.from_block, *block);
            assert_eq!(cp.votes, U256::from(*votes));
        }
    }

    #[test]
    fn test_same_block_activity_coalesces_to_one_checkpoint() {
        // Delegation plus two transfers without advancing the clock: one
        // checkpoint holding only the final cumulative weight.
        let (mut token, deployer, clock) = setup();
        let holder = test_address(2);
        let delegate = test_address(3);
        let sink = test_address(4);

        token
            .transfer(deployer, holder, U256::from(100u64), &clock)
            .unwrap();
        token.delegate(holder, delegate, &clock);
        token.transfer(holder, sink, U256::from(10u64), &clock).unwrap();
        token.transfer(holder, sink, U256::from(10u64), &clock).unwrap();

        assert_eq!(token.num_checkpoints(&delegate), 1);
        let cp = token.checkpoints(&delegate, 0).unwrap();
        assert_eq!(cp.from_block, clock.block_number);
        assert_eq!(cp.votes, U256::from(80u64));
    }

    #[test]
    fn test_get_prior_votes_ladder() {
        let (mut token, deployer, mut clock) = setup();
        let delegate = test_address(2);

        clock.advance_blocks(1);
        token.delegate(deployer, delegate, &clock);
        let at = clock.block_number;
        clock.advance_blocks(2);

        assert_eq!(
            token.get_prior_votes(&delegate, at - 1, &clock).unwrap(),
            U256::ZERO
        );
        assert_eq!(
            token.get_prior_votes(&delegate, at, &clock).unwrap(),
            token.total_supply()
        );
        assert_eq!(
            token.get_prior_votes(&delegate, at + 1, &clock).unwrap(),
            token.total_supply()
        );
        assert_eq!(
            token.get_prior_votes(&delegate, clock.block_number, &clock),
            Err(TokenError::NotYetDetermined)
        );
    }

    #[test]
    fn test_delegate_by_sig_happy_path() {
        let (mut token, _, clock) = setup();
        let signer = Keypair::generate();
        let delegatee = test_address(2);

        let digest = delegation_digest(token.domain(), delegatee, 0, 10_000_000_000);
        let sig = signer.sign_recoverable(&digest);

        assert_eq!(token.delegates(&signer.address()), None);
        let recovered = token
            .delegate_by_sig(delegatee, 0, 10_000_000_000, &sig, &Ed25519Recovery, &clock)
            .unwrap();
        assert_eq!(recovered, signer.address());
        assert_eq!(token.delegates(&signer.address()), Some(delegatee));
        assert_eq!(token.nonce(&signer.address()), 1);
    }

    #[test]
    fn test_delegate_by_sig_rejects_invalid_signature() {
        let (mut token, _, clock) = setup();
        let signer = Keypair::generate();
        let delegatee = test_address(2);

        // Signed over a different delegatee, so recovery fails
        let digest = delegation_digest(token.domain(), test_address(3), 0, 10_000_000_000);
        let sig = signer.sign_recoverable(&digest);

        let err = token
            .delegate_by_sig(delegatee, 0, 10_000_000_000, &sig, &Ed25519Recovery, &clock)
            .unwrap_err();
        assert_eq!(err.to_string(), "DAO Token::delegateBySig: invalid signature");
    }

    #[test]
    fn test_delegate_by_sig_rejects_bad_nonce() {
        let (mut token, _, clock) = setup();
        let signer = Keypair::generate();
        let delegatee = test_address(2);

        let digest = delegation_digest(token.domain(), delegatee, 1, 0);
        let sig = signer.sign_recoverable(&digest);

        let err = token
            .delegate_by_sig(delegatee, 1, 0, &sig, &Ed25519Recovery, &clock)
            .unwrap_err();
        assert_eq!(err.to_string(), "DAO Token::delegateBySig: invalid nonce");
    }

    #[test]
    fn test_delegate_by_sig_rejects_expired() {
        let (mut token, _, clock) = setup();
        let signer = Keypair::generate();
        let delegatee = test_address(2);

        let digest = delegation_digest(token.domain(), delegatee, 0, 0);
        let sig = signer.sign_recoverable(&digest);

        let err = token
            .delegate_by_sig(delegatee, 0, 0, &sig, &Ed25519Recovery, &clock)
            .unwrap_err();
        assert_eq!(err.to_string(), "DAO Token::delegateBySig: signature expired");
        // Nonce untouched on failure
        assert_eq!(token.nonce(&signer.address()), 0);
    }
}
