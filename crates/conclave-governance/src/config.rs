use conclave_types::U256;

use crate::error::GovernanceError;

/// Governor parameters, fixed at construction.
///
/// Periods and delays are in blocks; threshold and quorum are basis
/// points of total supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GovernorConfig {
    /// Blocks between proposal creation and the start of voting
    pub voting_delay: u64,
    /// Blocks the voting window stays open
    pub voting_period: u64,
    /// Minimum proposer weight, in basis points of total supply
    pub proposal_threshold_bps: u64,
    /// Minimum for-votes for success, in basis points of total supply
    pub quorum_votes_bps: u64,
}

impl GovernorConfig {
    pub const MIN_VOTING_PERIOD: u64 = 5_760;
    pub const MAX_VOTING_PERIOD: u64 = 80_640;
    pub const MIN_VOTING_DELAY: u64 = 1;
    pub const MAX_VOTING_DELAY: u64 = 40_320;
    pub const MIN_PROPOSAL_THRESHOLD_BPS: u64 = 1;
    pub const MAX_PROPOSAL_THRESHOLD_BPS: u64 = 1_000;
    pub const MIN_QUORUM_VOTES_BPS: u64 = 200;
    pub const MAX_QUORUM_VOTES_BPS: u64 = 2_000;

    /// Most actions a single proposal may carry.
    pub const MAX_OPERATIONS: usize = 10;

    pub fn new(
        voting_delay: u64,
        voting_period: u64,
        proposal_threshold_bps: u64,
        quorum_votes_bps: u64,
    ) -> Result<Self, GovernanceError> {
        let config = Self {
            voting_delay,
            voting_period,
            proposal_threshold_bps,
            quorum_votes_bps,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GovernanceError> {
        if !(Self::MIN_VOTING_PERIOD..=Self::MAX_VOTING_PERIOD).contains(&self.voting_period) {
            return Err(GovernanceError::InvalidVotingPeriod);
        }
        if !(Self::MIN_VOTING_DELAY..=Self::MAX_VOTING_DELAY).contains(&self.voting_delay) {
            return Err(GovernanceError::InvalidVotingDelay);
        }
        if !(Self::MIN_PROPOSAL_THRESHOLD_BPS..=Self::MAX_PROPOSAL_THRESHOLD_BPS)
            .contains(&self.proposal_threshold_bps)
        {
            return Err(GovernanceError::InvalidProposalThreshold);
        }
        if !(Self::MIN_QUORUM_VOTES_BPS..=Self::MAX_QUORUM_VOTES_BPS)
            .contains(&self.quorum_votes_bps)
        {
            return Err(GovernanceError::InvalidQuorumVotes);
        }
        Ok(())
    }

    /// `bps * supply / 10_000`, the threshold/quorum hot path.
    pub fn bps_of(bps: u64, total_supply: U256) -> U256 {
        total_supply.saturating_mul(&U256::from(bps)) / U256::from(10_000u64)
    }

    pub fn proposal_threshold(&self, total_supply: U256) -> U256 {
        Self::bps_of(self.proposal_threshold_bps, total_supply)
    }

    /// Evaluated against supply at query time, not snapshotted.
    pub fn quorum_votes(&self, total_supply: U256) -> U256 {
        Self::bps_of(self.quorum_votes_bps, total_supply)
    }
}

impl Default for GovernorConfig {
    /// The reference deployment: ~1 hour delay, ~3 day period, 9%
    /// threshold, 10% quorum.
    fn default() -> Self {
        Self {
            voting_delay: 288,
            voting_period: 17_280,
            proposal_threshold_bps: 900,
            quorum_votes_bps: 1_000,
        }
    }
}
