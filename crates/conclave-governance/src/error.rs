use conclave_timelock::TimelockError;
use conclave_token::TokenError;
use thiserror::Error;

/// Errors that can occur in governance operations.
///
/// The message text is part of the observable contract; callers assert
/// against it verbatim.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GovernanceError {
    #[error("DAO Token::initialize: invalid voting period")]
    InvalidVotingPeriod,

    #[error("DAO Token::initialize: invalid voting delay")]
    InvalidVotingDelay,

    #[error("DAO Token::initialize: invalid proposal threshold")]
    InvalidProposalThreshold,

    #[error("DAO Token::initialize: invalid quorum votes")]
    InvalidQuorumVotes,

    #[error("DAO Token::propose: proposal function information arity mismatch")]
    ArityMismatch,

    #[error("DAO Token::propose: must provide actions")]
    NoActions,

    #[error("DAO Token::propose: too many actions")]
    TooManyActions,

    #[error("DAO Token::propose: proposer votes below proposal threshold")]
    ProposerBelowThreshold,

    #[error("DAO Token::propose: one live proposal per proposer, found an already pending proposal")]
    ProposerHasPendingProposal,

    #[error("DAO Token::propose: one live proposal per proposer, found an already active proposal")]
    ProposerHasActiveProposal,

    #[error("DAO Token::state: invalid proposal id")]
    InvalidProposalId,

    #[error("DAO Token::castVoteInternal: voting is closed")]
    VotingClosed,

    #[error("DAO Token::castVoteInternal: invalid vote type")]
    InvalidVoteType,

    #[error("DAO Token::castVoteInternal: voter already voted")]
    AlreadyVoted,

    #[error("DAO Token::castVoteBySig: invalid signature")]
    InvalidVoteSignature,

    #[error("DAO Token::queue: proposal can only be queued if it is succeeded")]
    QueueStateMismatch,

    #[error("DAO Token::queueOrRevertInternal: identical proposal action already queued at eta")]
    DuplicateQueuedAction,

    #[error("DAO Token::execute: proposal can only be executed if it is queued")]
    ExecuteStateMismatch,

    #[error("DAO Token::cancel: cannot cancel executed proposal")]
    CancelExecuted,

    #[error("DAO Token::cancel: cannot cancel canceled proposal")]
    CancelCanceled,

    #[error("DAO Token::cancel: cannot cancel vetoed proposal")]
    CancelVetoed,

    #[error("DAO Token::cancel: proposer above threshold")]
    ProposerAboveThreshold,

    #[error("DAO Token::veto: only vetoer")]
    VetoerOnly,

    #[error("DAO Token::veto: cannot veto executed proposal")]
    VetoExecuted,

    #[error("DAO Token::veto: cannot veto canceled proposal")]
    VetoCanceled,

    #[error("DAO Token::_setVetoer: vetoer only")]
    SetVetoerUnauthorized,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Timelock(#[from] TimelockError),
}
