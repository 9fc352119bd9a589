use thiserror::Error;

/// Errors that can occur in token and voting-ledger operations.
///
/// The message text is part of the observable contract; callers assert
/// against it verbatim.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TokenError {
    #[error("DAO Token::delegateBySig: invalid signature")]
    InvalidSignature,

    #[error("DAO Token::delegateBySig: invalid nonce")]
    InvalidNonce,

    #[error("DAO Token::delegateBySig: signature expired")]
    SignatureExpired,

    #[error("DAO Token::getPriorVotes: not yet determined")]
    NotYetDetermined,

    #[error("DAO Token::transfer: cannot transfer from the zero address")]
    TransferFromZeroAddress,

    #[error("DAO Token::transfer: cannot transfer to the zero address")]
    TransferToZeroAddress,

    #[error("DAO Token::transfer: transfer amount exceeds balance")]
    InsufficientBalance,

    #[error("DAO Token::transferFrom: transfer amount exceeds spender allowance")]
    InsufficientAllowance,
}
