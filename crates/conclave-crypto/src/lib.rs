//! Conclave Crypto - Cryptographic primitives for CONCLAVE governance.
//!
//! This crate provides:
//! - Ed25519 keypairs and signature verification
//! - Signer recovery as an injected capability (`SignerRecovery`)
//! - Domain-separated digests for signed governance messages

pub mod digest;
pub mod error;
pub mod keypair;
pub mod recovery;

pub use digest::{ballot_digest, delegation_digest, SigningDomain};
pub use error::CryptoError;
pub use keypair::{verify, Keypair};
pub use recovery::{Ed25519Recovery, RecoverableSignature, SignerRecovery};
