//! Conclave Types - Core type definitions for CONCLAVE governance.
//!
//! This crate provides the fundamental types shared by every governance
//! component:
//! - Addresses (20-byte, Bech32m encoded)
//! - Hashes (32-byte, blake3 digests)
//! - U256 (256-bit unsigned integer for token amounts)
//! - Ed25519 signature wire types
//! - The host ledger clock (block index + timestamp)

pub mod address;
pub mod clock;
pub mod error;
pub mod hash;
pub mod signature;
pub mod u256;

pub use address::Address;
pub use clock::Clock;
pub use error::TypesError;
pub use hash::Hash;
pub use signature::{Ed25519PublicKey, Ed25519Signature};
pub use u256::U256;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Address, Clock, Ed25519PublicKey, Ed25519Signature, Hash, TypesError, U256};
}
