use crate::keypair::{verify, Keypair};
use conclave_types::{Address, Ed25519PublicKey, Ed25519Signature, Hash};

/// Signature envelope carried by signed governance messages.
///
/// Ed25519 cannot recover a public key from a signature alone, so the
/// envelope carries the signer's key; recovery is verification plus
/// address derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    pub public_key: Ed25519PublicKey,
    pub signature: Ed25519Signature,
}

impl RecoverableSignature {
    pub fn new(public_key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        Self {
            public_key,
            signature,
        }
    }
}

/// Capability for recovering the signer of a digest.
///
/// Injected into the ledger so governance logic stays independent of the
/// signature scheme; swap implementations without touching the ledger.
pub trait SignerRecovery {
    /// Recover the signing address, or `None` if the signature does not
    /// check out against the digest.
    fn recover_signer(&self, digest: &Hash, sig: &RecoverableSignature) -> Option<Address>;
}

/// Production recovery over ed25519 envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Recovery;

impl SignerRecovery for Ed25519Recovery {
    fn recover_signer(&self, digest: &Hash, sig: &RecoverableSignature) -> Option<Address> {
        verify(&sig.public_key, digest.as_bytes(), &sig.signature).ok()?;
        Some(sig.public_key.to_address())
    }
}

impl Keypair {
    /// Sign a digest, producing the envelope `SignerRecovery` consumes.
    pub fn sign_recoverable(&self, digest: &Hash) -> RecoverableSignature {
        RecoverableSignature::new(self.public_key(), self.sign(digest.as_bytes()))
    }
}
