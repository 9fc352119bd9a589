use conclave_types::{Address, Hash};

/// Domain context bound into every signed governance message, so a
/// signature for one deployment cannot be replayed against another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningDomain {
    pub name: String,
    pub chain_id: u64,
}

impl SigningDomain {
    pub fn new(name: impl Into<String>, chain_id: u64) -> Self {
        Self {
            name: name.into(),
            chain_id,
        }
    }

    /// Domain separator digest. The name is length-prefixed so distinct
    /// (name, chain_id) pairs can never collide.
    pub fn separator(&self) -> Hash {
        Hash::compute_multi(&[
            b"CONCLAVE_DOMAIN",
            &(self.name.len() as u64).to_be_bytes(),
            self.name.as_bytes(),
            &self.chain_id.to_be_bytes(),
        ])
    }
}

/// Digest a delegation message: (delegatee, nonce, expiry) under the domain.
pub fn delegation_digest(domain: &SigningDomain, delegatee: Address, nonce: u64, expiry: u64) -> Hash {
    let separator = domain.separator();
    Hash::compute_multi(&[
        b"Delegation",
        separator.as_bytes(),
        delegatee.as_bytes(),
        &nonce.to_be_bytes(),
        &expiry.to_be_bytes(),
    ])
}

/// Digest a ballot message: (proposal_id, support) under the domain.
pub fn ballot_digest(domain: &SigningDomain, proposal_id: u64, support: u8) -> Hash {
    let separator = domain.separator();
    Hash::compute_multi(&[
        b"Ballot",
        separator.as_bytes(),
        &proposal_id.to_be_bytes(),
        &[support],
    ])
}
