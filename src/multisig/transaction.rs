//! Proposed multisig transactions and their digest
//!
//! A transaction is never stored. It is rebuilt for every authorization
//! check and only its hash is compared against what signers approved.

use crate::core::{ContractId, Identity};
use crate::crypto::sha256;
use serde::{Deserialize, Serialize};

/// Length of the canonical encoding fed to SHA-256
pub const ENCODED_LEN: usize = 32 + 1 + 32 + 8 + 32 + 8;

/// A proposed action awaiting approval
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Wallet the signatures are scoped to
    pub domain_id: ContractId,
    pub to: Identity,
    pub value: u64,
    /// Opaque 32-byte payload
    pub data: [u8; 32],
    pub nonce: u64,
}

impl Transaction {
    pub fn new(
        domain_id: ContractId,
        to: Identity,
        value: u64,
        data: [u8; 32],
        nonce: u64,
    ) -> Self {
        Self {
            domain_id,
            to,
            value,
            data,
            nonce,
        }
    }

    /// Canonical byte layout:
    /// `domain_id || to.tag || to || value (BE) || data || nonce (BE)`
    pub fn encode(&self) -> [u8; ENCODED_LEN] {
        let mut buf = [0u8; ENCODED_LEN];
        let mut offset = 0;
        let mut put = |bytes: &[u8]| {
            buf[offset..offset + bytes.len()].copy_from_slice(bytes);
            offset += bytes.len();
        };

        put(self.domain_id.as_bytes());
        put(&[self.to.tag()]);
        put(self.to.bits());
        put(&self.value.to_be_bytes());
        put(&self.data);
        put(&self.nonce.to_be_bytes());

        buf
    }

    /// SHA-256 of the canonical encoding
    pub fn hash(&self) -> [u8; 32] {
        sha256(&self.encode())
    }
}

/// Digest of a proposed action
pub fn hash_transaction(
    domain_id: &ContractId,
    to: &Identity,
    value: u64,
    data: &[u8; 32],
    nonce: u64,
) -> [u8; 32] {
    Transaction::new(*domain_id, *to, value, *data, nonce).hash()
}
