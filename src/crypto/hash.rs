//! Cryptographic hashing utilities
//!
//! SHA-256 is the primary digest used for transaction hashes, native
//! addresses and the text-prefix envelope. Keccak-256 is used where the
//! Ethereum conventions require it (personal-sign envelope, EVM addresses).

use sha2::{Digest, Sha256};
use tiny_keccak::{Hasher, Keccak};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes SHA-256 hash and returns it as a hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Computes Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}
