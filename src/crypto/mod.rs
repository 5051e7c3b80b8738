//! Cryptographic utilities for the wallet
//!
//! This module provides:
//! - SHA-256 and Keccak-256 hashing
//! - ECDSA key management and public-key recovery (secp256k1)
//! - Native and EVM address derivation

pub mod hash;
pub mod keys;

pub use hash::{keccak256, sha256, sha256_hex};
pub use keys::{
    public_key_to_evm_address, public_key_to_native_address, recover_public_key, KeyError,
    KeyPair, Signature,
};
