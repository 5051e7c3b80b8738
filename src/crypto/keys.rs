//! ECDSA key management and public-key recovery
//!
//! Provides key pair generation, recoverable signing, and the two
//! address derivations used by signers: native (SHA-256 of the
//! uncompressed public key) and EVM (last 20 bytes of its Keccak-256).

use rand::rngs::OsRng;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::hash::{keccak256, sha256};
use crate::core::{decode_fixed, Address};

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),
    #[error("Public key recovery failed")]
    RecoveryFailed,
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// A 65-byte recoverable signature: `r || s || v`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub [u8; 65]);

impl Signature {
    pub fn from_parts(compact: &[u8; 64], v: u8) -> Self {
        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(compact);
        bytes[64] = v;
        Self(bytes)
    }

    /// The `r || s` half of the signature
    pub fn compact(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out.copy_from_slice(&self.0[..64]);
        out
    }

    pub fn v(&self) -> u8 {
        self.0[64]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(0x{})", self.to_hex())
    }
}

impl FromStr for Signature {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<65>(s)
            .map(Self)
            .map_err(|_| KeyError::InvalidSignature)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", self.to_hex()))
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a hex-encoded private key
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let stripped = hex_key.strip_prefix("0x").unwrap_or(hex_key);
        let bytes = hex::decode(stripped).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Get the private key as a hex string
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Get the public key as a hex string (compressed format)
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    /// Address under the native scheme
    pub fn native_address(&self) -> Address {
        public_key_to_native_address(&self.public_key)
    }

    /// Address under the EVM scheme, padded into 32 bytes
    pub fn evm_address(&self) -> Address {
        public_key_to_evm_address(&self.public_key)
    }

    /// Sign a 32-byte digest, returning the raw recovery id and `r || s`
    pub fn sign_recoverable(&self, digest: &[u8; 32]) -> (u8, [u8; 64]) {
        let secp = Secp256k1::new();
        let message = Message::from_digest(*digest);
        let (recovery_id, compact) = secp
            .sign_ecdsa_recoverable(&message, &self.secret_key)
            .serialize_compact();
        (recovery_id.to_i32() as u8, compact)
    }
}

/// 64-byte `X || Y` encoding of a public key
fn uncompressed_xy(public_key: &PublicKey) -> [u8; 64] {
    let full = public_key.serialize_uncompressed();
    let mut xy = [0u8; 64];
    xy.copy_from_slice(&full[1..]);
    xy
}

/// Native address: SHA-256 of the 64-byte public key
pub fn public_key_to_native_address(public_key: &PublicKey) -> Address {
    Address(sha256(&uncompressed_xy(public_key)))
}

/// EVM address: Keccak-256 of the 64-byte public key, keeping the low
/// 20 bytes and zeroing the 12 high bytes
pub fn public_key_to_evm_address(public_key: &PublicKey) -> Address {
    let hash = keccak256(&uncompressed_xy(public_key));
    let mut bytes = [0u8; 32];
    bytes[12..].copy_from_slice(&hash[12..]);
    Address(bytes)
}

/// Recover the public key that produced `compact` over `digest`
pub fn recover_public_key(
    digest: &[u8; 32],
    compact: &[u8; 64],
    recovery_id: u8,
) -> Result<PublicKey, KeyError> {
    let secp = Secp256k1::verification_only();

    let recovery_id = RecoveryId::from_i32(i32::from(recovery_id))
        .map_err(|_| KeyError::InvalidRecoveryId(recovery_id))?;
    let signature = RecoverableSignature::from_compact(compact, recovery_id)
        .map_err(|_| KeyError::InvalidSignature)?;
    let message = Message::from_digest(*digest);

    secp.recover_ecdsa(&message, &signature)
        .map_err(|_| KeyError::RecoveryFailed)
}
