//! Signer recovery
//!
//! Recovers the address that produced a signature, under either the
//! native or the EVM convention for recovery ids and address derivation.

use crate::core::Address;
use crate::crypto::{
    public_key_to_evm_address, public_key_to_native_address, recover_public_key, KeyError,
    KeyPair, Signature,
};
use crate::multisig::format::{format_digest, MessageFormat, MessagePrefix};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while recovering a signer
#[derive(Error, Debug)]
pub enum RecoveryError {
    #[error("Unsupported recovery byte {v} for {scheme} signature")]
    UnsupportedRecoveryByte { v: u8, scheme: WalletType },
    #[error("Key error: {0}")]
    Key(#[from] KeyError),
}

/// Recovery and address-derivation convention of a signer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalletType {
    /// `v` is the raw recovery id; address is SHA-256 of the public key
    #[default]
    Native,
    /// `v` is 27 or 28; address is the Keccak-256 derived 20 bytes
    Evm,
}

impl WalletType {
    /// Map the trailing signature byte to a raw recovery id
    fn recovery_id(&self, v: u8) -> Result<u8, RecoveryError> {
        let id = match (self, v) {
            (WalletType::Native, 0..=3) => Some(v),
            (WalletType::Evm, 27 | 28) => Some(v - 27),
            (WalletType::Evm, 0 | 1) => Some(v),
            _ => None,
        };
        id.ok_or(RecoveryError::UnsupportedRecoveryByte { v, scheme: *self })
    }

    /// Trailing signature byte for a raw recovery id
    fn recovery_byte(&self, recovery_id: u8) -> u8 {
        match self {
            WalletType::Native => recovery_id,
            WalletType::Evm => recovery_id + 27,
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletType::Native => write!(f, "native"),
            WalletType::Evm => write!(f, "evm"),
        }
    }
}

impl FromStr for WalletType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" => Ok(WalletType::Native),
            "evm" => Ok(WalletType::Evm),
            other => Err(format!("unknown wallet type: {}", other)),
        }
    }
}

/// A signature together with how it was produced
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureData {
    pub signature: Signature,
    pub format: MessageFormat,
    pub prefix: MessagePrefix,
    pub wallet_type: WalletType,
}

impl SignatureData {
    pub fn new(
        signature: Signature,
        format: MessageFormat,
        prefix: MessagePrefix,
        wallet_type: WalletType,
    ) -> Self {
        Self {
            signature,
            format,
            prefix,
            wallet_type,
        }
    }

    /// Recover the signer of `digest` after applying this signature's formatting
    pub fn recover(&self, digest: [u8; 32]) -> Result<Address, RecoveryError> {
        let formatted = format_digest(digest, self.format, self.prefix);
        recover_signer(&self.signature, &formatted, self.wallet_type)
    }
}

impl fmt::Display for SignatureData {
    /// `HEX:FORMAT:PREFIX:SCHEME`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{}:{}:{}:{}",
            self.signature.to_hex(),
            self.format,
            self.prefix,
            self.wallet_type
        )
    }
}

impl FromStr for SignatureData {
    type Err = String;

    /// Accepts `HEX` alone (unformatted native signature) or the full
    /// `HEX:FORMAT:PREFIX:SCHEME` form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let signature: Signature = parts[0]
            .parse()
            .map_err(|e: KeyError| format!("{}: {}", e, parts[0]))?;

        match parts.len() {
            1 => Ok(Self::new(
                signature,
                MessageFormat::None,
                MessagePrefix::None,
                WalletType::Native,
            )),
            4 => Ok(Self::new(
                signature,
                parts[1].parse()?,
                parts[2].parse()?,
                parts[3].parse()?,
            )),
            n => Err(format!("expected 1 or 4 ':'-separated fields, got {}", n)),
        }
    }
}

/// Recover the canonical address that signed `formatted_digest`
pub fn recover_signer(
    signature: &Signature,
    formatted_digest: &[u8; 32],
    wallet_type: WalletType,
) -> Result<Address, RecoveryError> {
    let recovery_id = wallet_type.recovery_id(signature.v())?;
    let public_key = recover_public_key(formatted_digest, &signature.compact(), recovery_id)?;

    Ok(match wallet_type {
        WalletType::Native => public_key_to_native_address(&public_key),
        WalletType::Evm => public_key_to_evm_address(&public_key),
    })
}

/// Sign an already formatted digest under the given convention
pub fn sign_digest(key: &KeyPair, formatted_digest: &[u8; 32], wallet_type: WalletType) -> Signature {
    let (recovery_id, compact) = key.sign_recoverable(formatted_digest);
    Signature::from_parts(&compact, wallet_type.recovery_byte(recovery_id))
}

/// Produce a signature over a transaction hash, applying the formatting
/// a wallet of the given kind would apply before signing
pub fn sign_transaction_hash(
    key: &KeyPair,
    tx_hash: [u8; 32],
    format: MessageFormat,
    prefix: MessagePrefix,
    wallet_type: WalletType,
) -> SignatureData {
    let formatted = format_digest(tx_hash, format, prefix);
    SignatureData::new(sign_digest(key, &formatted, wallet_type), format, prefix, wallet_type)
}

/// Address of `key` under the given convention
pub fn address_for(key: &KeyPair, wallet_type: WalletType) -> Address {
    match wallet_type {
        WalletType::Native => key.native_address(),
        WalletType::Evm => key.evm_address(),
    }
}
