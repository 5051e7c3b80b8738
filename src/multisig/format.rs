//! Message formatting applied before recovery
//!
//! Signers rarely sign the raw transaction hash. Wallet software wraps it
//! in an envelope first, so the same wrapping has to be rebuilt here to
//! obtain the digest that was actually signed. Formatting runs in two
//! stages: the format envelope, then the text prefix.

use crate::crypto::{keccak256, sha256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version marker of the personal-sign envelope (`0x19`, `'E'`)
pub const PERSONAL_SIGN_VERSION: [u8; 2] = [0x19, 0x45];

/// Text prefix prepended by Ethereum wallets when signing a 32-byte message
pub const ETHEREUM_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Envelope applied to the digest
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageFormat {
    #[default]
    None,
    PersonalSign,
}

/// Text prefix applied after the envelope
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessagePrefix {
    #[default]
    None,
    Ethereum,
}

impl MessageFormat {
    /// Keccak-256 over exactly 34 bytes: version marker then digest
    pub fn apply(&self, digest: [u8; 32]) -> [u8; 32] {
        match self {
            MessageFormat::None => digest,
            MessageFormat::PersonalSign => {
                let mut buf = [0u8; 34];
                buf[..2].copy_from_slice(&PERSONAL_SIGN_VERSION);
                buf[2..].copy_from_slice(&digest);
                keccak256(&buf)
            }
        }
    }
}

impl MessagePrefix {
    pub fn apply(&self, digest: [u8; 32]) -> [u8; 32] {
        match self {
            MessagePrefix::None => digest,
            MessagePrefix::Ethereum => {
                let mut buf = Vec::with_capacity(ETHEREUM_PREFIX.len() + 32);
                buf.extend_from_slice(ETHEREUM_PREFIX);
                buf.extend_from_slice(&digest);
                sha256(&buf)
            }
        }
    }
}

/// Rebuild the digest a signer actually signed
pub fn format_digest(digest: [u8; 32], format: MessageFormat, prefix: MessagePrefix) -> [u8; 32] {
    prefix.apply(format.apply(digest))
}

impl fmt::Display for MessageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageFormat::None => write!(f, "none"),
            MessageFormat::PersonalSign => write!(f, "personal-sign"),
        }
    }
}

impl FromStr for MessageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(MessageFormat::None),
            "personal-sign" => Ok(MessageFormat::PersonalSign),
            other => Err(format!("unknown message format: {}", other)),
        }
    }
}

impl fmt::Display for MessagePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessagePrefix::None => write!(f, "none"),
            MessagePrefix::Ethereum => write!(f, "ethereum"),
        }
    }
}

impl FromStr for MessagePrefix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(MessagePrefix::None),
            "ethereum" => Ok(MessagePrefix::Ethereum),
            other => Err(format!("unknown message prefix: {}", other)),
        }
    }
}
