//! 32-byte identities used throughout the wallet
//!
//! `Address`, `ContractId` and `AssetId` all live in the same 256-bit
//! space. They order as unsigned big-endian integers, which is the
//! ordering the approval counter relies on.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing identities from text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Unknown identity kind: {0}")]
    UnknownKind(String),
}

/// Decode `0x`-prefixed (or bare) hex into a fixed-size array
pub fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], IdentityError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(stripped).map_err(|e| IdentityError::InvalidHex(e.to_string()))?;
    if bytes.len() != N {
        return Err(IdentityError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

macro_rules! b256_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            pub const ZERO: Self = Self([0u8; 32]);

            pub const fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = IdentityError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                decode_fixed::<32>(s).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

b256_type!(
    /// Canonical signer or recipient address
    Address
);
b256_type!(
    /// Identifier of a contract; also used as the wallet's domain identifier
    ContractId
);
b256_type!(
    /// Identifier of an asset held by the wallet
    AssetId
);

/// Destination of a transaction: an external address or a contract
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Identity {
    Address(Address),
    ContractId(ContractId),
}

impl Identity {
    /// Discriminant written into transaction hashes
    pub fn tag(&self) -> u8 {
        match self {
            Identity::Address(_) => 0,
            Identity::ContractId(_) => 1,
        }
    }

    pub fn bits(&self) -> &[u8; 32] {
        match self {
            Identity::Address(a) => a.as_bytes(),
            Identity::ContractId(c) => c.as_bytes(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Address(a) => write!(f, "address:{}", a),
            Identity::ContractId(c) => write!(f, "contract:{}", c),
        }
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    /// Accepts `address:0x..`, `contract:0x..`, or a bare hex value (address)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("address", rest)) => Ok(Identity::Address(rest.parse()?)),
            Some(("contract", rest)) => Ok(Identity::ContractId(rest.parse()?)),
            Some((kind, _)) => Err(IdentityError::UnknownKind(kind.to_string())),
            None => Ok(Identity::Address(s.parse()?)),
        }
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
