//! Core value types shared by every wallet component
//!
//! This module provides:
//! - 32-byte identities (`Address`, `ContractId`, `AssetId`)
//! - The `Identity` destination union

pub mod identity;

pub use identity::{decode_fixed, Address, AssetId, ContractId, Identity, IdentityError};
