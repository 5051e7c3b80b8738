//! Asset ledger collaborator
//!
//! The wallet only needs two things from the ledger it runs on: how much
//! of an asset it holds, and a way to move some of it to a recipient.
//!
//! # Example
//!
//! ```ignore
//! use quorum_wallet::ledger::{AssetLedger, MemoryLedger};
//!
//! let mut ledger = MemoryLedger::new();
//! ledger.deposit(asset, 100);
//! ledger.transfer(&recipient, asset, 40)?;
//! assert_eq!(ledger.balance(&asset), 60);
//! ```

pub mod memory;

pub use memory::MemoryLedger;

use crate::core::{AssetId, Identity};
use thiserror::Error;

/// Ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient balance of {asset}: have {have}, need {need}")]
    InsufficientBalance { asset: AssetId, have: u64, need: u64 },
    #[error("Balance overflow for {0}")]
    Overflow(AssetId),
}

/// Holdings of the wallet and the transfer primitive
pub trait AssetLedger {
    /// Amount of `asset` currently held by the wallet
    fn balance(&self, asset: &AssetId) -> u64;

    /// Move `amount` of `asset` from the wallet to `to`
    fn transfer(&mut self, to: &Identity, asset: AssetId, amount: u64) -> Result<(), LedgerError>;
}
