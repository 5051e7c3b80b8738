//! Quorum Wallet: weighted multi-signature transaction authorization
//!
//! This crate decides whether a quorum of signers has approved a proposed
//! action:
//! - Deterministic SHA-256 transaction hashing bound to a domain id
//! - Personal-sign envelope and Ethereum text-prefix message formatting
//! - Signer recovery under native and EVM secp256k1 conventions
//! - Weighted approval counting over strictly ordered signers
//! - A wallet state machine with replay-protecting nonces
//! - JSON persistence and an in-memory asset ledger
//!
//! # Example
//!
//! ```rust
//! use quorum_wallet::core::{ContractId, Identity};
//! use quorum_wallet::crypto::KeyPair;
//! use quorum_wallet::multisig::{
//!     sign_transaction_hash, MessageFormat, MessagePrefix, MultisigWallet, User, WalletEvent,
//!     WalletType,
//! };
//!
//! let mut keys = vec![KeyPair::generate(), KeyPair::generate()];
//! keys.sort_by_key(|k| k.native_address());
//!
//! let mut wallet = MultisigWallet::deploy(ContractId([1; 32]));
//! let users: Vec<User> = keys.iter().map(|k| User::new(k.native_address(), 1)).collect();
//! wallet.constructor(&users, 2).unwrap();
//!
//! let to = Identity::ContractId(ContractId([2; 32]));
//! let hash = wallet.transaction_hash(&to, 10, &[0; 32], wallet.nonce());
//! let signatures: Vec<_> = keys
//!     .iter()
//!     .map(|k| {
//!         sign_transaction_hash(k, hash, MessageFormat::None, MessagePrefix::None, WalletType::Native)
//!     })
//!     .collect();
//!
//! let mut events: Vec<WalletEvent> = Vec::new();
//! wallet.execute_transaction(to, 10, [0; 32], &signatures, &mut events).unwrap();
//! assert_eq!(wallet.nonce(), 2);
//! ```

pub mod cli;
pub mod core;
pub mod crypto;
pub mod ledger;
pub mod multisig;
pub mod storage;

// Re-export commonly used types
pub use crate::core::{Address, AssetId, ContractId, Identity};
pub use crypto::{KeyPair, Signature};
pub use ledger::{AssetLedger, LedgerError, MemoryLedger};
pub use multisig::{
    MessageFormat, MessagePrefix, MultisigError, MultisigWallet, SignatureData, User,
    WalletEvent, WalletState, WalletType,
};
pub use storage::{Storage, StorageConfig, WalletSnapshot};
