//! Weighted multi-signature authorization
//!
//! A proposed action is hashed, every supplied signature is formatted and
//! recovered to its signer, and the signers' weights are summed against
//! the wallet's threshold.
//!
//! # Example
//!
//! ```ignore
//! use quorum_wallet::multisig::{MultisigWallet, User};
//!
//! let mut wallet = MultisigWallet::deploy(domain_id);
//! wallet.constructor(&[User::new(alice, 1), User::new(bob, 1)], 2)?;
//!
//! // Signers approve the hash for the current nonce
//! let hash = wallet.transaction_hash(&to, value, &data, wallet.nonce());
//!
//! // Signatures ordered by increasing signer address
//! wallet.execute_transaction(to, value, data, &signatures, &mut events)?;
//! ```

pub mod approvals;
pub mod events;
pub mod format;
pub mod recovery;
pub mod transaction;
pub mod wallet;

pub use approvals::{count_approvals, Weighting};
pub use events::{CancelEvent, EventSink, ExecutedEvent, TransferEvent, WalletEvent};
pub use format::{format_digest, MessageFormat, MessagePrefix};
pub use recovery::{
    address_for, recover_signer, sign_digest, sign_transaction_hash, RecoveryError,
    SignatureData, WalletType,
};
pub use transaction::{hash_transaction, Transaction};
pub use wallet::{MultisigError, MultisigWallet, User, WalletState};
