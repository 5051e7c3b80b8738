//! Weighted multi-signature wallet
//!
//! The wallet starts uninitialized (nonce 0), is initialized exactly once
//! with its signers and threshold, and from then on consumes one nonce per
//! approved execution or transfer.
//!
//! Every operation checks all of its preconditions before touching state,
//! so a failed call leaves the wallet exactly as it was.

use crate::core::{Address, AssetId, ContractId, Identity};
use crate::ledger::{AssetLedger, LedgerError};
use crate::multisig::approvals::count_approvals;
use crate::multisig::events::{EventSink, ExecutedEvent, TransferEvent, WalletEvent};
use crate::multisig::recovery::SignatureData;
use crate::multisig::transaction::hash_transaction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors related to multisig operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MultisigError {
    #[error("Wallet is already initialized")]
    CannotReinitialize,
    #[error("Threshold cannot be zero")]
    ThresholdCannotBeZero,
    #[error("User address cannot be zero")]
    AddressCannotBeZero,
    #[error("User weighting cannot be zero")]
    WeightingCannotBeZero,
    #[error("User listed more than once: {0}")]
    DuplicateUser(Address),
    #[error("Wallet is not initialized")]
    NotInitialized,
    #[error("Insufficient approvals: have {have}, need {need}")]
    InsufficientApprovals { have: u64, need: u64 },
    #[error("Insufficient asset amount: have {have}, need {need}")]
    InsufficientAssetAmount { have: u64, need: u64 },
    #[error("Signers must be supplied in strictly increasing address order")]
    IncorrectSignerOrdering,
    #[error("Signature recovery failed: {0}")]
    SignatureRecoveryFailed(String),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// An authorized signer and its vote weight
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub address: Address,
    pub weight: u64,
}

impl User {
    pub fn new(address: Address, weight: u64) -> Self {
        Self { address, weight }
    }
}

/// Persisted wallet state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletState {
    /// Next nonce to consume; zero while uninitialized
    pub nonce: u64,
    pub threshold: u64,
    pub weighting: HashMap<Address, u64>,
}

/// A multisig wallet bound to its domain identifier
#[derive(Clone, Debug)]
pub struct MultisigWallet {
    domain_id: ContractId,
    state: WalletState,
}

impl MultisigWallet {
    /// A freshly deployed, uninitialized wallet
    pub fn deploy(domain_id: ContractId) -> Self {
        Self::from_parts(domain_id, WalletState::default())
    }

    /// Rebuild a wallet from persisted state
    pub fn from_parts(domain_id: ContractId, state: WalletState) -> Self {
        Self { domain_id, state }
    }

    pub fn domain_id(&self) -> ContractId {
        self.domain_id
    }

    pub fn state(&self) -> &WalletState {
        &self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state.nonce != 0
    }

    /// Initialize the wallet with its signers and threshold
    pub fn constructor(&mut self, users: &[User], threshold: u64) -> Result<(), MultisigError> {
        if self.is_initialized() {
            return Err(MultisigError::CannotReinitialize);
        }
        if threshold == 0 {
            return Err(MultisigError::ThresholdCannotBeZero);
        }

        let mut weighting = HashMap::with_capacity(users.len());
        for user in users {
            if user.address.is_zero() {
                return Err(MultisigError::AddressCannotBeZero);
            }
            if user.weight == 0 {
                return Err(MultisigError::WeightingCannotBeZero);
            }
            if weighting.insert(user.address, user.weight).is_some() {
                return Err(MultisigError::DuplicateUser(user.address));
            }
        }

        self.state = WalletState {
            nonce: 1,
            threshold,
            weighting,
        };

        log::info!(
            "Wallet {} initialized with {} users, threshold {}",
            self.domain_id,
            users.len(),
            threshold
        );
        Ok(())
    }

    /// Execute an approved transaction without moving assets
    pub fn execute_transaction(
        &mut self,
        to: Identity,
        value: u64,
        data: [u8; 32],
        signatures: &[SignatureData],
        events: &mut dyn EventSink,
    ) -> Result<ExecutedEvent, MultisigError> {
        let nonce = self.authorize(&to, value, &data, signatures)?;

        self.state.nonce += 1;
        let event = ExecutedEvent {
            to,
            value,
            data,
            nonce,
        };
        events.emit(WalletEvent::Executed(event.clone()));

        log::info!("Executed transaction {} to {} (value {})", nonce, to, value);
        Ok(event)
    }

    /// Move `value` of `asset` to `to` once approved
    #[allow(clippy::too_many_arguments)]
    pub fn transfer(
        &mut self,
        to: Identity,
        asset: AssetId,
        value: u64,
        data: [u8; 32],
        signatures: &[SignatureData],
        ledger: &mut dyn AssetLedger,
        events: &mut dyn EventSink,
    ) -> Result<TransferEvent, MultisigError> {
        if !self.is_initialized() {
            return Err(MultisigError::NotInitialized);
        }

        let held = ledger.balance(&asset);
        if value > held {
            log::warn!("Transfer of {} {} rejected: only {} held", value, asset, held);
            return Err(MultisigError::InsufficientAssetAmount {
                have: held,
                need: value,
            });
        }

        let nonce = self.authorize(&to, value, &data, signatures)?;

        // Nonce only moves once the ledger accepted the transfer.
        ledger.transfer(&to, asset, value)?;
        self.state.nonce += 1;

        let event = TransferEvent {
            to,
            asset,
            value,
            nonce,
        };
        events.emit(WalletEvent::Transfer(event.clone()));

        log::info!("Transferred {} of {} to {} (nonce {})", value, asset, to, nonce);
        Ok(event)
    }

    /// Check initialization and quorum for the current nonce, returning it
    fn authorize(
        &self,
        to: &Identity,
        value: u64,
        data: &[u8; 32],
        signatures: &[SignatureData],
    ) -> Result<u64, MultisigError> {
        if !self.is_initialized() {
            return Err(MultisigError::NotInitialized);
        }

        let nonce = self.state.nonce;
        let tx_hash = hash_transaction(&self.domain_id, to, value, data, nonce);
        let approvals = count_approvals(
            tx_hash,
            signatures,
            &self.state.weighting,
            self.state.threshold,
        )?;

        if approvals < self.state.threshold {
            log::warn!(
                "Nonce {} rejected: {} of {} approvals",
                nonce,
                approvals,
                self.state.threshold
            );
            return Err(MultisigError::InsufficientApprovals {
                have: approvals,
                need: self.state.threshold,
            });
        }

        Ok(nonce)
    }

    pub fn nonce(&self) -> u64 {
        self.state.nonce
    }

    pub fn threshold(&self) -> u64 {
        self.state.threshold
    }

    /// Weight of `user`, zero when it is not a signer
    pub fn approval_weight(&self, user: &Address) -> u64 {
        self.state.weighting.get(user).copied().unwrap_or(0)
    }

    /// Amount of `asset` held by the wallet
    pub fn balance(&self, asset: &AssetId, ledger: &dyn AssetLedger) -> u64 {
        ledger.balance(asset)
    }

    /// Digest signers must approve for the given transaction
    pub fn transaction_hash(&self, to: &Identity, value: u64, data: &[u8; 32], nonce: u64) -> [u8; 32] {
        hash_transaction(&self.domain_id, to, value, data, nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;
    use crate::ledger::MemoryLedger;
    use crate::multisig::format::{MessageFormat, MessagePrefix};
    use crate::multisig::recovery::{address_for, sign_transaction_hash, WalletType};

    const DOMAIN: ContractId = ContractId([0x11; 32]);
    const ASSET: AssetId = AssetId([0x22; 32]);
    const DATA: [u8; 32] = [0x33; 32];

    fn recipient() -> Identity {
        Identity::Address(Address([0x44; 32]))
    }

    /// Three native signers sorted by address
    fn signers() -> Vec<KeyPair> {
        let mut keys: Vec<KeyPair> = (0..3).map(|_| KeyPair::generate()).collect();
        keys.sort_by_key(|k| k.native_address());
        keys
    }

    fn users(keys: &[KeyPair], weight: u64) -> Vec<User> {
        keys.iter()
            .map(|k| User::new(k.native_address(), weight))
            .collect()
    }

    fn initialized(keys: &[KeyPair], threshold: u64) -> MultisigWallet {
        let mut wallet = MultisigWallet::deploy(DOMAIN);
        wallet.constructor(&users(keys, 1), threshold).unwrap();
        wallet
    }

    fn sign(wallet: &MultisigWallet, keys: &[&KeyPair], value: u64) -> Vec<SignatureData> {
        let tx_hash = wallet.transaction_hash(&recipient(), value, &DATA, wallet.nonce());
        keys.iter()
            .map(|k| {
                sign_transaction_hash(
                    k,
                    tx_hash,
                    MessageFormat::None,
                    MessagePrefix::None,
                    WalletType::Native,
                )
            })
            .collect()
    }

    #[test]
    fn test_constructor_initializes() {
        let keys = signers();
        let wallet = initialized(&keys, 2);

        assert!(wallet.is_initialized());
        assert_eq!(wallet.nonce(), 1);
        assert_eq!(wallet.threshold(), 2);
        assert_eq!(wallet.approval_weight(&keys[0].native_address()), 1);
        assert_eq!(wallet.approval_weight(&Address([9; 32])), 0);
    }

    #[test]
    fn test_constructor_only_once() {
        let keys = signers();
        let mut wallet = initialized(&keys, 2);

        assert_eq!(
            wallet.constructor(&users(&keys, 1), 2),
            Err(MultisigError::CannotReinitialize)
        );
        assert_eq!(
            wallet.constructor(&[], 0),
            Err(MultisigError::CannotReinitialize)
        );
        assert_eq!(wallet.threshold(), 2);
    }

    #[test]
    fn test_constructor_validation() {
        let mut wallet = MultisigWallet::deploy(DOMAIN);
        let ok = User::new(Address([1; 32]), 1);

        assert_eq!(
            wallet.constructor(&[ok], 0),
            Err(MultisigError::ThresholdCannotBeZero)
        );
        assert_eq!(
            wallet.constructor(&[ok, User::new(Address::ZERO, 1)], 1),
            Err(MultisigError::AddressCannotBeZero)
        );
        assert_eq!(
            wallet.constructor(&[User::new(Address([2; 32]), 0)], 1),
            Err(MultisigError::WeightingCannotBeZero)
        );
        assert_eq!(
            wallet.constructor(&[ok, ok], 1),
            Err(MultisigError::DuplicateUser(ok.address))
        );

        assert!(!wallet.is_initialized());
        assert!(wallet.state().weighting.is_empty());
    }

    #[test]
    fn test_requires_initialization() {
        let mut wallet = MultisigWallet::deploy(DOMAIN);
        let mut ledger = MemoryLedger::new();
        let mut events: Vec<WalletEvent> = Vec::new();

        assert_eq!(
            wallet.execute_transaction(recipient(), 0, DATA, &[], &mut events),
            Err(MultisigError::NotInitialized)
        );
        assert_eq!(
            wallet.transfer(recipient(), ASSET, 0, DATA, &[], &mut ledger, &mut events),
            Err(MultisigError::NotInitialized)
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_two_of_three_executes() {
        let keys = signers();
        let mut wallet = initialized(&keys, 2);
        let mut events: Vec<WalletEvent> = Vec::new();

        let sigs = sign(&wallet, &[&keys[0], &keys[1]], 7);
        let event = wallet
            .execute_transaction(recipient(), 7, DATA, &sigs, &mut events)
            .unwrap();

        assert_eq!(event.nonce, 1);
        assert_eq!(wallet.nonce(), 2);
        assert_eq!(events, vec![WalletEvent::Executed(event)]);
    }

    #[test]
    fn test_decreasing_order_rejected() {
        let keys = signers();
        let mut wallet = initialized(&keys, 2);
        let mut events: Vec<WalletEvent> = Vec::new();

        let sigs = sign(&wallet, &[&keys[1], &keys[0]], 7);
        assert_eq!(
            wallet.execute_transaction(recipient(), 7, DATA, &sigs, &mut events),
            Err(MultisigError::IncorrectSignerOrdering)
        );
        assert_eq!(wallet.nonce(), 1);
        assert!(events.is_empty());
    }

    #[test]
    fn test_threshold_boundary() {
        let keys = signers();
        let mut wallet = initialized(&keys, 3);
        let mut events: Vec<WalletEvent> = Vec::new();

        let short = sign(&wallet, &[&keys[0], &keys[2]], 1);
        assert_eq!(
            wallet.execute_transaction(recipient(), 1, DATA, &short, &mut events),
            Err(MultisigError::InsufficientApprovals { have: 2, need: 3 })
        );
        assert_eq!(wallet.nonce(), 1);

        let exact = sign(&wallet, &[&keys[0], &keys[1], &keys[2]], 1);
        wallet
            .execute_transaction(recipient(), 1, DATA, &exact, &mut events)
            .unwrap();
        assert_eq!(wallet.nonce(), 2);
    }

    #[test]
    fn test_signatures_do_not_replay() {
        let keys = signers();
        let mut wallet = initialized(&keys, 2);
        let mut events: Vec<WalletEvent> = Vec::new();

        let sigs = sign(&wallet, &[&keys[0], &keys[1]], 7);
        wallet
            .execute_transaction(recipient(), 7, DATA, &sigs, &mut events)
            .unwrap();

        // Same signatures, next nonce: recovered signers are now unrelated keys.
        let replay = wallet.execute_transaction(recipient(), 7, DATA, &sigs, &mut events);
        assert!(replay.is_err());
        assert_eq!(wallet.nonce(), 2);
    }

    #[test]
    fn test_other_domain_signatures_rejected() {
        let keys = signers();
        let mut wallet = initialized(&keys, 2);
        let mut other = MultisigWallet::deploy(ContractId([0x99; 32]));
        other.constructor(&users(&keys, 1), 2).unwrap();
        let mut events: Vec<WalletEvent> = Vec::new();

        let sigs = sign(&other, &[&keys[0], &keys[1]], 7);
        assert!(wallet
            .execute_transaction(recipient(), 7, DATA, &sigs, &mut events)
            .is_err());
        assert_eq!(wallet.nonce(), 1);
    }

    #[test]
    fn test_weighted_signer_alone_meets_threshold() {
        let keys = signers();
        let mut wallet = MultisigWallet::deploy(DOMAIN);
        let mut table = users(&keys, 1);
        table[2].weight = 3;
        wallet.constructor(&table, 3).unwrap();
        let mut events: Vec<WalletEvent> = Vec::new();

        let sigs = sign(&wallet, &[&keys[2]], 0);
        wallet
            .execute_transaction(recipient(), 0, DATA, &sigs, &mut events)
            .unwrap();
        assert_eq!(wallet.nonce(), 2);
    }

    #[test]
    fn test_evm_signers() {
        let mut keys: Vec<KeyPair> = (0..2).map(|_| KeyPair::generate()).collect();
        keys.sort_by_key(|k| k.evm_address());

        let mut wallet = MultisigWallet::deploy(DOMAIN);
        let table: Vec<User> = keys
            .iter()
            .map(|k| User::new(address_for(k, WalletType::Evm), 1))
            .collect();
        wallet.constructor(&table, 2).unwrap();

        let tx_hash = wallet.transaction_hash(&recipient(), 3, &DATA, 1);
        let sigs: Vec<SignatureData> = keys
            .iter()
            .map(|k| {
                sign_transaction_hash(
                    k,
                    tx_hash,
                    MessageFormat::PersonalSign,
                    MessagePrefix::Ethereum,
                    WalletType::Evm,
                )
            })
            .collect();

        let mut events: Vec<WalletEvent> = Vec::new();
        wallet
            .execute_transaction(recipient(), 3, DATA, &sigs, &mut events)
            .unwrap();
        assert_eq!(wallet.nonce(), 2);
    }

    #[test]
    fn test_transfer_moves_assets() {
        let keys = signers();
        let mut wallet = initialized(&keys, 2);
        let mut ledger = MemoryLedger::new();
        ledger.deposit(ASSET, 100).unwrap();
        let mut events: Vec<WalletEvent> = Vec::new();

        let sigs = sign(&wallet, &[&keys[0], &keys[1]], 60);
        let event = wallet
            .transfer(recipient(), ASSET, 60, DATA, &sigs, &mut ledger, &mut events)
            .unwrap();

        assert_eq!(event.nonce, 1);
        assert_eq!(event.value, 60);
        assert_eq!(wallet.nonce(), 2);
        assert_eq!(wallet.balance(&ASSET, &ledger), 40);
        assert_eq!(ledger.credited(&recipient(), &ASSET), 60);
        assert_eq!(events, vec![WalletEvent::Transfer(event)]);
    }

    #[test]
    fn test_transfer_exceeding_balance() {
        let keys = signers();
        let mut wallet = initialized(&keys, 2);
        let mut ledger = MemoryLedger::new();
        ledger.deposit(ASSET, 10).unwrap();
        let mut events: Vec<WalletEvent> = Vec::new();

        let sigs = sign(&wallet, &[&keys[0], &keys[1]], 11);
        assert_eq!(
            wallet.transfer(recipient(), ASSET, 11, DATA, &sigs, &mut ledger, &mut events),
            Err(MultisigError::InsufficientAssetAmount { have: 10, need: 11 })
        );
        assert_eq!(wallet.nonce(), 1);
        assert_eq!(ledger.balance(&ASSET), 10);
        assert_eq!(ledger.credited(&recipient(), &ASSET), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_transfer_without_quorum() {
        let keys = signers();
        let mut wallet = initialized(&keys, 2);
        let mut ledger = MemoryLedger::new();
        ledger.deposit(ASSET, 10).unwrap();
        let mut events: Vec<WalletEvent> = Vec::new();

        let sigs = sign(&wallet, &[&keys[0]], 5);
        assert_eq!(
            wallet.transfer(recipient(), ASSET, 5, DATA, &sigs, &mut ledger, &mut events),
            Err(MultisigError::InsufficientApprovals { have: 1, need: 2 })
        );
        assert_eq!(ledger.balance(&ASSET), 10);
        assert_eq!(wallet.nonce(), 1);
    }

    #[test]
    fn test_transaction_hash_matches_hasher() {
        let wallet = MultisigWallet::deploy(DOMAIN);
        assert_eq!(
            wallet.transaction_hash(&recipient(), 5, &DATA, 3),
            hash_transaction(&DOMAIN, &recipient(), 5, &DATA, 3)
        );
    }
}
