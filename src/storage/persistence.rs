//! Wallet persistence layer
//!
//! Provides save/load functionality for a wallet snapshot: its state, the
//! ledger it runs against, and the records it has emitted.

use crate::core::ContractId;
use crate::ledger::MemoryLedger;
use crate::multisig::{MultisigWallet, WalletEvent, WalletState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub wallet_file: String,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".quorum_data"),
            wallet_file: "wallet.json".to_string(),
            backup_enabled: true,
            max_backups: 5,
        }
    }
}

/// Everything persisted for one deployed wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub domain_id: ContractId,
    pub state: WalletState,
    pub ledger: MemoryLedger,
    pub events: Vec<WalletEvent>,
    pub saved_at: DateTime<Utc>,
}

impl WalletSnapshot {
    /// Snapshot of a freshly deployed wallet with an empty ledger
    pub fn deployed(domain_id: ContractId) -> Self {
        Self {
            domain_id,
            state: WalletState::default(),
            ledger: MemoryLedger::new(),
            events: Vec::new(),
            saved_at: Utc::now(),
        }
    }

    pub fn wallet(&self) -> MultisigWallet {
        MultisigWallet::from_parts(self.domain_id, self.state.clone())
    }

    /// Take the state of `wallet` after an operation
    pub fn update(&mut self, wallet: &MultisigWallet) {
        self.state = wallet.state().clone();
    }
}

/// Wallet storage manager
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self, StorageError> {
        Self::new(StorageConfig::default())
    }

    fn wallet_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.wallet_file)
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup.{}", self.config.wallet_file, index))
    }

    /// Save the snapshot to disk
    pub fn save(&self, snapshot: &WalletSnapshot) -> Result<(), StorageError> {
        let path = self.wallet_path();

        if self.config.backup_enabled && self.config.max_backups > 0 && path.exists() {
            self.rotate_backups()?;
            fs::copy(&path, self.backup_path(0))?;
        }

        let mut snapshot = snapshot.clone();
        snapshot.saved_at = Utc::now();

        // Write to temporary file first
        let temp_path = self.config.data_dir.join("wallet.tmp");
        let file = fs::File::create(&temp_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &snapshot)?;

        // Atomic rename
        fs::rename(&temp_path, &path)?;

        log::debug!("Saved wallet {} to {:?}", snapshot.domain_id, path);
        Ok(())
    }

    /// Load the snapshot from disk
    pub fn load(&self) -> Result<WalletSnapshot, StorageError> {
        let path = self.wallet_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(
                "Wallet file not found".to_string(),
            ));
        }

        load_from_file(&path)
    }

    /// Check if a saved wallet exists
    pub fn exists(&self) -> bool {
        self.wallet_path().exists()
    }

    /// Delete the saved wallet
    pub fn delete(&self) -> Result<(), StorageError> {
        let path = self.wallet_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn rotate_backups(&self) -> Result<(), StorageError> {
        let oldest = self.backup_path(self.config.max_backups - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        for i in (0..self.config.max_backups - 1).rev() {
            let current = self.backup_path(i);
            if current.exists() {
                fs::rename(&current, self.backup_path(i + 1))?;
            }
        }

        Ok(())
    }

    /// Restore from a backup, making it the current snapshot
    pub fn restore_backup(&self, backup_index: usize) -> Result<WalletSnapshot, StorageError> {
        let backup_path = self.backup_path(backup_index);

        if !backup_path.exists() {
            return Err(StorageError::InvalidData(format!(
                "Backup {} not found",
                backup_index
            )));
        }

        let snapshot = load_from_file(&backup_path)?;
        fs::copy(&backup_path, self.wallet_path())?;
        Ok(snapshot)
    }

    /// List available backups
    pub fn list_backups(&self) -> Vec<usize> {
        (0..self.config.max_backups)
            .filter(|i| self.backup_path(*i).exists())
            .collect()
    }
}

/// Load a snapshot from a specific file path
pub fn load_from_file(path: &Path) -> Result<WalletSnapshot, StorageError> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    let snapshot: WalletSnapshot = serde_json::from_reader(reader)?;

    if snapshot.state.nonce != 0 && snapshot.state.threshold == 0 {
        return Err(StorageError::InvalidData(
            "initialized wallet with zero threshold".to_string(),
        ));
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Address, AssetId};
    use crate::multisig::User;

    fn storage(max_backups: usize) -> (tempfile::TempDir, Storage) {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_dir: temp_dir.path().to_path_buf(),
            max_backups,
            ..Default::default()
        };
        let storage = Storage::new(config).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_save_load_snapshot() {
        let (_dir, storage) = storage(5);
        let mut snapshot = WalletSnapshot::deployed(ContractId([1; 32]));

        let mut wallet = snapshot.wallet();
        wallet
            .constructor(&[User::new(Address([2; 32]), 3)], 2)
            .unwrap();
        snapshot.update(&wallet);
        snapshot.ledger.deposit(AssetId([4; 32]), 50).unwrap();

        storage.save(&snapshot).unwrap();
        assert!(storage.exists());

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.domain_id, snapshot.domain_id);
        assert_eq!(loaded.state, snapshot.state);
        assert_eq!(loaded.ledger, snapshot.ledger);
        assert_eq!(loaded.wallet().approval_weight(&Address([2; 32])), 3);
    }

    #[test]
    fn test_load_missing() {
        let (_dir, storage) = storage(5);
        assert!(matches!(storage.load(), Err(StorageError::InvalidData(_))));
    }

    #[test]
    fn test_backup_rotation() {
        let (_dir, storage) = storage(3);
        let mut snapshot = WalletSnapshot::deployed(ContractId([1; 32]));

        for amount in 1..=5 {
            snapshot.ledger.deposit(AssetId([4; 32]), amount).unwrap();
            storage.save(&snapshot).unwrap();
        }

        assert_eq!(storage.list_backups(), vec![0, 1, 2]);

        // Backup 0 holds the save before the last one: 1+2+3+4.
        let restored = storage.restore_backup(0).unwrap();
        assert_eq!(restored.ledger.assets(), vec![(AssetId([4; 32]), 10)]);
        assert_eq!(storage.load().unwrap().ledger, restored.ledger);
    }

    #[test]
    fn test_rejects_inconsistent_state() {
        let (dir, storage) = storage(5);
        let mut snapshot = WalletSnapshot::deployed(ContractId([1; 32]));
        snapshot.state.nonce = 3;
        storage.save(&snapshot).unwrap();

        assert!(matches!(
            load_from_file(&dir.path().join("wallet.json")),
            Err(StorageError::InvalidData(_))
        ));
    }
}
