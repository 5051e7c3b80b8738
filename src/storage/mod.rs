//! Storage module for wallet persistence

pub mod persistence;

pub use persistence::{load_from_file, Storage, StorageConfig, StorageError, WalletSnapshot};
