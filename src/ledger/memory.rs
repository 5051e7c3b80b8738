//! In-memory ledger
//!
//! Tracks the wallet's own holdings and what each recipient has been
//! credited. Serializable so it can be saved alongside wallet state.

use crate::core::{AssetId, Identity};
use crate::ledger::{AssetLedger, LedgerError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLedger {
    /// Wallet holdings by asset
    holdings: HashMap<AssetId, u64>,
    /// Amounts credited to recipients, by recipient then asset
    credited: HashMap<Identity, HashMap<AssetId, u64>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fund the wallet with `amount` of `asset`
    pub fn deposit(&mut self, asset: AssetId, amount: u64) -> Result<u64, LedgerError> {
        let held = self.holdings.entry(asset).or_insert(0);
        *held = held.checked_add(amount).ok_or(LedgerError::Overflow(asset))?;
        log::debug!("Deposited {} of {} (now {})", amount, asset, held);
        Ok(*held)
    }

    /// Amount of `asset` credited to `recipient` by past transfers
    pub fn credited(&self, recipient: &Identity, asset: &AssetId) -> u64 {
        self.credited
            .get(recipient)
            .and_then(|assets| assets.get(asset))
            .copied()
            .unwrap_or(0)
    }

    /// All assets with a nonzero holding
    pub fn assets(&self) -> Vec<(AssetId, u64)> {
        let mut assets: Vec<(AssetId, u64)> = self
            .holdings
            .iter()
            .filter(|(_, amount)| **amount > 0)
            .map(|(asset, amount)| (*asset, *amount))
            .collect();
        assets.sort();
        assets
    }

    fn credit(&mut self, to: &Identity, asset: AssetId, amount: u64) -> Result<(), LedgerError> {
        let entry = self.credited.entry(*to).or_default().entry(asset).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(LedgerError::Overflow(asset))?;
        Ok(())
    }
}

impl AssetLedger for MemoryLedger {
    fn balance(&self, asset: &AssetId) -> u64 {
        self.holdings.get(asset).copied().unwrap_or(0)
    }

    fn transfer(&mut self, to: &Identity, asset: AssetId, amount: u64) -> Result<(), LedgerError> {
        let have = self.balance(&asset);
        if have < amount {
            return Err(LedgerError::InsufficientBalance {
                asset,
                have,
                need: amount,
            });
        }

        match to {
            Identity::Address(address) => {
                log::debug!("Transferring {} of {} to address {}", amount, asset, address);
            }
            Identity::ContractId(contract) => {
                log::debug!(
                    "Force-transferring {} of {} to contract {}",
                    amount,
                    asset,
                    contract
                );
            }
        }

        self.credit(to, asset, amount)?;
        self.holdings.insert(asset, have - amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Address, ContractId};

    const ASSET: AssetId = AssetId([1; 32]);

    #[test]
    fn test_deposit_and_transfer() {
        let mut ledger = MemoryLedger::new();
        let bob = Identity::Address(Address([2; 32]));

        assert_eq!(ledger.deposit(ASSET, 100).unwrap(), 100);
        ledger.transfer(&bob, ASSET, 40).unwrap();

        assert_eq!(ledger.balance(&ASSET), 60);
        assert_eq!(ledger.credited(&bob, &ASSET), 40);
        assert_eq!(ledger.assets(), vec![(ASSET, 60)]);
    }

    #[test]
    fn test_transfer_to_contract() {
        let mut ledger = MemoryLedger::new();
        let vault = Identity::ContractId(ContractId([3; 32]));

        ledger.deposit(ASSET, 10).unwrap();
        ledger.transfer(&vault, ASSET, 10).unwrap();

        assert_eq!(ledger.balance(&ASSET), 0);
        assert_eq!(ledger.credited(&vault, &ASSET), 10);
        assert!(ledger.assets().is_empty());
    }

    #[test]
    fn test_insufficient_balance_leaves_state() {
        let mut ledger = MemoryLedger::new();
        let bob = Identity::Address(Address([2; 32]));
        ledger.deposit(ASSET, 5).unwrap();
        let before = ledger.clone();

        let result = ledger.transfer(&bob, ASSET, 6);
        assert_eq!(
            result,
            Err(LedgerError::InsufficientBalance {
                asset: ASSET,
                have: 5,
                need: 6
            })
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_deposit_overflow() {
        let mut ledger = MemoryLedger::new();
        ledger.deposit(ASSET, u64::MAX).unwrap();
        assert_eq!(ledger.deposit(ASSET, 1), Err(LedgerError::Overflow(ASSET)));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut ledger = MemoryLedger::new();
        ledger.deposit(ASSET, 7).unwrap();
        ledger
            .transfer(&Identity::ContractId(ContractId([4; 32])), ASSET, 2)
            .unwrap();

        let json = serde_json::to_string(&ledger).unwrap();
        let back: MemoryLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }
}
