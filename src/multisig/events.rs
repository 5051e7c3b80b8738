//! Records emitted by the wallet
//!
//! Emission is delegated to an [`EventSink`]; the wallet never decides
//! where records end up.

use crate::core::{Address, AssetId, Identity};
use serde::{Deserialize, Serialize};

/// A transaction was approved and executed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutedEvent {
    pub to: Identity,
    pub value: u64,
    pub data: [u8; 32],
    /// Nonce consumed by the transaction
    pub nonce: u64,
}

/// Assets were moved out of the wallet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub to: Identity,
    pub asset: AssetId,
    pub value: u64,
    /// Nonce consumed by the transfer
    pub nonce: u64,
}

/// Reserved: part of the event vocabulary, but no wallet operation
/// produces it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelEvent {
    pub cancelled_nonce: u64,
    pub user: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WalletEvent {
    Executed(ExecutedEvent),
    Transfer(TransferEvent),
    Cancel(CancelEvent),
}

/// Destination for emitted records
pub trait EventSink {
    fn emit(&mut self, event: WalletEvent);
}

impl EventSink for Vec<WalletEvent> {
    fn emit(&mut self, event: WalletEvent) {
        self.push(event);
    }
}
