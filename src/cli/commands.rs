//! CLI commands for the wallet
//!
//! Implements all command handlers for the CLI interface.

use crate::core::{Address, AssetId, ContractId, Identity};
use crate::crypto::KeyPair;
use crate::ledger::AssetLedger;
use crate::multisig::{
    sign_transaction_hash, MessageFormat, MessagePrefix, SignatureData, User, WalletEvent,
    WalletType,
};
use crate::storage::{Storage, StorageConfig, WalletSnapshot};
use std::path::Path;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub snapshot: WalletSnapshot,
    pub storage: Storage,
}

impl AppState {
    /// Load the deployed wallet from `data_dir`
    pub fn load(data_dir: &Path) -> CliResult<Self> {
        let storage = open_storage(data_dir)?;
        if !storage.exists() {
            return Err(format!(
                "no wallet deployed in {:?}; run `quorum deploy` first",
                data_dir
            )
            .into());
        }

        let snapshot = storage.load()?;
        Ok(Self { snapshot, storage })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.snapshot)?;
        Ok(())
    }
}

fn open_storage(data_dir: &Path) -> CliResult<Storage> {
    let config = StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    };
    Ok(Storage::new(config)?)
}

/// Parse `ADDRESS:WEIGHT`
pub fn parse_user(s: &str) -> Result<User, String> {
    let (address, weight) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected ADDRESS:WEIGHT, got {}", s))?;
    let address: Address = address.parse().map_err(|e| format!("{}", e))?;
    let weight: u64 = weight
        .parse()
        .map_err(|e| format!("invalid weight {}: {}", weight, e))?;
    Ok(User::new(address, weight))
}

/// Parse a 32-byte payload given as hex
pub fn parse_data(s: &str) -> Result<[u8; 32], String> {
    crate::core::decode_fixed::<32>(s).map_err(|e| e.to_string())
}

/// Generate a signer key and print its addresses
pub fn cmd_keygen() -> CliResult<()> {
    let key = KeyPair::generate();

    println!("🔐 New signer key");
    println!("   🔑 Private key: {}", key.private_key_hex());
    println!("   📍 Native address: {}", key.native_address());
    println!("   📍 EVM address: {}", key.evm_address());
    println!("\n   ⚠️  Keep the private key secret; it is not stored anywhere.");

    Ok(())
}

/// Deploy a new, uninitialized wallet
pub fn cmd_deploy(data_dir: &Path, domain_id: ContractId) -> CliResult<()> {
    let storage = open_storage(data_dir)?;

    if storage.exists() {
        println!("⚠️  A wallet is already deployed at {:?}", data_dir);
        return Ok(());
    }

    storage.save(&WalletSnapshot::deployed(domain_id))?;

    println!("✅ Wallet deployed!");
    println!("   📁 Data directory: {:?}", data_dir);
    println!("   🆔 Domain id: {}", domain_id);
    println!("   Initialize it with: quorum init --user ADDRESS:WEIGHT --threshold N");

    Ok(())
}

/// Initialize signers and threshold
pub fn cmd_init(state: &mut AppState, users: &[User], threshold: u64) -> CliResult<()> {
    let mut wallet = state.snapshot.wallet();
    wallet.constructor(users, threshold)?;
    state.snapshot.update(&wallet);
    state.save()?;

    println!("✅ Wallet initialized");
    println!("   Threshold: {}", threshold);
    for user in users {
        println!("   └─ {} (weight {})", user.address, user.weight);
    }

    Ok(())
}

/// Print the hash signers must approve
pub fn cmd_hash(
    state: &AppState,
    to: &Identity,
    value: u64,
    data: &[u8; 32],
    nonce: Option<u64>,
) -> CliResult<()> {
    let wallet = state.snapshot.wallet();
    let nonce = nonce.unwrap_or_else(|| wallet.nonce());
    let hash = wallet.transaction_hash(to, value, data, nonce);

    println!("0x{}", hex::encode(hash));
    Ok(())
}

/// Sign a transaction hash and print the signature in CLI form
#[allow(clippy::too_many_arguments)]
pub fn cmd_sign(
    state: &AppState,
    key_hex: &str,
    to: &Identity,
    value: u64,
    data: &[u8; 32],
    nonce: Option<u64>,
    format: MessageFormat,
    prefix: MessagePrefix,
    wallet_type: WalletType,
) -> CliResult<()> {
    let key = KeyPair::from_private_key_hex(key_hex)?;
    let wallet = state.snapshot.wallet();
    let nonce = nonce.unwrap_or_else(|| wallet.nonce());
    let hash = wallet.transaction_hash(to, value, data, nonce);

    let signature = sign_transaction_hash(&key, hash, format, prefix, wallet_type);
    println!("{}", signature);
    Ok(())
}

/// Execute an approved transaction
pub fn cmd_execute(
    state: &mut AppState,
    to: Identity,
    value: u64,
    data: [u8; 32],
    signatures: &[SignatureData],
) -> CliResult<()> {
    let mut wallet = state.snapshot.wallet();
    let event = wallet.execute_transaction(to, value, data, signatures, &mut state.snapshot.events)?;
    state.snapshot.update(&wallet);
    state.save()?;

    println!("✅ Transaction executed");
    println!("   Nonce: {}", event.nonce);
    println!("   To: {}", event.to);
    println!("   Value: {}", event.value);

    Ok(())
}

/// Transfer assets out of the wallet
pub fn cmd_transfer(
    state: &mut AppState,
    to: Identity,
    asset: AssetId,
    value: u64,
    data: [u8; 32],
    signatures: &[SignatureData],
) -> CliResult<()> {
    let mut wallet = state.snapshot.wallet();
    let snapshot = &mut state.snapshot;
    let event = wallet.transfer(
        to,
        asset,
        value,
        data,
        signatures,
        &mut snapshot.ledger,
        &mut snapshot.events,
    )?;
    snapshot.update(&wallet);
    state.save()?;

    println!("📤 Transfer executed");
    println!("   Nonce: {}", event.nonce);
    println!("   To: {}", event.to);
    println!("   Asset: {}", event.asset);
    println!("   Amount: {}", event.value);

    Ok(())
}

/// Fund the wallet
pub fn cmd_deposit(state: &mut AppState, asset: AssetId, amount: u64) -> CliResult<()> {
    let held = state.snapshot.ledger.deposit(asset, amount)?;
    state.save()?;

    println!("💰 Deposited {} of {} (now holding {})", amount, asset, held);
    Ok(())
}

pub fn cmd_nonce(state: &AppState) -> CliResult<()> {
    let wallet = state.snapshot.wallet();
    if wallet.is_initialized() {
        println!("{}", wallet.nonce());
    } else {
        println!("0 (not initialized)");
    }
    Ok(())
}

pub fn cmd_balance(state: &AppState, asset: Option<AssetId>) -> CliResult<()> {
    let ledger = &state.snapshot.ledger;
    match asset {
        Some(asset) => println!("{}", ledger.balance(&asset)),
        None => {
            let assets = ledger.assets();
            if assets.is_empty() {
                println!("📭 The wallet holds no assets");
            }
            for (asset, amount) in assets {
                println!("   {} = {}", asset, amount);
            }
        }
    }
    Ok(())
}

/// Print the wallet's configuration
pub fn cmd_info(state: &AppState) -> CliResult<()> {
    let wallet = state.snapshot.wallet();

    println!("🔏 Wallet {}", wallet.domain_id());
    if !wallet.is_initialized() {
        println!("   Not initialized");
        return Ok(());
    }

    let mut users: Vec<(&Address, &u64)> = wallet.state().weighting.iter().collect();
    users.sort();

    println!("   ├─ Nonce: {}", wallet.nonce());
    println!("   ├─ Threshold: {}", wallet.threshold());
    println!("   └─ Users: {}", users.len());
    for (address, weight) in users {
        println!("      └─ {} (weight {})", address, weight);
    }
    Ok(())
}

/// List emitted records
pub fn cmd_events(state: &AppState) -> CliResult<()> {
    if state.snapshot.events.is_empty() {
        println!("📭 No events recorded");
        return Ok(());
    }

    for event in &state.snapshot.events {
        match event {
            WalletEvent::Executed(e) => {
                println!("   #{} executed → {} value {}", e.nonce, e.to, e.value)
            }
            WalletEvent::Transfer(e) => println!(
                "   #{} transfer → {} {} of {}",
                e.nonce, e.to, e.value, e.asset
            ),
            WalletEvent::Cancel(e) => {
                println!("   #{} cancelled by {}", e.cancelled_nonce, e.user)
            }
        }
    }
    Ok(())
}
