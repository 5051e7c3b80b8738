//! Quorum Wallet CLI Application
//!
//! A command-line interface for operating a weighted multisig wallet.

use clap::{Parser, Subcommand};
use quorum_wallet::cli::{self, parse_data, parse_user, AppState};
use quorum_wallet::core::{AssetId, ContractId, Identity};
use quorum_wallet::multisig::{MessageFormat, MessagePrefix, SignatureData, User, WalletType};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quorum")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "Weighted multi-signature wallet", long_about = None)]
struct Cli {
    /// Data directory for wallet storage
    #[arg(short, long, default_value = ".quorum_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a signer key
    Keygen,

    /// Deploy a new, uninitialized wallet
    Deploy {
        /// Domain identifier the wallet's signatures are bound to
        #[arg(long)]
        domain_id: ContractId,
    },

    /// Initialize signers and threshold (once)
    Init {
        /// Signer as ADDRESS:WEIGHT (repeatable)
        #[arg(short, long = "user", value_parser = parse_user, required = true)]
        users: Vec<User>,

        /// Total weight required to approve
        #[arg(short, long)]
        threshold: u64,
    },

    /// Print the hash signers must approve
    Hash {
        /// Destination (address:0x.. or contract:0x..)
        #[arg(long)]
        to: Identity,

        #[arg(long)]
        value: u64,

        /// 32-byte payload (hex)
        #[arg(long, value_parser = parse_data)]
        data: [u8; 32],

        /// Nonce to hash for (defaults to the current one)
        #[arg(long)]
        nonce: Option<u64>,
    },

    /// Sign a transaction with a private key
    Sign {
        /// Private key (hex)
        #[arg(short, long)]
        key: String,

        #[arg(long)]
        to: Identity,

        #[arg(long)]
        value: u64,

        #[arg(long, value_parser = parse_data)]
        data: [u8; 32],

        #[arg(long)]
        nonce: Option<u64>,

        /// none | personal-sign
        #[arg(long, default_value = "none")]
        format: MessageFormat,

        /// none | ethereum
        #[arg(long, default_value = "none")]
        prefix: MessagePrefix,

        /// native | evm
        #[arg(long, default_value = "native")]
        scheme: WalletType,
    },

    /// Execute an approved transaction
    Execute {
        #[arg(long)]
        to: Identity,

        #[arg(long)]
        value: u64,

        #[arg(long, value_parser = parse_data)]
        data: [u8; 32],

        /// HEX[:FORMAT:PREFIX:SCHEME], ordered by signer address (repeatable)
        #[arg(short, long = "signature")]
        signatures: Vec<SignatureData>,
    },

    /// Transfer assets out of the wallet
    Transfer {
        #[arg(long)]
        to: Identity,

        #[arg(long)]
        asset: AssetId,

        #[arg(long)]
        value: u64,

        #[arg(long, value_parser = parse_data)]
        data: [u8; 32],

        #[arg(short, long = "signature")]
        signatures: Vec<SignatureData>,
    },

    /// Fund the wallet with an asset
    Deposit {
        #[arg(long)]
        asset: AssetId,

        #[arg(long)]
        amount: u64,
    },

    /// Show the current nonce
    Nonce,

    /// Show held amounts
    Balance {
        /// Asset to query (all when omitted)
        #[arg(long)]
        asset: Option<AssetId>,
    },

    /// Show signers and threshold
    Info,

    /// List emitted records
    Events,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Commands that don't need a deployed wallet
    match &cli.command {
        Commands::Keygen => return cli::cmd_keygen(),
        Commands::Deploy { domain_id } => return cli::cmd_deploy(&cli.data_dir, *domain_id),
        _ => {}
    }

    let mut state = AppState::load(&cli.data_dir)?;

    match cli.command {
        Commands::Keygen | Commands::Deploy { .. } => unreachable!(),

        Commands::Init { users, threshold } => {
            cli::cmd_init(&mut state, &users, threshold)?;
        }

        Commands::Hash {
            to,
            value,
            data,
            nonce,
        } => {
            cli::cmd_hash(&state, &to, value, &data, nonce)?;
        }

        Commands::Sign {
            key,
            to,
            value,
            data,
            nonce,
            format,
            prefix,
            scheme,
        } => {
            cli::cmd_sign(&state, &key, &to, value, &data, nonce, format, prefix, scheme)?;
        }

        Commands::Execute {
            to,
            value,
            data,
            signatures,
        } => {
            cli::cmd_execute(&mut state, to, value, data, &signatures)?;
        }

        Commands::Transfer {
            to,
            asset,
            value,
            data,
            signatures,
        } => {
            cli::cmd_transfer(&mut state, to, asset, value, data, &signatures)?;
        }

        Commands::Deposit { asset, amount } => {
            cli::cmd_deposit(&mut state, asset, amount)?;
        }

        Commands::Nonce => cli::cmd_nonce(&state)?,

        Commands::Balance { asset } => cli::cmd_balance(&state, asset)?,

        Commands::Info => cli::cmd_info(&state)?,

        Commands::Events => cli::cmd_events(&state)?,
    }

    Ok(())
}
