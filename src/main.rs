//! wallet-aggregator - inspect the wallet extension registry
//!
//! Lists the known Cosmos extensions, describes one, or checks which of them
//! would be found in a recorded global-scope snapshot.

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use wallet_aggregator::wallet::cosmos::{
    self, AccountKey, ArbitraryData, BroadcastMode, BrowserScope, DirectSignResponse,
    ExtensionError, ExtensionWallet, OfflineDirectSigner, OfflineSigner, SignDirectParams,
    StdSignature, WalletDescriptor,
};

/// wallet-aggregator: uniform access to wallet extensions
#[derive(Parser)]
#[command(name = "wallet-aggregator")]
#[command(about = "Inspect supported wallet extensions", long_about = None)]
struct Cli {
    /// Log filter (overrides RUST_LOG), e.g. `debug`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported wallet extensions
    ListWallets,

    /// Describe one wallet extension
    Show {
        /// Wallet identifier (e.g. keplr)
        #[arg(value_name = "ID")]
        id: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Include the icon data URI
        #[arg(long)]
        with_icon: bool,
    },

    /// Check which extensions resolve in a global-scope snapshot
    Probe {
        /// JSON file: {"fields": ["keplr", "coin98.keplr", ...]}
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Unknown wallet: {0}")]
    UnknownWallet(String),

    #[error("Failed to read snapshot {path:?}: {source}")]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Global fields observed in a page, as dotted paths
#[derive(Debug, Deserialize)]
struct ScopeSnapshot {
    fields: Vec<String>,
}

impl ScopeSnapshot {
    fn load(path: &Path) -> Result<Self, CliError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CliError::SnapshotIo {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Rebuild the scope with a placeholder handle at every recorded path
    fn to_scope(&self) -> BrowserScope {
        let scope = BrowserScope::new();
        for path in &self.fields {
            match path.split_once('.') {
                Some((parent, field)) => scope.inject_nested(parent, field, Arc::new(RecordedWallet)),
                None => scope.inject_wallet(path, Arc::new(RecordedWallet)),
            }
        }
        scope
    }
}

/// Stand-in for an extension known only from a snapshot; every call fails
struct RecordedWallet;

impl RecordedWallet {
    fn unavailable<T>() -> Result<T, ExtensionError> {
        Err(ExtensionError::Extension("recorded in snapshot only".to_string()))
    }
}

#[async_trait]
impl ExtensionWallet for RecordedWallet {
    async fn get_offline_signer_auto(&self, _chain_id: &str) -> Result<OfflineSigner, ExtensionError> {
        Self::unavailable()
    }

    async fn get_offline_direct_signer(
        &self,
        _chain_id: &str,
    ) -> Result<Arc<dyn OfflineDirectSigner>, ExtensionError> {
        Self::unavailable()
    }

    async fn send_tx(
        &self,
        _chain_id: &str,
        _tx: &[u8],
        _mode: BroadcastMode,
    ) -> Result<Vec<u8>, ExtensionError> {
        Self::unavailable()
    }

    async fn sign_arbitrary(
        &self,
        _chain_id: &str,
        _signer: &str,
        _data: ArbitraryData,
    ) -> Result<StdSignature, ExtensionError> {
        Self::unavailable()
    }

    async fn sign_direct(
        &self,
        _chain_id: &str,
        _signer: &str,
        _sign_doc: SignDirectParams,
    ) -> Result<DirectSignResponse, ExtensionError> {
        Self::unavailable()
    }

    async fn get_key(&self, _chain_id: &str) -> Result<AccountKey, ExtensionError> {
        Self::unavailable()
    }
}

#[derive(Serialize)]
struct DescriptorView<'a> {
    #[serde(flatten)]
    descriptor: &'a WalletDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<&'a str>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match &cli.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::ListWallets => {
            list_wallets();
            Ok(())
        }
        Commands::Show { id, json, with_icon } => {
            info!("Describing wallet: {}", id);
            show_wallet(&id, json, with_icon)
        }
        Commands::Probe { snapshot } => {
            info!("Probing snapshot: {:?}", snapshot);
            probe_snapshot(&snapshot)
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

const TABLE_WIDTH: usize = 72;

fn list_wallets() {
    for line in wallet_table() {
        println!("{}", line);
    }
}

/// Registry as a boxed table; every line has the same width
fn wallet_table() -> Vec<String> {
    let rule = |left: &str, right: &str| format!("{}{}{}", left, "─".repeat(TABLE_WIDTH), right);
    let row = |id: &str, name: &str, global: &str, url: &str| {
        format!("│  {:<8} │ {:<7} │ {:<15} │ {:<30} │", id, name, global, url)
    };

    let mut lines = vec![
        rule("┌", "┐"),
        format!("│  {:<70}│", "SUPPORTED WALLETS"),
        rule("├", "┤"),
        row("Id", "Name", "Global", "Homepage"),
        format!(
            "│  {}┼{}┼{}┼{}│",
            "─".repeat(9),
            "─".repeat(9),
            "─".repeat(17),
            "─".repeat(32)
        ),
    ];
    for desc in cosmos::descriptors() {
        lines.push(row(desc.id, desc.name, desc.probe.to_string().as_str(), desc.url));
    }
    lines.push(rule("└", "┘"));
    lines
}

fn show_wallet(id: &str, json: bool, with_icon: bool) -> Result<(), CliError> {
    let desc = cosmos::descriptor(id).ok_or_else(|| CliError::UnknownWallet(id.to_string()))?;

    if json {
        let view = DescriptorView {
            descriptor: desc,
            icon: with_icon.then_some(desc.icon),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│  WALLET {:<52}│", desc.id.to_uppercase());
    println!("├─────────────────────────────────────────────────────────────┤");
    println!("│  Name:     {:<49}│", desc.name);
    println!("│  Homepage: {:<49}│", desc.url);
    println!("│  Global:   {:<49}│", desc.probe.to_string());
    println!("└─────────────────────────────────────────────────────────────┘");
    if with_icon {
        println!("{}", desc.icon);
    }
    Ok(())
}

fn probe_snapshot(path: &Path) -> Result<(), CliError> {
    let snapshot = ScopeSnapshot::load(path)?;
    debug!("Snapshot fields: {:?}", snapshot.fields);
    let scope = snapshot.to_scope();
    let installed = cosmos::installed(&scope);

    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│  PROBE RESULTS                                              │");
    println!("├─────────────────────────────────────────────────────────────┤");
    for desc in cosmos::descriptors() {
        let status = if installed.iter().any(|d| d.id == desc.id) {
            "found"
        } else {
            "absent"
        };
        println!("│  {:<8} │ {:<15} │ {:<30}│", desc.id, desc.probe.to_string(), status);
    }
    println!("├─────────────────────────────────────────────────────────────┤");
    println!("│  {} of {} wallets available{:<34}│", installed.len(), cosmos::descriptors().len(), "");
    println!("└─────────────────────────────────────────────────────────────┘");
    Ok(())
}
