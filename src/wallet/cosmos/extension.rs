//! Contract of an injected Cosmos wallet extension
//!
//! The registry hands out handles implementing [`ExtensionWallet`] exactly as
//! the extension injected them. No wrapping and no caching happen here.

use async_trait::async_trait;
use std::sync::Arc;

use super::types::{
    AccountData, AccountKey, AminoSignResponse, ArbitraryData, BroadcastMode, ChainInfo,
    DirectSignResponse, SignDirectParams, StdSignature,
};
use crate::wallet::WalletError;

/// Errors raised by a Cosmos extension
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtensionError {
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Chain {0} is not enabled in the extension")]
    ChainNotFound(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Extension error: {0}")]
    Extension(String),
}

/// Offline signer returned by `getOfflineSignerAuto`
///
/// Ledger-backed keys only sign amino documents, so the extension picks the
/// mode per key.
#[derive(Clone)]
pub enum OfflineSigner {
    Direct(Arc<dyn OfflineDirectSigner>),
    Amino(Arc<dyn OfflineAminoSigner>),
}

impl OfflineSigner {
    pub fn is_direct(&self) -> bool {
        matches!(self, OfflineSigner::Direct(_))
    }

    pub async fn get_accounts(&self) -> Result<Vec<AccountData>, ExtensionError> {
        match self {
            OfflineSigner::Direct(signer) => signer.get_accounts().await,
            OfflineSigner::Amino(signer) => signer.get_accounts().await,
        }
    }
}

impl std::fmt::Debug for OfflineSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfflineSigner::Direct(_) => write!(f, "OfflineSigner::Direct"),
            OfflineSigner::Amino(_) => write!(f, "OfflineSigner::Amino"),
        }
    }
}

#[async_trait]
pub trait OfflineDirectSigner: Send + Sync {
    async fn get_accounts(&self) -> Result<Vec<AccountData>, ExtensionError>;

    async fn sign_direct(
        &self,
        signer_address: &str,
        sign_doc: SignDirectParams,
    ) -> Result<DirectSignResponse, ExtensionError>;
}

#[async_trait]
pub trait OfflineAminoSigner: Send + Sync {
    async fn get_accounts(&self) -> Result<Vec<AccountData>, ExtensionError>;

    async fn sign_amino(
        &self,
        signer_address: &str,
        sign_doc: serde_json::Value,
    ) -> Result<AminoSignResponse, ExtensionError>;
}

/// Injected Cosmos wallet handle (Keplr-compatible surface)
#[async_trait]
pub trait ExtensionWallet: Send + Sync {
    /// Direct or amino signer, chosen by the extension for the active key
    async fn get_offline_signer_auto(&self, chain_id: &str) -> Result<OfflineSigner, ExtensionError>;

    async fn get_offline_direct_signer(
        &self,
        chain_id: &str,
    ) -> Result<Arc<dyn OfflineDirectSigner>, ExtensionError>;

    /// Legacy accessor; same signer as [`get_offline_direct_signer`](Self::get_offline_direct_signer)
    async fn get_offline_signer(
        &self,
        chain_id: &str,
    ) -> Result<Arc<dyn OfflineDirectSigner>, ExtensionError> {
        self.get_offline_direct_signer(chain_id).await
    }

    /// Broadcast encoded tx bytes; returns the transaction hash
    async fn send_tx(
        &self,
        chain_id: &str,
        tx: &[u8],
        mode: BroadcastMode,
    ) -> Result<Vec<u8>, ExtensionError>;

    /// ADR-036 style signature over arbitrary data
    async fn sign_arbitrary(
        &self,
        chain_id: &str,
        signer: &str,
        data: ArbitraryData,
    ) -> Result<StdSignature, ExtensionError>;

    async fn sign_direct(
        &self,
        chain_id: &str,
        signer: &str,
        sign_doc: SignDirectParams,
    ) -> Result<DirectSignResponse, ExtensionError>;

    async fn get_key(&self, chain_id: &str) -> Result<AccountKey, ExtensionError>;

    /// Chain suggestion capability, when the extension offers it
    fn chain_suggester(&self) -> Option<&dyn ChainSuggester> {
        None
    }
}

/// Optional `experimentalSuggestChain` capability
#[async_trait]
pub trait ChainSuggester: Send + Sync {
    async fn experimental_suggest_chain(&self, chain_info: &ChainInfo) -> Result<(), ExtensionError>;
}

/// Ask `wallet` to add `chain_info`; fails when the extension cannot suggest chains
pub async fn suggest_chain(
    wallet: &dyn ExtensionWallet,
    chain_info: &ChainInfo,
) -> Result<(), WalletError> {
    let suggester = wallet
        .chain_suggester()
        .ok_or(WalletError::UnsupportedOperation("experimentalSuggestChain"))?;
    suggester.experimental_suggest_chain(chain_info).await?;
    Ok(())
}
