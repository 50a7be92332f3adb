//! Collaborator contracts for Solana wallets
//!
//! A [`SolanaAdapter`] is the third-party wallet object: it reports its state
//! through fields, performs native connect/disconnect actions, and announces
//! their outcome through emitter-style signals rather than return values.
//! A [`SolanaConnection`] is the network side used for submission and
//! confirmation. Neither is implemented by this crate.

use async_trait::async_trait;
use std::sync::Arc;

use super::types::{Pubkey, Transaction, TransactionSignature};

/// Errors raised by wallet adapters and connections
///
/// Cloneable so an adapter can hand the same error to every "error" listener.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    #[error("Wallet not ready")]
    NotReady,

    #[error("User rejected the request: {0}")]
    Rejected(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Disconnection failed: {0}")]
    Disconnection(String),

    #[error("Transaction signing failed: {0}")]
    SignTransaction(String),

    #[error("Message signing failed: {0}")]
    SignMessage(String),

    #[error("Transaction submission failed: {0}")]
    SendTransaction(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Unknown adapter error: {0}")]
    Unknown(String),
}

/// Signal names an adapter emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterSignal {
    Connect,
    Disconnect,
    Error,
    ReadyStateChange,
}

impl std::fmt::Display for AdapterSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterSignal::Connect => write!(f, "connect"),
            AdapterSignal::Disconnect => write!(f, "disconnect"),
            AdapterSignal::Error => write!(f, "error"),
            AdapterSignal::ReadyStateChange => write!(f, "readyStateChange"),
        }
    }
}

/// A signal together with its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterEvent {
    Connect(Pubkey),
    Disconnect,
    Error(AdapterError),
    ReadyStateChange(String),
}

impl AdapterEvent {
    pub fn signal(&self) -> AdapterSignal {
        match self {
            AdapterEvent::Connect(_) => AdapterSignal::Connect,
            AdapterEvent::Disconnect => AdapterSignal::Disconnect,
            AdapterEvent::Error(_) => AdapterSignal::Error,
            AdapterEvent::ReadyStateChange(_) => AdapterSignal::ReadyStateChange,
        }
    }
}

/// Callback registered against an adapter signal
pub type Listener = Arc<dyn Fn(&AdapterEvent) + Send + Sync>;

/// Handle returned by [`SolanaAdapter::on`], used to deregister exactly that listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Third-party Solana wallet adapter
#[async_trait]
pub trait SolanaAdapter: Send + Sync {
    fn name(&self) -> &str;

    fn url(&self) -> &str;

    /// Icon as a data URI
    fn icon(&self) -> &str;

    /// Native ready-state value, e.g. `"Installed"`
    fn ready_state(&self) -> String;

    /// Public key of the connected account, if any
    ///
    /// Always a full 32-byte key, so wallet addresses are 32-44 base58
    /// characters; a short literal such as `"ABC"` stands for one only in prose.
    fn public_key(&self) -> Option<Pubkey>;

    fn connected(&self) -> bool;

    /// Register a listener for `signal`
    fn on(&self, signal: AdapterSignal, listener: Listener) -> ListenerId;

    /// Deregister a listener previously returned by [`on`](Self::on)
    fn off(&self, signal: AdapterSignal, id: ListenerId);

    /// Start the native connect flow. The outcome is announced through the
    /// `Connect` or `Error` signal; an `Err` here means the flow never started.
    async fn connect(&self) -> Result<(), AdapterError>;

    /// Start the native disconnect flow, announced through `Disconnect` or `Error`.
    async fn disconnect(&self) -> Result<(), AdapterError>;

    /// Submit an already-signed transaction through `connection`
    async fn send_transaction(
        &self,
        transaction: &Transaction,
        connection: &dyn SolanaConnection,
    ) -> Result<TransactionSignature, AdapterError>;

    /// Transaction signing capability, when the wallet offers it
    fn transaction_signer(&self) -> Option<&dyn TransactionSigner> {
        None
    }

    /// Message signing capability, when the wallet offers it
    fn message_signer(&self) -> Option<&dyn MessageSigner> {
        None
    }
}

/// Optional transaction signing capability of an adapter
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, AdapterError>;

    /// Sign a batch in one wallet prompt; output order matches input order
    async fn sign_all_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, AdapterError>;
}

/// Optional message signing capability of an adapter
#[async_trait]
pub trait MessageSigner: Send + Sync {
    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, AdapterError>;
}

/// Network collaborator used for submission and confirmation
#[async_trait]
pub trait SolanaConnection: Send + Sync {
    /// Submit a wire-encoded signed transaction; returns its pending signature
    async fn send_raw_transaction(&self, wire: &[u8]) -> Result<TransactionSignature, AdapterError>;

    /// Wait until `signature` is confirmed
    async fn confirm_transaction(&self, signature: &str) -> Result<(), AdapterError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_signal_mapping() {
        let key = Pubkey::new([1u8; 32]);
        assert_eq!(AdapterEvent::Connect(key).signal(), AdapterSignal::Connect);
        assert_eq!(AdapterEvent::Disconnect.signal(), AdapterSignal::Disconnect);
        assert_eq!(
            AdapterEvent::Error(AdapterError::NotReady).signal(),
            AdapterSignal::Error
        );
        assert_eq!(
            AdapterEvent::ReadyStateChange("Installed".into()).signal(),
            AdapterSignal::ReadyStateChange
        );
    }

    #[test]
    fn test_signal_display() {
        assert_eq!(AdapterSignal::Connect.to_string(), "connect");
        assert_eq!(AdapterSignal::ReadyStateChange.to_string(), "readyStateChange");
    }
}
