//! Wallet implementations for different blockchain ecosystems
//!
//! This module provides the shared wallet contract (errors, ready-state,
//! single-vs-batch parameters, notifications) and one adapter layer per
//! ecosystem (Cosmos extensions, Solana wallet adapters).

#[cfg(feature = "cosmos")]
pub mod cosmos;
#[cfg(feature = "solana")]
pub mod solana;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Common wallet error type
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// The wrapped wallet does not expose the requested capability.
    #[error("Not supported: {0}")]
    UnsupportedOperation(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown wallet state {0}")]
    InvalidState(String),

    /// Only produced by callers that escalate an absent extension; a probe
    /// itself never fails.
    #[error("Wallet extension not found: {0}")]
    ExtensionNotFound(String),

    #[error("Another {0} is already in flight on this wallet")]
    OperationInProgress(&'static str),

    #[cfg(feature = "solana")]
    #[error(transparent)]
    Adapter(#[from] solana::AdapterError),

    #[cfg(feature = "cosmos")]
    #[error(transparent)]
    Extension(#[from] cosmos::ExtensionError),
}

/// Numeric chain identifiers shared across wallet families
pub type ChainId = u16;

/// Known chain identifiers
pub mod chains {
    use super::ChainId;

    pub const SOLANA: ChainId = 1;
}

/// Normalized wallet readiness
///
/// The variant names match the native ready-state strings reported by wallet
/// adapters, so parsing is a direct name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletState {
    /// The wallet is installed and ready to connect.
    Installed,
    /// The wallet could not be found in the environment.
    NotDetected,
    /// The wallet can be loaded on demand (e.g. a web wallet).
    Loadable,
    /// The wallet is not supported in the current environment.
    Unsupported,
}

impl FromStr for WalletState {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Installed" => Ok(WalletState::Installed),
            "NotDetected" => Ok(WalletState::NotDetected),
            "Loadable" => Ok(WalletState::Loadable),
            "Unsupported" => Ok(WalletState::Unsupported),
            other => Err(WalletError::InvalidState(other.to_string())),
        }
    }
}

impl std::fmt::Display for WalletState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletState::Installed => write!(f, "Installed"),
            WalletState::NotDetected => write!(f, "NotDetected"),
            WalletState::Loadable => write!(f, "Loadable"),
            WalletState::Unsupported => write!(f, "Unsupported"),
        }
    }
}

/// A parameter or result that is either one item or an ordered batch
///
/// Operations that accept a `OneOrMany` answer with the same cardinality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Single(T),
    Batch(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Number of items carried
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::Single(_) => 1,
            OneOrMany::Batch(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, OneOrMany::Batch(_))
    }

    /// Flatten into an ordered vector, dropping the cardinality tag
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Single(item) => vec![item],
            OneOrMany::Batch(items) => items,
        }
    }

    /// Unwrap a single item, if this is one
    pub fn into_single(self) -> Option<T> {
        match self {
            OneOrMany::Single(item) => Some(item),
            OneOrMany::Batch(_) => None,
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Batch(items)
    }
}

/// Outcome of a transaction submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTransactionResult<T> {
    /// Identifier of the first submitted transaction
    pub id: T,
    /// The lone identifier for a one-transaction submission, else all of them
    pub data: OneOrMany<T>,
}

/// Notifications a wallet emits to its own subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletEvent {
    Connect,
    Disconnect,
}

impl std::fmt::Display for WalletEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletEvent::Connect => write!(f, "connect"),
            WalletEvent::Disconnect => write!(f, "disconnect"),
        }
    }
}
