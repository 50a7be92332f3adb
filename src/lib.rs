//! wallet-aggregator - one wallet contract over many wallet extensions
//!
//! Cosmos browser extensions are found through a registry of probes into the
//! host's global scope ([`wallet::cosmos`]). Solana wallet adapters are
//! wrapped so their event-driven lifecycle reads as plain async calls
//! ([`wallet::solana`]). Signing, transaction building and networking stay
//! with the wrapped collaborators.

pub mod wallet;

pub use wallet::{
    chains, ChainId, OneOrMany, SendTransactionResult, WalletError, WalletEvent, WalletState,
};
