//! Solana Wallet Adapters
//!
//! Wraps a third-party Solana wallet adapter (event-emitter based) and an RPC
//! connection behind the normalized wallet lifecycle: connect, sign, send,
//! disconnect. Signing and network submission stay with the collaborators.

mod adapter;
mod emitter;
mod types;
mod wallet;

pub use adapter::{
    AdapterError, AdapterEvent, AdapterSignal, Listener, ListenerId, MessageSigner,
    SolanaAdapter, SolanaConnection, TransactionSigner,
};
pub use emitter::AdapterEmitter;
pub use types::{Pubkey, PubkeyError, Transaction, TransactionSignature};
pub use wallet::{SolanaNetworkInfo, SolanaWallet};
