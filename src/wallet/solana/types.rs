//! Solana value types seen by the wallet layer

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Base58 transaction signature returned by a submission
pub type TransactionSignature = String;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PubkeyError {
    #[error("Invalid base58: {0}")]
    InvalidBase58(String),

    #[error("Expected 32 bytes, got {0}")]
    WrongLength(usize),
}

/// Solana public key (32 bytes, base58 on the wire)
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for Pubkey {
    type Err = PubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| PubkeyError::InvalidBase58(e.to_string()))?;

        let key: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| PubkeyError::WrongLength(bytes.len()))?;

        Ok(Self(key))
    }
}

impl std::fmt::Display for Pubkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", bs58::encode(&self.0).into_string())
    }
}

impl std::fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pubkey({})", self)
    }
}

/// An opaque Solana transaction
///
/// The wallet layer never inspects the message; it only moves the transaction
/// between caller, adapter and connection. Signing fills `signatures`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Detached 64-byte signatures, in signer order
    pub signatures: Vec<Vec<u8>>,
    /// Serialized message bytes
    pub message: Vec<u8>,
}

impl Transaction {
    /// Create an unsigned transaction around a serialized message
    pub fn new(message: Vec<u8>) -> Self {
        Self {
            signatures: Vec::new(),
            message,
        }
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    /// Wire encoding: compact-u16 signature count, signatures, message
    pub fn serialize(&self) -> Vec<u8> {
        let sig_bytes: usize = self.signatures.iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(3 + sig_bytes + self.message.len());
        encode_short_len(self.signatures.len(), &mut out);
        for sig in &self.signatures {
            out.extend_from_slice(sig);
        }
        out.extend_from_slice(&self.message);
        out
    }

    /// Base64 of the wire encoding, as RPC `sendTransaction` expects it
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.serialize())
    }
}

/// Solana's compact-u16 length prefix (7 bits per byte, high bit continues)
fn encode_short_len(mut len: usize, out: &mut Vec<u8>) {
    loop {
        let mut byte = (len & 0x7f) as u8;
        len >>= 7;
        if len == 0 {
            out.push(byte);
            return;
        }
        byte |= 0x80;
        out.push(byte);
    }
}
