//! Cosmos wallet data types
//!
//! Field names follow the JSON shapes the extensions exchange (camelCase),
//! byte fields travel as base64.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bech32::{FromBase32, ToBase32, Variant};
use serde::{Deserialize, Serialize};

use super::extension::ExtensionError;

/// Serde adapter for byte fields carried as base64 strings
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// Public identity of one account, as reported by `getKey`
///
/// Extensions return a fresh snapshot on every query; nothing here is cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountKey {
    pub name: String,
    /// Key algorithm, e.g. `secp256k1`
    pub algo: String,
    #[serde(with = "base64_bytes")]
    pub pub_key: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub address: Vec<u8>,
    pub bech32_address: String,
}

impl AccountKey {
    /// Human-readable part of the bech32 address (`cosmos`, `osmo`, ...)
    pub fn prefix(&self) -> Result<String, ExtensionError> {
        let (hrp, _, _) = bech32::decode(&self.bech32_address)
            .map_err(|e| ExtensionError::InvalidAddress(format!("{}: {}", self.bech32_address, e)))?;
        Ok(hrp)
    }

    /// Check that `bech32_address` encodes exactly `address`
    pub fn verify(&self) -> Result<(), ExtensionError> {
        let (_, data, variant) = bech32::decode(&self.bech32_address)
            .map_err(|e| ExtensionError::InvalidAddress(format!("{}: {}", self.bech32_address, e)))?;

        if variant != Variant::Bech32 {
            return Err(ExtensionError::InvalidAddress(format!(
                "{}: expected bech32, found bech32m",
                self.bech32_address
            )));
        }

        let decoded = Vec::<u8>::from_base32(&data)
            .map_err(|e| ExtensionError::InvalidAddress(format!("{}: {}", self.bech32_address, e)))?;

        if decoded != self.address {
            return Err(ExtensionError::InvalidAddress(format!(
                "{} does not encode address {}",
                self.bech32_address,
                hex::encode(&self.address)
            )));
        }
        Ok(())
    }

    pub fn pub_key_hex(&self) -> String {
        hex::encode(&self.pub_key)
    }
}

/// Encode raw address bytes under `prefix`
pub fn encode_address(prefix: &str, address: &[u8]) -> Result<String, ExtensionError> {
    bech32::encode(prefix, address.to_base32(), Variant::Bech32)
        .map_err(|e| ExtensionError::InvalidAddress(format!("Bech32 encoding failed: {}", e)))
}

/// An account exposed by an offline signer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    pub address: String,
    pub algo: String,
    #[serde(with = "base64_bytes")]
    pub pubkey: Vec<u8>,
}

/// Direct-mode sign document
///
/// Every field is optional; an absent field means "unspecified" and is
/// passed through to the extension as such.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignDirectParams {
    pub body_bytes: Option<Vec<u8>>,
    pub auth_info_bytes: Option<Vec<u8>>,
    pub chain_id: Option<String>,
    pub account_number: Option<u64>,
}

impl SignDirectParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body_bytes(mut self, body_bytes: Vec<u8>) -> Self {
        self.body_bytes = Some(body_bytes);
        self
    }

    pub fn with_auth_info_bytes(mut self, auth_info_bytes: Vec<u8>) -> Self {
        self.auth_info_bytes = Some(auth_info_bytes);
        self
    }

    pub fn with_chain_id(mut self, chain_id: &str) -> Self {
        self.chain_id = Some(chain_id.to_string());
        self
    }

    pub fn with_account_number(mut self, account_number: u64) -> Self {
        self.account_number = Some(account_number);
        self
    }

    /// Whether every field of the document is specified
    pub fn is_complete(&self) -> bool {
        self.body_bytes.is_some()
            && self.auth_info_bytes.is_some()
            && self.chain_id.is_some()
            && self.account_number.is_some()
    }
}

/// Public key attached to a signature (`type` + base64 `value`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub value: String,
}

impl PubKey {
    pub fn bytes(&self) -> Result<Vec<u8>, ExtensionError> {
        STANDARD
            .decode(&self.value)
            .map_err(|e| ExtensionError::Extension(format!("Invalid public key encoding: {}", e)))
    }
}

/// Amino-style standard signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    pub pub_key: PubKey,
    /// Base64 signature
    pub signature: String,
}

impl StdSignature {
    pub fn signature_bytes(&self) -> Result<Vec<u8>, ExtensionError> {
        STANDARD
            .decode(&self.signature)
            .map_err(|e| ExtensionError::Extension(format!("Invalid signature encoding: {}", e)))
    }
}

/// Result of a direct-mode signing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectSignResponse {
    /// The document as signed; the extension may have adjusted it (e.g. fees)
    pub signed: SignDirectParams,
    pub signature: StdSignature,
}

/// Result of an amino signing request; the document is opaque JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AminoSignResponse {
    pub signed: serde_json::Value,
    pub signature: StdSignature,
}

/// How `sendTx` waits for the node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastMode {
    Async,
    Sync,
    Block,
}

impl std::fmt::Display for BroadcastMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BroadcastMode::Async => write!(f, "async"),
            BroadcastMode::Sync => write!(f, "sync"),
            BroadcastMode::Block => write!(f, "block"),
        }
    }
}

/// Payload for `signArbitrary`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArbitraryData {
    Text(String),
    Bytes(Vec<u8>),
}

impl ArbitraryData {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ArbitraryData::Text(text) => text.as_bytes(),
            ArbitraryData::Bytes(bytes) => bytes,
        }
    }
}

impl From<&str> for ArbitraryData {
    fn from(text: &str) -> Self {
        ArbitraryData::Text(text.to_string())
    }
}

impl From<Vec<u8>> for ArbitraryData {
    fn from(bytes: Vec<u8>) -> Self {
        ArbitraryData::Bytes(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub coin_denom: String,
    pub coin_minimal_denom: String,
    pub coin_decimals: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coingecko_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bip44 {
    pub coin_type: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bech32Config {
    pub bech32_prefix_acc_addr: String,
    pub bech32_prefix_acc_pub: String,
    pub bech32_prefix_val_addr: String,
    pub bech32_prefix_val_pub: String,
    pub bech32_prefix_cons_addr: String,
    pub bech32_prefix_cons_pub: String,
}

impl Bech32Config {
    /// The conventional prefix family derived from an account prefix
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            bech32_prefix_acc_addr: prefix.to_string(),
            bech32_prefix_acc_pub: format!("{}pub", prefix),
            bech32_prefix_val_addr: format!("{}valoper", prefix),
            bech32_prefix_val_pub: format!("{}valoperpub", prefix),
            bech32_prefix_cons_addr: format!("{}valcons", prefix),
            bech32_prefix_cons_pub: format!("{}valconspub", prefix),
        }
    }
}

/// Chain description handed to `experimentalSuggestChain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc: String,
    pub rest: String,
    pub bip44: Bip44,
    pub bech32_config: Bech32Config,
    pub currencies: Vec<Currency>,
    pub fee_currencies: Vec<Currency>,
    pub stake_currency: Currency,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}
