//! Cosmos browser-extension wallets
//!
//! Extensions such as Keplr inject a wallet object into the page's global
//! scope. This module describes that object ([`ExtensionWallet`]), the scope
//! it lives in ([`GlobalScope`]) and the registry that finds it ([`locate`]).

pub mod extension;
pub mod registry;
pub mod scope;
pub mod types;

pub use extension::{
    suggest_chain, ChainSuggester, ExtensionError, ExtensionWallet, OfflineAminoSigner,
    OfflineDirectSigner, OfflineSigner,
};
pub use registry::{
    descriptor, descriptors, installed, locate, require, ProbePath, WalletDescriptor, WALLETS,
};
pub use scope::{BrowserScope, GlobalScope, InjectedValue};
pub use types::{
    encode_address, AccountData, AccountKey, AminoSignResponse, ArbitraryData, Bech32Config, Bip44,
    BroadcastMode, ChainInfo, Currency, DirectSignResponse, PubKey, SignDirectParams,
    StdSignature,
};

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use std::sync::{Arc, Mutex};

    use super::*;

    const ADDRESS: [u8; 20] = [7u8; 20];

    pub fn sample_chain() -> ChainInfo {
        let atom = Currency {
            coin_denom: "TEST".to_string(),
            coin_minimal_denom: "utest".to_string(),
            coin_decimals: 6,
            coingecko_id: None,
        };
        ChainInfo {
            chain_id: "testhub-1".to_string(),
            chain_name: "Test Hub".to_string(),
            rpc: "http://localhost:26657".to_string(),
            rest: "http://localhost:1317".to_string(),
            bip44: Bip44 { coin_type: 118 },
            bech32_config: Bech32Config::from_prefix("cosmos"),
            currencies: vec![atom.clone()],
            fee_currencies: vec![atom.clone()],
            stake_currency: atom,
            features: Vec::new(),
        }
    }

    fn signature() -> StdSignature {
        StdSignature {
            pub_key: PubKey {
                key_type: "tendermint/PubKeySecp256k1".to_string(),
                value: STANDARD.encode([2u8; 33]),
            },
            signature: STANDARD.encode([9u8; 64]),
        }
    }

    struct StubSigner {
        prefix: String,
    }

    #[async_trait]
    impl OfflineDirectSigner for StubSigner {
        async fn get_accounts(&self) -> Result<Vec<AccountData>, ExtensionError> {
            Ok(vec![AccountData {
                address: encode_address(&self.prefix, &ADDRESS)?,
                algo: "secp256k1".to_string(),
                pubkey: vec![2u8; 33],
            }])
        }

        async fn sign_direct(
            &self,
            _signer_address: &str,
            sign_doc: SignDirectParams,
        ) -> Result<DirectSignResponse, ExtensionError> {
            Ok(DirectSignResponse {
                signed: sign_doc,
                signature: signature(),
            })
        }
    }

    /// Extension double with canned answers
    pub struct StubExtension {
        prefix: String,
        suggest: bool,
        refuse: bool,
        suggested: Mutex<Vec<String>>,
    }

    impl StubExtension {
        pub fn new(prefix: &str) -> Self {
            Self {
                prefix: prefix.to_string(),
                suggest: false,
                refuse: false,
                suggested: Mutex::new(Vec::new()),
            }
        }

        pub fn with_suggest(mut self) -> Self {
            self.suggest = true;
            self
        }

        /// Reject every chain suggestion
        pub fn refusing(mut self) -> Self {
            self.refuse = true;
            self
        }

        pub fn suggested(&self) -> Vec<String> {
            self.suggested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ExtensionWallet for StubExtension {
        async fn get_offline_signer_auto(
            &self,
            chain_id: &str,
        ) -> Result<OfflineSigner, ExtensionError> {
            Ok(OfflineSigner::Direct(self.get_offline_direct_signer(chain_id).await?))
        }

        async fn get_offline_direct_signer(
            &self,
            _chain_id: &str,
        ) -> Result<Arc<dyn OfflineDirectSigner>, ExtensionError> {
            Ok(Arc::new(StubSigner {
                prefix: self.prefix.clone(),
            }))
        }

        async fn send_tx(
            &self,
            _chain_id: &str,
            tx: &[u8],
            _mode: BroadcastMode,
        ) -> Result<Vec<u8>, ExtensionError> {
            Ok(tx.iter().rev().copied().collect())
        }

        async fn sign_arbitrary(
            &self,
            _chain_id: &str,
            _signer: &str,
            _data: ArbitraryData,
        ) -> Result<StdSignature, ExtensionError> {
            Ok(signature())
        }

        async fn sign_direct(
            &self,
            _chain_id: &str,
            _signer: &str,
            sign_doc: SignDirectParams,
        ) -> Result<DirectSignResponse, ExtensionError> {
            Ok(DirectSignResponse {
                signed: sign_doc,
                signature: signature(),
            })
        }

        async fn get_key(&self, _chain_id: &str) -> Result<AccountKey, ExtensionError> {
            Ok(AccountKey {
                name: "stub".to_string(),
                algo: "secp256k1".to_string(),
                pub_key: vec![2u8; 33],
                address: ADDRESS.to_vec(),
                bech32_address: encode_address(&self.prefix, &ADDRESS)?,
            })
        }

        fn chain_suggester(&self) -> Option<&dyn ChainSuggester> {
            self.suggest.then_some(self as &dyn ChainSuggester)
        }
    }

    #[async_trait]
    impl ChainSuggester for StubExtension {
        async fn experimental_suggest_chain(
            &self,
            chain_info: &ChainInfo,
        ) -> Result<(), ExtensionError> {
            if self.refuse {
                return Err(ExtensionError::Rejected(chain_info.chain_id.clone()));
            }
            self.suggested.lock().unwrap().push(chain_info.chain_id.clone());
            Ok(())
        }
    }
}
