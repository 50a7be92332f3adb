//! Solana Wallet Implementation
//!
//! [`SolanaWallet`] presents the normalized request/response contract over an
//! adapter whose native interface fires callbacks instead of returning results.
//!
//! Connection state is never tracked here: `is_connected`, the addresses and
//! the wallet state are all read from the adapter on demand.

use futures_util::Stream;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, info, warn};

use super::adapter::{
    AdapterError, AdapterEvent, AdapterSignal, Listener, ListenerId, SolanaAdapter, SolanaConnection,
};
use super::types::{Transaction, TransactionSignature};
use crate::wallet::{chains, ChainId, OneOrMany, SendTransactionResult, WalletError, WalletEvent, WalletState};

const EVENT_CAPACITY: usize = 16;

/// Network details reported by a Solana wallet
///
/// Wallet adapters do not expose which cluster they are pointed at, so this is
/// always empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolanaNetworkInfo {}

/// Native lifecycle actions bridged into futures
#[derive(Debug, Clone, Copy)]
enum NativeAction {
    Connect,
    Disconnect,
}

impl NativeAction {
    fn signal(self) -> AdapterSignal {
        match self {
            NativeAction::Connect => AdapterSignal::Connect,
            NativeAction::Disconnect => AdapterSignal::Disconnect,
        }
    }

    fn name(self) -> &'static str {
        match self {
            NativeAction::Connect => "connect",
            NativeAction::Disconnect => "disconnect",
        }
    }
}

type Settlement = oneshot::Sender<Result<(), AdapterError>>;

/// Marks a connect/disconnect as in flight; cleared on drop
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, action: NativeAction) -> Result<Self, WalletError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| WalletError::OperationInProgress(action.name()))?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Listeners placed on the adapter by one bridged action; removed on drop,
/// including when the caller abandons the future
struct Registered<'a> {
    adapter: &'a dyn SolanaAdapter,
    listeners: [(AdapterSignal, ListenerId); 2],
}

impl Drop for Registered<'_> {
    fn drop(&mut self) {
        for (signal, id) in self.listeners {
            self.adapter.off(signal, id);
        }
    }
}

/// Normalized wrapper over a Solana wallet adapter and RPC connection
pub struct SolanaWallet {
    adapter: Arc<dyn SolanaAdapter>,
    connection: Arc<dyn SolanaConnection>,
    events: broadcast::Sender<WalletEvent>,
    lifecycle_busy: AtomicBool,
}

impl SolanaWallet {
    /// Wrap an adapter and the connection used for submissions
    pub fn new(adapter: Arc<dyn SolanaAdapter>, connection: Arc<dyn SolanaConnection>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            adapter,
            connection,
            events,
            lifecycle_busy: AtomicBool::new(false),
        }
    }

    pub fn adapter(&self) -> &Arc<dyn SolanaAdapter> {
        &self.adapter
    }

    pub fn connection(&self) -> &Arc<dyn SolanaConnection> {
        &self.connection
    }

    pub fn name(&self) -> &str {
        self.adapter.name()
    }

    pub fn url(&self) -> &str {
        self.adapter.url()
    }

    pub fn icon(&self) -> &str {
        self.adapter.icon()
    }

    pub fn chain_id(&self) -> ChainId {
        chains::SOLANA
    }

    pub fn network_info(&self) -> Option<SolanaNetworkInfo> {
        Some(SolanaNetworkInfo::default())
    }

    pub fn is_connected(&self) -> bool {
        self.adapter.connected()
    }

    /// Receive `connect`/`disconnect` notifications from this wallet
    pub fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }

    /// Notifications as a stream; ends when the wallet is dropped
    pub fn events(&self) -> impl Stream<Item = WalletEvent> {
        let mut rx = self.subscribe();
        async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok(event) => yield event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Wallet event subscriber lagged, skipped {} event(s)", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    /// Connect the wallet and return its addresses
    pub async fn connect(&self) -> Result<Vec<String>, WalletError> {
        info!("Connecting wallet {}", self.name());
        if let Err(e) = self.bridge(NativeAction::Connect).await {
            warn!("Wallet {} failed to connect: {}", self.name(), e);
            return Err(e);
        }

        let addresses = self.addresses();
        info!("Wallet {} connected with {} address(es)", self.name(), addresses.len());
        self.notify(WalletEvent::Connect);
        Ok(addresses)
    }

    pub async fn disconnect(&self) -> Result<(), WalletError> {
        info!("Disconnecting wallet {}", self.name());
        if let Err(e) = self.bridge(NativeAction::Disconnect).await {
            warn!("Wallet {} failed to disconnect: {}", self.name(), e);
            return Err(e);
        }

        self.notify(WalletEvent::Disconnect);
        Ok(())
    }

    /// Base58 address of the current account, if the adapter knows one
    pub fn address(&self) -> Option<String> {
        self.adapter.public_key().map(|key| key.to_string())
    }

    pub fn addresses(&self) -> Vec<String> {
        self.address().into_iter().collect()
    }

    /// Solana wallets expose a single implicit account
    pub fn set_main_address(&self, _address: &str) -> Result<(), WalletError> {
        Err(WalletError::UnsupportedOperation("set_main_address"))
    }

    /// Balances are not reachable through a wallet adapter
    pub async fn get_balance(&self) -> Result<String, WalletError> {
        Err(WalletError::UnsupportedOperation("get_balance"))
    }

    /// Sign one transaction or an ordered batch, preserving cardinality
    pub async fn sign_transaction(
        &self,
        transaction: OneOrMany<Transaction>,
    ) -> Result<OneOrMany<Transaction>, WalletError> {
        let signer = self
            .adapter
            .transaction_signer()
            .ok_or(WalletError::UnsupportedOperation("sign_transaction"))?;

        match transaction {
            OneOrMany::Single(tx) => Ok(OneOrMany::Single(signer.sign_transaction(tx).await?)),
            OneOrMany::Batch(txs) => {
                debug!("Signing batch of {} transaction(s)", txs.len());
                Ok(OneOrMany::Batch(signer.sign_all_transactions(txs).await?))
            }
        }
    }

    /// Submit signed transactions one after another, in order
    ///
    /// Only the first submission is confirmed before returning; later ones
    /// may still be pending. If submission N fails, the signatures of the
    /// earlier submissions are not returned.
    pub async fn send_transaction(
        &self,
        transaction: OneOrMany<Transaction>,
    ) -> Result<SendTransactionResult<TransactionSignature>, WalletError> {
        let transactions = transaction.into_vec();
        if transactions.is_empty() {
            return Err(WalletError::InvalidArgument("Empty transactions array".to_string()));
        }

        let total = transactions.len();
        let mut ids: Vec<TransactionSignature> = Vec::with_capacity(total);
        for (index, tx) in transactions.iter().enumerate() {
            let id = self.adapter.send_transaction(tx, self.connection.as_ref()).await?;
            debug!("Submitted transaction {}/{}: {}", index + 1, total, id);
            ids.push(id);
        }

        let first = ids[0].clone();
        self.connection.confirm_transaction(&first).await?;
        info!("Transaction {} confirmed ({} submitted)", first, total);

        let data = if ids.len() == 1 {
            OneOrMany::Single(first.clone())
        } else {
            OneOrMany::Batch(ids)
        };
        Ok(SendTransactionResult { id: first, data })
    }

    pub async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, WalletError> {
        let signer = self
            .adapter
            .message_signer()
            .ok_or(WalletError::UnsupportedOperation("sign_message"))?;
        Ok(signer.sign_message(message).await?)
    }

    /// Map the adapter's native ready-state onto [`WalletState`]
    pub fn wallet_state(&self) -> Result<WalletState, WalletError> {
        self.adapter.ready_state().parse()
    }

    fn notify(&self, event: WalletEvent) {
        // Err only means nobody is subscribed.
        let _ = self.events.send(event);
    }

    /// Trigger a native action and wait for the signal that settles it
    ///
    /// Both listeners are registered before the action starts and removed on
    /// every outcome.
    async fn bridge(&self, action: NativeAction) -> Result<(), WalletError> {
        let _in_flight = InFlight::acquire(&self.lifecycle_busy, action)?;

        let (tx, rx) = oneshot::channel();
        let slot = Arc::new(Mutex::new(Some(tx)));

        let on_done = self.adapter.on(action.signal(), settle_with(&slot, |_| Ok(())));
        let on_error = self.adapter.on(
            AdapterSignal::Error,
            settle_with(&slot, |event| match event {
                AdapterEvent::Error(e) => Err(e.clone()),
                other => Err(AdapterError::Unknown(format!("unexpected {} signal", other.signal()))),
            }),
        );
        let _registered = Registered {
            adapter: self.adapter.as_ref(),
            listeners: [(action.signal(), on_done), (AdapterSignal::Error, on_error)],
        };
        debug!("Registered {} listeners on {}", action.name(), self.name());

        let triggered = match action {
            NativeAction::Connect => self.adapter.connect().await,
            NativeAction::Disconnect => self.adapter.disconnect().await,
        };

        let outcome = match triggered {
            Ok(()) => rx.await.unwrap_or_else(|_| {
                Err(AdapterError::Unknown(format!("{} listener dropped before settling", action.name())))
            }),
            Err(e) => Err(e),
        };

        outcome.map_err(WalletError::from)
    }
}

/// Listener that settles the shared slot once; later calls are no-ops
fn settle_with<F>(slot: &Arc<Mutex<Option<Settlement>>>, outcome: F) -> Listener
where
    F: Fn(&AdapterEvent) -> Result<(), AdapterError> + Send + Sync + 'static,
{
    let slot = Arc::clone(slot);
    Arc::new(move |event| {
        let sender = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(sender) = sender {
            let _ = sender.send(outcome(event));
        }
    })
}

impl std::fmt::Debug for SolanaWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaWallet")
            .field("name", &self.adapter.name())
            .field("connected", &self.adapter.connected())
            .field("address", &self.address())
            .finish()
    }
}
