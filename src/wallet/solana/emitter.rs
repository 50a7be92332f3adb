//! Listener registry for adapter implementations
//!
//! Adapters can embed an [`AdapterEmitter`] to satisfy the `on`/`off` half of
//! [`SolanaAdapter`](super::SolanaAdapter) and call [`emit`](AdapterEmitter::emit)
//! when their native flows settle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use super::adapter::{AdapterEvent, AdapterSignal, Listener, ListenerId};

#[derive(Default)]
pub struct AdapterEmitter {
    next_id: AtomicU64,
    listeners: Mutex<HashMap<AdapterSignal, Vec<(ListenerId, Listener)>>>,
}

impl AdapterEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, signal: AdapterSignal, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().entry(signal).or_default().push((id, listener));
        id
    }

    pub fn off(&self, signal: AdapterSignal, id: ListenerId) {
        if let Some(registered) = self.lock().get_mut(&signal) {
            registered.retain(|(listener_id, _)| *listener_id != id);
        }
    }

    /// Drop every listener for `signal`
    pub fn off_all(&self, signal: AdapterSignal) {
        self.lock().remove(&signal);
    }

    pub fn listener_count(&self, signal: AdapterSignal) -> usize {
        self.lock().get(&signal).map_or(0, Vec::len)
    }

    /// Deliver `event` to the listeners of its signal, in registration order
    ///
    /// The listener list is snapshotted first, so listeners may call `on`/`off`.
    pub fn emit(&self, event: &AdapterEvent) -> usize {
        let snapshot: Vec<Listener> = self
            .lock()
            .get(&event.signal())
            .map(|registered| registered.iter().map(|(_, l)| l.clone()).collect())
            .unwrap_or_default();

        debug!("Emitting {} to {} listener(s)", event.signal(), snapshot.len());
        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<AdapterSignal, Vec<(ListenerId, Listener)>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for AdapterEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<AdapterSignal, usize> = self
            .lock()
            .iter()
            .map(|(signal, registered)| (*signal, registered.len()))
            .collect();
        f.debug_struct("AdapterEmitter")
            .field("listeners", &counts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn counter(hits: &Arc<AtomicUsize>) -> Listener {
        let hits = hits.clone();
        Arc::new(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_emit_reaches_only_matching_signal() {
        let emitter = AdapterEmitter::new();
        let connects = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(AtomicUsize::new(0));
        emitter.on(AdapterSignal::Connect, counter(&connects));
        emitter.on(AdapterSignal::Error, counter(&errors));

        assert_eq!(emitter.emit(&AdapterEvent::Connect(Default::default())), 1);
        assert_eq!(connects.load(Ordering::SeqCst), 1);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_off_removes_only_that_listener() {
        let emitter = AdapterEmitter::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let first = emitter.on(AdapterSignal::Disconnect, counter(&hits));
        emitter.on(AdapterSignal::Disconnect, counter(&hits));

        emitter.off(AdapterSignal::Disconnect, first);
        assert_eq!(emitter.listener_count(AdapterSignal::Disconnect), 1);

        emitter.emit(&AdapterEvent::Disconnect);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        emitter.off_all(AdapterSignal::Disconnect);
        assert_eq!(emitter.listener_count(AdapterSignal::Disconnect), 0);
    }

    #[test]
    fn test_listener_can_deregister_itself() {
        let emitter = Arc::new(AdapterEmitter::new());
        let id_slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));

        let listener: Listener = {
            let emitter = emitter.clone();
            let id_slot = id_slot.clone();
            Arc::new(move |_| {
                if let Some(id) = *id_slot.lock().unwrap() {
                    emitter.off(AdapterSignal::Disconnect, id);
                }
            })
        };
        let id = emitter.on(AdapterSignal::Disconnect, listener);
        *id_slot.lock().unwrap() = Some(id);

        emitter.emit(&AdapterEvent::Disconnect);
        assert_eq!(emitter.listener_count(AdapterSignal::Disconnect), 0);
    }
}
