//! Host global scope where extensions inject themselves
//!
//! Extensions appear (and disappear) asynchronously relative to page load, so
//! the scope is always read live. [`BrowserScope`] is an in-process scope that
//! hosts and tests populate directly.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::debug;

use super::extension::ExtensionWallet;

/// A value found on a global field
#[derive(Clone)]
pub enum InjectedValue {
    /// A wallet handle
    Wallet(Arc<dyn ExtensionWallet>),
    /// A namespace object holding further fields (e.g. `coin98`)
    Namespace(HashMap<String, InjectedValue>),
}

impl InjectedValue {
    /// Field lookup on a namespace; `None` for wallets and missing fields
    pub fn get(&self, field: &str) -> Option<&InjectedValue> {
        match self {
            InjectedValue::Namespace(fields) => fields.get(field),
            InjectedValue::Wallet(_) => None,
        }
    }

    pub fn as_wallet(&self) -> Option<&Arc<dyn ExtensionWallet>> {
        match self {
            InjectedValue::Wallet(wallet) => Some(wallet),
            InjectedValue::Namespace(_) => None,
        }
    }
}

impl std::fmt::Debug for InjectedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InjectedValue::Wallet(_) => write!(f, "Wallet(..)"),
            InjectedValue::Namespace(fields) => {
                let mut names: Vec<&String> = fields.keys().collect();
                names.sort();
                f.debug_tuple("Namespace").field(&names).finish()
            }
        }
    }
}

/// Read access to the host's global fields
pub trait GlobalScope: Send + Sync {
    /// Current value of a top-level field
    fn field(&self, name: &str) -> Option<InjectedValue>;
}

#[derive(Debug, Default)]
pub struct BrowserScope {
    fields: RwLock<HashMap<String, InjectedValue>>,
}

impl BrowserScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide scope used by zero-argument lookups
    pub fn global() -> &'static BrowserScope {
        static GLOBAL: OnceLock<BrowserScope> = OnceLock::new();
        GLOBAL.get_or_init(BrowserScope::new)
    }

    /// Set a top-level field, replacing any previous value
    pub fn inject(&self, name: &str, value: InjectedValue) {
        debug!("Injecting global field {}", name);
        self.fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value);
    }

    pub fn inject_wallet(&self, name: &str, wallet: Arc<dyn ExtensionWallet>) {
        self.inject(name, InjectedValue::Wallet(wallet));
    }

    /// Set `parent.field`, creating the namespace or replacing a non-namespace parent
    pub fn inject_nested(&self, parent: &str, field: &str, wallet: Arc<dyn ExtensionWallet>) {
        debug!("Injecting global field {}.{}", parent, field);
        let mut fields = self.fields.write().unwrap_or_else(PoisonError::into_inner);
        let slot = fields
            .entry(parent.to_string())
            .or_insert_with(|| InjectedValue::Namespace(HashMap::new()));

        if let InjectedValue::Wallet(_) = slot {
            *slot = InjectedValue::Namespace(HashMap::new());
        }
        if let InjectedValue::Namespace(children) = slot {
            children.insert(field.to_string(), InjectedValue::Wallet(wallet));
        }
    }

    pub fn remove(&self, name: &str) -> Option<InjectedValue> {
        self.fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    pub fn clear(&self) {
        self.fields.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Names of the top-level fields currently set, sorted
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl GlobalScope for BrowserScope {
    fn field(&self, name: &str) -> Option<InjectedValue> {
        self.fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::cosmos::testing::StubExtension;

    #[test]
    fn test_inject_and_remove() {
        let scope = BrowserScope::new();
        assert!(scope.field("keplr").is_none());

        scope.inject_wallet("keplr", Arc::new(StubExtension::new("cosmos")));
        assert!(scope.field("keplr").and_then(|v| v.as_wallet().cloned()).is_some());
        assert_eq!(scope.field_names(), vec!["keplr".to_string()]);

        assert!(scope.remove("keplr").is_some());
        assert!(scope.field("keplr").is_none());
    }

    #[test]
    fn test_inject_nested_merges_namespace() {
        let scope = BrowserScope::new();
        scope.inject_nested("coin98", "keplr", Arc::new(StubExtension::new("cosmos")));
        scope.inject_nested("coin98", "sol", Arc::new(StubExtension::new("cosmos")));

        let coin98 = scope.field("coin98").unwrap();
        assert!(coin98.as_wallet().is_none());
        assert!(coin98.get("keplr").and_then(InjectedValue::as_wallet).is_some());
        assert!(coin98.get("sol").is_some());
        assert!(coin98.get("missing").is_none());
        assert_eq!(format!("{:?}", coin98), "Namespace([\"keplr\", \"sol\"])");
    }

    #[test]
    fn test_inject_nested_replaces_wallet_parent() {
        let scope = BrowserScope::new();
        scope.inject_wallet("$onekey", Arc::new(StubExtension::new("cosmos")));
        scope.inject_nested("$onekey", "cosmos", Arc::new(StubExtension::new("cosmos")));

        let onekey = scope.field("$onekey").unwrap();
        assert!(onekey.get("cosmos").is_some());
    }

    #[test]
    fn test_wallet_has_no_fields() {
        let value = InjectedValue::Wallet(Arc::new(StubExtension::new("cosmos")));
        assert!(value.get("keplr").is_none());
    }
}
