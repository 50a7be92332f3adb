//! Registry of known Cosmos wallet extensions
//!
//! Each entry carries static metadata and a [`ProbePath`] describing where the
//! extension injects its handle. Lookups read the scope live on every call.

use serde::{Serialize, Serializer};
use std::sync::Arc;
use tracing::debug;

use super::extension::ExtensionWallet;
use super::scope::{BrowserScope, GlobalScope};
use crate::wallet::WalletError;

/// Where an extension places its handle in the global scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbePath {
    /// A top-level field, e.g. `keplr`
    Field(&'static str),
    /// A field of a namespace object, e.g. `coin98.keplr`
    Nested {
        parent: &'static str,
        field: &'static str,
    },
}

impl ProbePath {
    /// Resolve the path against `scope`
    ///
    /// Any missing link, or a link of the wrong kind, yields `None`.
    pub fn resolve(&self, scope: &dyn GlobalScope) -> Option<Arc<dyn ExtensionWallet>> {
        match self {
            ProbePath::Field(name) => scope.field(name)?.as_wallet().cloned(),
            ProbePath::Nested { parent, field } => {
                scope.field(parent)?.get(field)?.as_wallet().cloned()
            }
        }
    }
}

impl std::fmt::Display for ProbePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbePath::Field(name) => write!(f, "{}", name),
            ProbePath::Nested { parent, field } => write!(f, "{}.{}", parent, field),
        }
    }
}

impl Serialize for ProbePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalletDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
    /// Data URI
    #[serde(skip_serializing)]
    pub icon: &'static str,
    pub probe: ProbePath,
}

impl WalletDescriptor {
    /// Look up this extension's handle in `scope`
    pub fn locate_in(&self, scope: &dyn GlobalScope) -> Option<Arc<dyn ExtensionWallet>> {
        let found = self.probe.resolve(scope);
        debug!(
            "Probe {} at {}: {}",
            self.id,
            self.probe,
            if found.is_some() { "hit" } else { "miss" }
        );
        found
    }

    /// Look up this extension's handle in the process-wide scope
    pub fn locate(&self) -> Option<Arc<dyn ExtensionWallet>> {
        self.locate_in(BrowserScope::global())
    }

    pub fn is_installed(&self, scope: &dyn GlobalScope) -> bool {
        self.probe.resolve(scope).is_some()
    }
}

pub static WALLETS: [WalletDescriptor; 5] = [
    WalletDescriptor {
        id: "keplr",
        name: "Keplr",
        url: "https://www.keplr.app/",
        icon: include_str!("../../../assets/icons/keplr.txt"),
        probe: ProbePath::Field("keplr"),
    },
    WalletDescriptor {
        id: "leap",
        name: "Leap",
        url: "https://www.leapwallet.io/",
        icon: include_str!("../../../assets/icons/leap.txt"),
        probe: ProbePath::Field("leap"),
    },
    WalletDescriptor {
        id: "falcon",
        name: "Falcon",
        url: "https://www.falconwallet.app/",
        icon: include_str!("../../../assets/icons/falcon.txt"),
        probe: ProbePath::Field("falcon"),
    },
    WalletDescriptor {
        id: "coin98",
        name: "Coin98",
        url: "https://wallet.coin98.com/",
        icon: include_str!("../../../assets/icons/coin98.txt"),
        probe: ProbePath::Nested {
            parent: "coin98",
            field: "keplr",
        },
    },
    WalletDescriptor {
        id: "onekey",
        name: "OneKey",
        url: "https://onekey.so/",
        icon: include_str!("../../../assets/icons/onekey.txt"),
        probe: ProbePath::Nested {
            parent: "$onekey",
            field: "cosmos",
        },
    },
];

/// All known extensions, in declaration order
pub fn descriptors() -> &'static [WalletDescriptor] {
    &WALLETS
}

pub fn descriptor(id: &str) -> Option<&'static WalletDescriptor> {
    WALLETS.iter().find(|d| d.id == id)
}

/// Find the injected handle for `id`; `None` for unknown ids and absent extensions
pub fn locate(id: &str, scope: &dyn GlobalScope) -> Option<Arc<dyn ExtensionWallet>> {
    match descriptor(id) {
        Some(desc) => desc.locate_in(scope),
        None => {
            debug!("No registry entry for wallet {}", id);
            None
        }
    }
}

/// Descriptors whose probe currently resolves
pub fn installed(scope: &dyn GlobalScope) -> Vec<&'static WalletDescriptor> {
    WALLETS.iter().filter(|d| d.is_installed(scope)).collect()
}

/// Like [`locate`], escalating absence to an error
pub fn require(id: &str, scope: &dyn GlobalScope) -> Result<Arc<dyn ExtensionWallet>, WalletError> {
    locate(id, scope).ok_or_else(|| WalletError::ExtensionNotFound(id.to_string()))
}
