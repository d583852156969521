//! The injected provider capability and the typed adapter around it.

use alloy_primitives::Address;
use async_trait::async_trait;
use serde_json::Value;
use std::{fmt, sync::Arc};

mod adapter;
pub use adapter::WalletProvider;

mod error;
pub use error::RpcError;

mod events;
pub use events::{ListenerSet, Subscription};

mod rpc;
pub use rpc::RpcProvider;

pub mod types;
pub use types::{
    GasPriceRecommendation, RpcBlock, RpcReceipt, RpcTransaction, TransactionDetails, TxParams,
    TxStatus,
};

/// An EIP-1193 provider: a JSON-RPC `request` entry point plus event listeners.
///
/// Keys, signing and broadcasting all live behind this trait.
#[async_trait]
pub trait InjectedProvider: Send + Sync + fmt::Debug {
    /// Sends a JSON-RPC request with positional `params`.
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError>;

    /// Registers a listener for `kind` events.
    fn on(&self, kind: EventKind, listener: Listener) -> ListenerId;

    /// Unregisters a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}

/// The provider events the wallet listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    AccountsChanged,
    ChainChanged,
}

impl EventKind {
    /// The EIP-1193 event name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AccountsChanged => "accountsChanged",
            Self::ChainChanged => "chainChanged",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(u64),
}

impl ProviderEvent {
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::AccountsChanged(_) => EventKind::AccountsChanged,
            Self::ChainChanged(_) => EventKind::ChainChanged,
        }
    }
}

pub type Listener = Arc<dyn Fn(&ProviderEvent) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);
