//! # defiguard-wallet
//!
//! Wallet core for an EIP-1193 ("injected") Ethereum provider.
//!
//! The provider itself owns keys, signing and broadcasting. This crate wraps it in a typed
//! [`WalletProvider`] adapter, approximates recent activity with a bounded [`BlockScanner`], and
//! drives everything from a single-threaded [`WalletViewModel`].

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod demo;
pub mod error;
pub mod history;
pub mod network;
pub mod provider;
pub mod units;
pub mod view_model;

pub use config::WalletConfig;
pub use error::{ConfigError, ProviderError, ValidationError, WalletError};
pub use history::{BlockRef, BlockScanner, Direction, HistorySource, TxHistory, TxRecord};
pub use network::{KnownNetwork, NetworkDescriptor};
pub use provider::{
    EventKind, InjectedProvider, ListenerSet, ProviderEvent, RpcError, RpcProvider, Subscription,
    WalletProvider,
};
pub use units::Balance;
pub use view_model::{Command, Mode, SendForm, WalletState, WalletViewModel};
