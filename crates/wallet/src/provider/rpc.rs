use super::{
    EventKind, InjectedProvider, Listener, ListenerId, ListenerSet, ProviderEvent, RpcError,
};
use alloy_primitives::{Address, U64};
use alloy_rpc_client::{ClientBuilder, RpcClient};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::fmt;
use url::Url;

/// An [`InjectedProvider`] backed by a node's JSON-RPC endpoint over HTTP.
///
/// Intended for development nodes with unlocked accounts: account access is granted by
/// answering `eth_requestAccounts` with `eth_accounts`, and `eth_sendTransaction` is signed by the
/// node. HTTP has no push channel, so events are produced by [`RpcProvider::poll_events`].
pub struct RpcProvider {
    client: RpcClient,
    url: Url,
    listeners: ListenerSet,
    last_seen: Mutex<Option<(Vec<Address>, u64)>>,
}

impl RpcProvider {
    pub fn try_new(url: &str) -> Result<Self, url::ParseError> {
        let mut url_str = url.to_string();
        if url_str.starts_with("localhost:") {
            url_str = format!("http://{url_str}");
        }
        let url = Url::parse(&url_str)?;
        let client = ClientBuilder::default().http(url.clone());
        Ok(Self { client, url, listeners: ListenerSet::new(), last_seen: Mutex::new(None) })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Dispatches `event` to the registered listeners.
    pub fn emit(&self, event: &ProviderEvent) -> usize {
        self.listeners.emit(event)
    }

    /// Queries accounts and chain id and emits `accountsChanged`/`chainChanged` for whatever
    /// differs from the previous poll. The first poll only records the baseline.
    pub async fn poll_events(&self) -> Result<(), RpcError> {
        let accounts: Vec<Address> = decode(self.request("eth_accounts", json!([])).await?)?;
        let chain_id = decode::<U64>(self.request("eth_chainId", json!([])).await?)?.to::<u64>();

        let previous = self.last_seen.lock().replace((accounts.clone(), chain_id));
        let Some((prev_accounts, prev_chain_id)) = previous else { return Ok(()) };

        if prev_chain_id != chain_id {
            self.emit(&ProviderEvent::ChainChanged(chain_id));
        }
        if prev_accounts != accounts {
            self.emit(&ProviderEvent::AccountsChanged(accounts));
        }
        Ok(())
    }
}

#[async_trait]
impl InjectedProvider for RpcProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let method = match method {
            "eth_requestAccounts" => "eth_accounts",
            method => method,
        };
        trace!(target: "wallet::rpc", url = %self.url, method, "sending request");
        self.client.request::<_, Value>(method.to_string(), params).await.map_err(RpcError::from)
    }

    fn on(&self, kind: EventKind, listener: Listener) -> ListenerId {
        self.listeners.add(kind, listener)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

impl fmt::Debug for RpcProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcProvider")
            .field("url", &self.url.as_str())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, RpcError> {
    serde_json::from_value(value).map_err(|err| RpcError::internal(err.to_string()))
}
