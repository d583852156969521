use alloy_primitives::{Address, U64, U256};
use async_trait::async_trait;
use defiguard_wallet::provider::{
    EventKind, InjectedProvider, Listener, ListenerId, ListenerSet, ProviderEvent, RpcError,
};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::{
    collections::{HashMap, VecDeque},
    fmt,
    sync::Arc,
    time::Duration,
};

/// Computes the response to a request from its params.
pub type Handler = Arc<dyn Fn(&Value) -> Result<Value, RpcError> + Send + Sync>;

/// An in-memory [`InjectedProvider`].
///
/// Responses come from, in order: one-shot responses queued with [`MockProvider::push_response`],
/// then the method's handler. Unscripted methods fail with EIP-1193 code 4200. Every request is
/// recorded before it is answered.
#[derive(Default)]
pub struct MockProvider {
    handlers: Mutex<HashMap<String, Handler>>,
    queued: Mutex<HashMap<String, VecDeque<Result<Value, RpcError>>>>,
    delays: Mutex<HashMap<String, Duration>>,
    requests: Mutex<Vec<(String, Value)>>,
    listeners: ListenerSet,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider with one authorized account holding `balance` wei on `chain_id`.
    pub fn with_account(account: Address, balance: U256, chain_id: u64) -> Self {
        let provider = Self::new();
        provider.respond("eth_requestAccounts", [account]);
        provider.respond("eth_accounts", [account]);
        provider.respond("eth_getBalance", balance);
        provider.respond("eth_chainId", U64::from(chain_id));
        provider.respond("eth_blockNumber", U64::ZERO);
        provider.respond("eth_gasPrice", U256::from(20_000_000_000u64));
        provider.respond("eth_estimateGas", U64::from(21_000));
        provider
    }

    pub fn on_method(
        &self,
        method: &str,
        handler: impl Fn(&Value) -> Result<Value, RpcError> + Send + Sync + 'static,
    ) -> &Self {
        self.handlers.lock().insert(method.to_string(), Arc::new(handler));
        self
    }

    /// Always answers `method` with `response`.
    pub fn respond(&self, method: &str, response: impl Serialize) -> &Self {
        let response = serde_json::to_value(response).unwrap_or(Value::Null);
        self.on_method(method, move |_| Ok(response.clone()))
    }

    /// Always fails `method` with `err`.
    pub fn fail(&self, method: &str, err: RpcError) -> &Self {
        self.on_method(method, move |_| Err(err.clone()))
    }

    /// Queues a response used by the next `method` request only.
    pub fn push_response(&self, method: &str, response: Result<Value, RpcError>) -> &Self {
        self.queued.lock().entry(method.to_string()).or_default().push_back(response);
        self
    }

    /// Delays every `method` response by `delay`.
    pub fn delay(&self, method: &str, delay: Duration) -> &Self {
        self.delays.lock().insert(method.to_string(), delay);
        self
    }

    /// All requests received so far, oldest first.
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().clone()
    }

    /// The params of every `method` request received so far.
    pub fn requests_for(&self, method: &str) -> Vec<Value> {
        self.requests
            .lock()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }

    /// Emits a provider event to the registered listeners, returning how many were called.
    pub fn emit(&self, event: ProviderEvent) -> usize {
        self.listeners.emit(&event)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[async_trait]
impl InjectedProvider for MockProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        trace!(target: "mock_provider", method, %params, "request");
        self.requests.lock().push((method.to_string(), params.clone()));

        let delay = self.delays.lock().get(method).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self.queued.lock().get_mut(method).and_then(VecDeque::pop_front);
        if let Some(response) = queued {
            return response;
        }
        let handler = self.handlers.lock().get(method).cloned();
        match handler {
            Some(handler) => handler(&params),
            None => Err(RpcError::unsupported_method(method)),
        }
    }

    fn on(&self, kind: EventKind, listener: Listener) -> ListenerId {
        self.listeners.add(kind, listener)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

impl fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockProvider")
            .field("requests", &self.request_count())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

