use super::{
    EventKind, InjectedProvider, ProviderEvent, RpcError, Subscription,
    types::{
        GasPriceRecommendation, RpcBlock, RpcReceipt, RpcTransaction, TransactionDetails,
        TxParams, TxStatus,
    },
};
use crate::{
    error::ProviderError,
    network::{KnownNetwork, NetworkDescriptor, known_network},
    units::{self, Balance},
};
use alloy_primitives::{Address, TxHash, U64, U256};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::{fmt, sync::Arc};

/// Typed operations over an [`InjectedProvider`].
///
/// Cheap to clone; clones share the underlying provider.
pub struct WalletProvider<P> {
    provider: Arc<P>,
}

impl<P> Clone for WalletProvider<P> {
    fn clone(&self) -> Self {
        Self { provider: self.provider.clone() }
    }
}

impl<P: fmt::Debug> fmt::Debug for WalletProvider<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletProvider").field("provider", &self.provider).finish()
    }
}

impl<P: InjectedProvider + 'static> WalletProvider<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Wraps the injected provider if one is installed.
    pub fn detect(provider: Option<Arc<P>>) -> Result<Self, ProviderError> {
        provider.map(Self::new).ok_or(ProviderError::NoProviderInstalled)
    }

    pub fn inner(&self) -> &Arc<P> {
        &self.provider
    }

    /// Requests account access and returns the first authorized account.
    pub async fn connect(&self) -> Result<Address, ProviderError> {
        let accounts = match self.request("eth_requestAccounts", json!([])).await {
            Ok(value) => decode::<Vec<Address>>("eth_requestAccounts", value)?,
            Err(err) if err.is_user_rejected() => return Err(ProviderError::AccessRejected(err)),
            Err(err) => return Err(ProviderError::ConnectFailed(err)),
        };
        accounts.first().copied().ok_or(ProviderError::NoAccountsAuthorized)
    }

    pub async fn balance(&self, address: Address) -> Result<Balance, ProviderError> {
        self.query::<U256>("eth_getBalance", json!([address, "latest"]), "balance")
            .await
            .map(Balance::from_wei)
    }

    pub async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.query::<U64>("eth_chainId", json!([]), "network info").await.map(|id| id.to::<u64>())
    }

    /// The active network, named through the known-network table.
    pub async fn network(&self) -> Result<NetworkDescriptor, ProviderError> {
        self.chain_id().await.map(NetworkDescriptor::from_chain_id)
    }

    pub async fn estimate_gas(&self, tx: &TxParams) -> Result<u64, ProviderError> {
        match self.request("eth_estimateGas", json!([tx])).await {
            Ok(value) => decode::<U64>("eth_estimateGas", value).map(|gas| gas.to::<u64>()),
            Err(err) if err.is_insufficient_funds() => Err(ProviderError::InsufficientFunds(err)),
            Err(err) => Err(ProviderError::EstimateFailed(err)),
        }
    }

    /// Hands the transaction to the provider for signing and broadcasting.
    ///
    /// Returns as soon as the provider yields the hash; inclusion is not awaited.
    pub async fn send(&self, tx: &TxParams) -> Result<TxHash, ProviderError> {
        match self.request("eth_sendTransaction", json!([tx])).await {
            Ok(value) => decode("eth_sendTransaction", value),
            Err(err) if err.is_user_rejected() => Err(ProviderError::TransactionRejected(err)),
            Err(err) if err.is_insufficient_funds() => Err(ProviderError::InsufficientFunds(err)),
            Err(err) => Err(ProviderError::TransactionFailed(err)),
        }
    }

    pub async fn block_number(&self) -> Result<u64, ProviderError> {
        self.query::<U64>("eth_blockNumber", json!([]), "block number")
            .await
            .map(|number| number.to::<u64>())
    }

    /// Fetches a block with full transaction bodies. `None` if the block is unknown.
    pub async fn block_with_transactions(
        &self,
        number: u64,
    ) -> Result<Option<RpcBlock>, ProviderError> {
        self.query("eth_getBlockByNumber", json!([U64::from(number), true]), "block").await
    }

    pub async fn gas_price(&self) -> Result<U256, ProviderError> {
        self.query("eth_gasPrice", json!([]), "gas price").await
    }

    /// Slow/standard/fast gas prices derived from `eth_gasPrice`, or fixed defaults if the
    /// provider cannot answer.
    pub async fn gas_price_recommendation(&self) -> GasPriceRecommendation {
        match self.gas_price().await {
            Ok(price) => GasPriceRecommendation::from_gas_price(price),
            Err(err) => {
                warn!(target: "wallet::provider", %err, "falling back to default gas prices");
                GasPriceRecommendation::default()
            }
        }
    }

    /// Looks up a transaction and its receipt. `None` if the provider doesn't know the hash.
    pub async fn transaction(
        &self,
        hash: TxHash,
    ) -> Result<Option<TransactionDetails>, ProviderError> {
        let Some(transaction) = self
            .query::<Option<RpcTransaction>>(
                "eth_getTransactionByHash",
                json!([hash]),
                "transaction",
            )
            .await?
        else {
            return Ok(None);
        };
        let receipt = self
            .query::<Option<RpcReceipt>>("eth_getTransactionReceipt", json!([hash]), "transaction")
            .await?;

        Ok(Some(TransactionDetails {
            status: TxStatus::from_receipt(receipt.as_ref()),
            gas_used: receipt.as_ref().map(|r| r.gas_used.to::<u64>()),
            block_number: receipt
                .as_ref()
                .and_then(|r| r.block_number)
                .or(transaction.block_number)
                .map(|n| n.to::<u64>()),
            transaction,
        }))
    }

    /// Asks the provider to switch to a known chain, adding it first if the provider has never
    /// seen it.
    pub async fn switch_network(&self, chain_id: u64) -> Result<(), ProviderError> {
        let network = known_network(chain_id).ok_or(ProviderError::UnsupportedNetwork(chain_id))?;
        match self.request("wallet_switchEthereumChain", network.switch_params()).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_unrecognized_chain() => {
                debug!(target: "wallet::provider", chain_id, "chain unknown, adding it");
                self.add(network).await
            }
            Err(err) => Err(ProviderError::SwitchFailed(err)),
        }
    }

    pub async fn add_network(&self, chain_id: u64) -> Result<(), ProviderError> {
        let network = known_network(chain_id).ok_or(ProviderError::UnsupportedNetwork(chain_id))?;
        self.add(network).await
    }

    async fn add(&self, network: &KnownNetwork) -> Result<(), ProviderError> {
        self.request("wallet_addEthereumChain", network.add_params())
            .await
            .map(drop)
            .map_err(ProviderError::SwitchFailed)
    }

    /// Calls `f` with the new account list whenever the provider reports one.
    pub fn on_account_changed<F>(&self, f: F) -> Subscription
    where
        F: Fn(Vec<Address>) + Send + Sync + 'static,
    {
        self.subscribe(EventKind::AccountsChanged, move |event| {
            if let ProviderEvent::AccountsChanged(accounts) = event {
                f(accounts.clone());
            }
        })
    }

    /// Calls `f` with the new chain id whenever the provider switches chains.
    ///
    /// Everything derived from the previous chain is stale at that point.
    pub fn on_network_changed<F>(&self, f: F) -> Subscription
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        self.subscribe(EventKind::ChainChanged, move |event| {
            if let ProviderEvent::ChainChanged(chain_id) = event {
                f(*chain_id);
            }
        })
    }

    fn subscribe(
        &self,
        kind: EventKind,
        listener: impl Fn(&ProviderEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.provider.on(kind, Arc::new(listener));
        let provider = self.provider.clone();
        Subscription::new(move || provider.remove_listener(id))
    }

    /// See [`units::is_valid_address`].
    pub fn is_valid_address(address: &str) -> bool {
        units::is_valid_address(address)
    }

    async fn request(&self, method: &'static str, params: Value) -> Result<Value, RpcError> {
        trace!(target: "wallet::provider", method, %params, "request");
        let res = self.provider.request(method, params).await;
        if let Err(err) = &res {
            debug!(target: "wallet::provider", method, code = err.code, %err, "request failed");
        }
        res
    }

    async fn query<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
        what: &'static str,
    ) -> Result<T, ProviderError> {
        let value = self
            .request(method, params)
            .await
            .map_err(|source| ProviderError::QueryFailed { what, source })?;
        decode(method, value)
    }
}

fn decode<T: DeserializeOwned>(method: &'static str, value: Value) -> Result<T, ProviderError> {
    serde_json::from_value(value)
        .map_err(|source| ProviderError::InvalidResponse { method, source })
}
