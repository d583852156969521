use crate::MockProvider;
use alloy_primitives::{Address, B256, U64, U256};
use defiguard_wallet::provider::RpcError;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::{collections::BTreeMap, sync::Arc};

/// A transaction body as returned inside a full block.
pub fn tx_json(hash: B256, from: Address, to: Option<Address>, value: U256, block: u64) -> Value {
    json!({
        "hash": hash,
        "from": from,
        "to": to,
        "value": value,
        "blockNumber": U64::from(block),
        "gas": U64::from(21_000),
        "gasPrice": U256::from(20_000_000_000u64),
        "input": "0x",
    })
}

#[derive(Debug, Default)]
struct ChainState {
    latest: u64,
    blocks: BTreeMap<u64, Vec<Value>>,
}

/// A fake chain answering `eth_blockNumber` and `eth_getBlockByNumber` on a [`MockProvider`].
///
/// Blocks without transactions are served empty; blocks above the head are `null`.
#[derive(Clone, Debug, Default)]
pub struct MockChain {
    state: Arc<Mutex<ChainState>>,
}

impl MockChain {
    pub fn new(latest: u64) -> Self {
        let chain = Self::default();
        chain.set_latest(latest);
        chain
    }

    pub fn set_latest(&self, latest: u64) {
        self.state.lock().latest = latest;
    }

    pub fn latest(&self) -> u64 {
        self.state.lock().latest
    }

    /// Adds a transaction to `block`, moving the head up if needed.
    pub fn add_tx(&self, block: u64, tx: Value) {
        let mut state = self.state.lock();
        state.latest = state.latest.max(block);
        state.blocks.entry(block).or_default().push(tx);
    }

    /// Registers the chain's handlers on `provider`.
    pub fn install(&self, provider: &MockProvider) {
        let state = self.state.clone();
        provider.on_method("eth_blockNumber", move |_| Ok(json!(U64::from(state.lock().latest))));

        let state = self.state.clone();
        provider.on_method("eth_getBlockByNumber", move |params| {
            let number = params
                .get(0)
                .cloned()
                .and_then(|n| serde_json::from_value::<U64>(n).ok())
                .ok_or_else(|| RpcError::new(-32602, "invalid block number"))?
                .to::<u64>();

            let state = state.lock();
            if number > state.latest {
                return Ok(Value::Null);
            }
            let transactions = state.blocks.get(&number).cloned().unwrap_or_default();
            Ok(json!({ "number": U64::from(number), "transactions": transactions }))
        });
    }
}
