//! JSON-RPC payloads exchanged with the injected provider.

use alloy_primitives::{Address, TxHash, U64, U256};
use serde::{Deserialize, Serialize};

/// The subset of an `eth_getBlockByNumber(n, true)` response the history scanner reads.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    #[serde(default)]
    pub number: Option<U64>,
    #[serde(default)]
    pub transactions: Vec<RpcTransaction>,
}

/// A transaction body as returned inside full blocks and by `eth_getTransactionByHash`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    pub hash: TxHash,
    pub from: Address,
    /// `None` for contract creations.
    #[serde(default)]
    pub to: Option<Address>,
    pub value: U256,
    #[serde(default)]
    pub block_number: Option<U64>,
    #[serde(default)]
    pub gas: Option<U64>,
    #[serde(default)]
    pub gas_price: Option<U256>,
}

/// `eth_estimateGas` / `eth_sendTransaction` parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxParams {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<U64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
}

impl TxParams {
    /// A value transfer with gas left to the provider.
    pub fn transfer(from: Address, to: Address, value: U256) -> Self {
        Self { from, to, value, gas: None, gas_price: None }
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(U64::from(gas));
        self
    }

    pub fn with_gas_price(mut self, gas_price: U256) -> Self {
        self.gas_price = Some(gas_price);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: TxHash,
    #[serde(default)]
    pub block_number: Option<U64>,
    pub gas_used: U64,
    /// `0x1` on success, `0x0` on revert. Absent on pre-Byzantium receipts.
    #[serde(default)]
    pub status: Option<U64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Success,
    Failed,
}

impl TxStatus {
    pub fn from_receipt(receipt: Option<&RpcReceipt>) -> Self {
        match receipt {
            None => Self::Pending,
            Some(receipt) if receipt.status == Some(U64::from(1)) => Self::Success,
            Some(_) => Self::Failed,
        }
    }
}

/// A transaction together with its receipt-derived status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub transaction: RpcTransaction,
    pub status: TxStatus,
    pub gas_used: Option<u64>,
    pub block_number: Option<u64>,
}

/// Suggested gas prices in whole gwei.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasPriceRecommendation {
    pub slow: u64,
    pub standard: u64,
    pub fast: u64,
}

impl GasPriceRecommendation {
    /// Derives recommendations from the node's gas price: 80%, 100% and 120%, floored to gwei.
    pub fn from_gas_price(wei: U256) -> Self {
        let gwei = U256::from(1_000_000_000u64);
        let scaled =
            |percent: u64| u64::try_from(wei * U256::from(percent) / U256::from(100) / gwei);
        Self {
            slow: scaled(80).unwrap_or(u64::MAX),
            standard: scaled(100).unwrap_or(u64::MAX),
            fast: scaled(120).unwrap_or(u64::MAX),
        }
    }
}

impl Default for GasPriceRecommendation {
    fn default() -> Self {
        Self { slow: 10, standard: 20, fast: 30 }
    }
}
