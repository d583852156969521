//! Transaction history: the record type, the ordered set displayed to the user, and the sources
//! that discover records.

use crate::units::{Balance, format_address};
use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

mod scanner;
pub use scanner::BlockScanner;

mod set;
pub use set::TxHistory;

/// Where a record sits on chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockRef {
    Confirmed(u64),
    /// Submitted locally, not yet seen in a block.
    Pending,
}

impl BlockRef {
    pub const fn number(&self) -> Option<u64> {
        match self {
            Self::Confirmed(number) => Some(*number),
            Self::Pending => None,
        }
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed(number) => write!(f, "{number}"),
            Self::Pending => f.write_str("Pending"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sent => "sent",
            Self::Received => "received",
        })
    }
}

/// A single entry in the transaction history.
///
/// Counterparties are kept as display strings: demo records carry recipients that are not valid
/// addresses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRecord {
    pub hash: TxHash,
    pub from: String,
    /// `None` for contract creations.
    pub to: Option<String>,
    /// Value in wei.
    pub value: U256,
    pub block: BlockRef,
    /// When the record was observed, not the block timestamp.
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
}

impl TxRecord {
    /// A record for a transaction this wallet just submitted.
    pub fn pending(hash: TxHash, from: Address, to: Address, value: U256) -> Self {
        Self {
            hash,
            from: from.to_string(),
            to: Some(to.to_string()),
            value,
            block: BlockRef::Pending,
            timestamp: Utc::now(),
            direction: Direction::Sent,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.block == BlockRef::Pending
    }

    /// The value in ether with four fractional digits.
    pub fn value_display(&self) -> String {
        Balance::from_wei(self.value).to_string()
    }

    /// The other side of the transfer: the recipient of sent records, the sender of received
    /// ones.
    pub fn counterparty(&self) -> &str {
        match self.direction {
            Direction::Sent => self.to.as_deref().unwrap_or("Contract Creation"),
            Direction::Received => &self.from,
        }
    }

    pub fn short_hash(&self) -> String {
        format_address(&self.hash.to_string(), 10, 8)
    }
}

/// Discovers recent transactions involving an account.
///
/// Implementations are best effort: failures are logged and yield an empty list.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn recent_transactions(&self, account: Address) -> Vec<TxRecord>;
}
