use super::{BlockRef, Direction, HistorySource, TxRecord};
use crate::{
    error::ProviderError,
    provider::{InjectedProvider, RpcTransaction, WalletProvider},
};
use alloy_primitives::Address;
use async_trait::async_trait;
use chrono::Utc;

/// Approximates an account's history by walking recent blocks backwards.
///
/// This costs one full-block request per visited block, so the window is kept small. It can be
/// swapped for an indexed [`HistorySource`] without touching its callers.
#[derive(Debug)]
pub struct BlockScanner<P> {
    provider: WalletProvider<P>,
    max_blocks: u64,
    max_matches: usize,
}

impl<P: InjectedProvider + 'static> BlockScanner<P> {
    pub const DEFAULT_MAX_BLOCKS: u64 = 1000;
    pub const DEFAULT_MAX_MATCHES: usize = 10;

    pub fn new(provider: WalletProvider<P>) -> Self {
        Self {
            provider,
            max_blocks: Self::DEFAULT_MAX_BLOCKS,
            max_matches: Self::DEFAULT_MAX_MATCHES,
        }
    }

    pub fn with_max_blocks(mut self, max_blocks: u64) -> Self {
        self.max_blocks = max_blocks;
        self
    }

    pub fn with_max_matches(mut self, max_matches: usize) -> Self {
        self.max_matches = max_matches;
        self
    }

    /// Scans `min(max_blocks, latest)` blocks down from the latest one, newest first.
    ///
    /// All matches of a block are collected before the match limit is checked, then the result is
    /// truncated to the limit.
    pub async fn scan(&self, account: Address) -> Result<Vec<TxRecord>, ProviderError> {
        let latest = self.provider.block_number().await?;
        let window = self.max_blocks.min(latest);
        debug!(target: "wallet::history", %account, latest, window, "scanning blocks");

        let mut records = Vec::new();
        for offset in 0..window {
            if records.len() >= self.max_matches {
                break;
            }
            let number = latest - offset;
            let Some(block) = self.provider.block_with_transactions(number).await? else {
                continue;
            };
            records.extend(
                block.transactions.iter().filter_map(|tx| to_record(tx, account, number)),
            );
        }

        records.truncate(self.max_matches);
        trace!(target: "wallet::history", %account, found = records.len(), "scan finished");
        Ok(records)
    }
}

#[async_trait]
impl<P: InjectedProvider + 'static> HistorySource for BlockScanner<P> {
    async fn recent_transactions(&self, account: Address) -> Vec<TxRecord> {
        match self.scan(account).await {
            Ok(records) => records,
            Err(err) => {
                warn!(target: "wallet::history", %account, %err, "history scan failed");
                Vec::new()
            }
        }
    }
}

fn to_record(tx: &RpcTransaction, account: Address, block: u64) -> Option<TxRecord> {
    let direction = if tx.from == account {
        Direction::Sent
    } else if tx.to == Some(account) {
        Direction::Received
    } else {
        return None;
    };

    Some(TxRecord {
        hash: tx.hash,
        from: tx.from.to_string(),
        to: tx.to.map(|to| to.to_string()),
        value: tx.value,
        block: BlockRef::Confirmed(tx.block_number.map_or(block, |n| n.to::<u64>())),
        timestamp: Utc::now(),
        direction,
    })
}
