use super::TxRecord;
use alloy_primitives::TxHash;
use std::collections::HashSet;

/// The displayed transaction list: unique by hash, most recent first, capped at `limit`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxHistory {
    entries: Vec<TxRecord>,
    limit: usize,
}

impl TxHistory {
    pub fn new(limit: usize) -> Self {
        Self { entries: Vec::new(), limit }
    }

    pub fn records(&self) -> &[TxRecord] {
        &self.entries
    }

    pub fn get(&self, hash: &TxHash) -> Option<&TxRecord> {
        self.entries.iter().find(|record| record.hash == *hash)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Puts a just-submitted record at the head, replacing any record with the same hash.
    pub fn record_submitted(&mut self, record: TxRecord) {
        self.entries.retain(|existing| existing.hash != record.hash);
        self.entries.insert(0, record);
        self.entries.truncate(self.limit);
    }

    /// Reconciles with the result of a history scan.
    ///
    /// Pending records the scan doesn't know about stay at the head in their current order. The
    /// scanned records follow; a scanned record supersedes a pending one with the same hash.
    pub fn merge_scanned(&mut self, scanned: Vec<TxRecord>) {
        let scanned_hashes: HashSet<TxHash> = scanned.iter().map(|record| record.hash).collect();
        let pending: Vec<TxRecord> = self
            .entries
            .drain(..)
            .filter(|record| record.is_pending() && !scanned_hashes.contains(&record.hash))
            .collect();

        let mut seen = HashSet::new();
        self.entries = pending
            .into_iter()
            .chain(scanned)
            .filter(|record| seen.insert(record.hash))
            .take(self.limit)
            .collect();
    }

    /// Replaces the whole list, keeping the first occurrence of each hash.
    pub fn replace_with(&mut self, records: impl IntoIterator<Item = TxRecord>) {
        let mut seen = HashSet::new();
        self.entries = records
            .into_iter()
            .filter(|record| seen.insert(record.hash))
            .take(self.limit)
            .collect();
    }
}

impl Default for TxHistory {
    fn default() -> Self {
        Self::new(10)
    }
}
