//! Fixtures for the simulated demo wallet.

use crate::history::{BlockRef, Direction, TxRecord};
use alloy_primitives::{Address, TxHash, U256, address, b256};
use chrono::{Duration, Utc};

pub const ACCOUNT: Address = address!("0x742d35Cc6635Bc0532E3D7b2b9C24B2c5f07c9E7");

pub const NETWORK_NAME: &str = "Demo Network";

/// 10.5 ether.
pub const STARTING_BALANCE: U256 = U256::from_limbs([10_500_000_000_000_000_000, 0, 0, 0]);

/// Flat fee charged by a simulated send: 0.001 ether.
pub const FEE: U256 = U256::from_limbs([1_000_000_000_000_000, 0, 0, 0]);

/// Block number stamped on records created by simulated sends.
pub const SEND_BLOCK: u64 = 18_567_891;

pub const ACTIVATED_MESSAGE: &str = "Demo mode activated! This is a simulated wallet interface.";

/// The two records shown when demo mode is entered, newest first.
pub fn starter_history() -> Vec<TxRecord> {
    let now = Utc::now();
    vec![
        TxRecord {
            hash: b256!("0xa1b2c3d4e5f6789012345678901234567890abcdef1234567890abcdef123456"),
            from: ACCOUNT.to_string(),
            to: Some("0x123456789abcdef123456789abcdef123456789ab".to_string()),
            value: U256::from(100_000_000_000_000_000u64),
            block: BlockRef::Confirmed(18_567_890),
            timestamp: now,
            direction: Direction::Sent,
        },
        TxRecord {
            hash: b256!("0xdef123456789abcdef123456789abcdef123456789abcdef123456789abcdef1"),
            from: "0x987654321fedcba987654321fedcba9876543210".to_string(),
            to: Some(ACCOUNT.to_string()),
            value: U256::from(500_000_000_000_000_000u64),
            block: BlockRef::Confirmed(18_567_845),
            timestamp: now - Duration::minutes(5),
            direction: Direction::Received,
        },
    ]
}

/// A record for a simulated send. The hash is random.
pub fn sent_record(to: &str, value: U256) -> TxRecord {
    TxRecord {
        hash: TxHash::random(),
        from: ACCOUNT.to_string(),
        to: Some(to.to_string()),
        value,
        block: BlockRef::Confirmed(SEND_BLOCK),
        timestamp: Utc::now(),
        direction: Direction::Sent,
    }
}
