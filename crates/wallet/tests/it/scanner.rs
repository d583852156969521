use crate::{ACCOUNT, OTHER, ether};
use alloy_primitives::{B256, U64, address};
use defiguard_test_utils::{MockChain, MockProvider, tx_json};
use defiguard_wallet::{
    BlockRef, BlockScanner, Direction, HistorySource, RpcError, WalletProvider,
};
use serde_json::json;
use std::sync::Arc;

fn scanner(provider: &Arc<MockProvider>) -> BlockScanner<MockProvider> {
    BlockScanner::new(WalletProvider::new(provider.clone()))
}

#[tokio::test]
async fn finds_sent_and_received_newest_first() {
    let provider = Arc::new(MockProvider::new());
    let chain = MockChain::new(50);
    let stranger = address!("0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc");
    chain.add_tx(10, tx_json(B256::repeat_byte(1), OTHER, Some(ACCOUNT), ether(2), 10));
    chain.add_tx(20, tx_json(B256::repeat_byte(2), stranger, Some(OTHER), ether(1), 20));
    chain.add_tx(30, tx_json(B256::repeat_byte(3), ACCOUNT, Some(OTHER), ether(1), 30));
    chain.add_tx(40, tx_json(B256::repeat_byte(4), ACCOUNT, None, ether(0), 40));
    chain.install(&provider);

    let records = scanner(&provider).scan(ACCOUNT).await.unwrap();
    let blocks: Vec<_> = records.iter().map(|r| r.block).collect();
    assert_eq!(blocks, [BlockRef::Confirmed(40), BlockRef::Confirmed(30), BlockRef::Confirmed(10)]);

    assert_eq!(records[0].direction, Direction::Sent);
    assert_eq!(records[0].counterparty(), "Contract Creation");
    assert_eq!(records[1].direction, Direction::Sent);
    assert_eq!(records[1].value_display(), "1.0000");
    assert_eq!(records[2].direction, Direction::Received);
    assert_eq!(records[2].counterparty(), OTHER.to_string());
}

#[tokio::test]
async fn window_is_bounded_by_chain_height() {
    let provider = Arc::new(MockProvider::new());
    MockChain::new(5).install(&provider);

    assert!(scanner(&provider).scan(ACCOUNT).await.unwrap().is_empty());
    let visited: Vec<_> = provider
        .requests_for("eth_getBlockByNumber")
        .iter()
        .map(|params| serde_json::from_value::<U64>(params[0].clone()).unwrap().to::<u64>())
        .collect();
    // genesis is never visited
    assert_eq!(visited, [5, 4, 3, 2, 1]);
    assert!(provider.requests_for("eth_getBlockByNumber").iter().all(|p| p[1] == json!(true)));
}

#[tokio::test]
async fn window_is_bounded_by_max_blocks() {
    let provider = Arc::new(MockProvider::new());
    let chain = MockChain::new(5000);
    chain.add_tx(3000, tx_json(B256::repeat_byte(9), ACCOUNT, Some(OTHER), ether(1), 3000));
    chain.install(&provider);

    let records = scanner(&provider).with_max_blocks(1000).scan(ACCOUNT).await.unwrap();
    assert!(records.is_empty());
    assert_eq!(provider.requests_for("eth_getBlockByNumber").len(), 1000);
}

#[tokio::test]
async fn stops_after_enough_matches() {
    let provider = Arc::new(MockProvider::new());
    let chain = MockChain::new(100);
    // three matches in the head block, two more below
    for i in 0..3u8 {
        chain.add_tx(100, tx_json(B256::repeat_byte(i), ACCOUNT, Some(OTHER), ether(1), 100));
    }
    chain.add_tx(99, tx_json(B256::repeat_byte(10), OTHER, Some(ACCOUNT), ether(1), 99));
    chain.add_tx(98, tx_json(B256::repeat_byte(11), OTHER, Some(ACCOUNT), ether(1), 98));
    chain.install(&provider);

    let records = scanner(&provider).with_max_matches(2).scan(ACCOUNT).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(provider.requests_for("eth_getBlockByNumber").len(), 1);

    provider.clear_requests();
    let records = scanner(&provider).with_max_matches(4).scan(ACCOUNT).await.unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(provider.requests_for("eth_getBlockByNumber").len(), 2);
}

#[tokio::test]
async fn errors_yield_empty_history() {
    let provider = Arc::new(MockProvider::new());
    let chain = MockChain::new(10);
    chain.add_tx(10, tx_json(B256::repeat_byte(1), ACCOUNT, Some(OTHER), ether(1), 10));
    chain.install(&provider);
    provider.push_response("eth_getBlockByNumber", Ok(json!({ "transactions": [] })));
    provider.push_response("eth_getBlockByNumber", Err(RpcError::internal("timeout")));

    let scanner = scanner(&provider);
    assert!(scanner.recent_transactions(ACCOUNT).await.is_empty());

    provider.fail("eth_blockNumber", RpcError::internal("down"));
    assert!(scanner.scan(ACCOUNT).await.is_err());
    assert!(scanner.recent_transactions(ACCOUNT).await.is_empty());
}
