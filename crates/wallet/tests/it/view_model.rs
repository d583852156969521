use crate::{ACCOUNT, OTHER, ether};
use alloy_primitives::{Address, B256, U64};
use defiguard_test_utils::{MockChain, MockProvider, init_tracing, tx_json};
use defiguard_wallet::{
    BlockRef, Command, Direction, Mode, ProviderEvent, RpcError, SendForm, WalletConfig,
    WalletError, WalletState, WalletViewModel,
};
use serde_json::{Value, json};
use std::{sync::Arc, time::Duration};
use tokio::sync::{mpsc, watch};

fn view_model(provider: &Arc<MockProvider>) -> WalletViewModel<MockProvider> {
    WalletViewModel::new(Some(provider.clone()), WalletConfig::default())
}

async fn connected(provider: &Arc<MockProvider>) -> WalletViewModel<MockProvider> {
    let mut vm = view_model(provider);
    vm.connect();
    vm.settle().await;
    assert_eq!(vm.state().mode, Mode::Connected);
    vm
}

fn form(recipient: &str, amount: &str) -> SendForm {
    SendForm::transfer(recipient, amount)
}

#[tokio::test(start_paused = true)]
async fn connect_loads_session() {
    init_tracing();
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    let chain = MockChain::new(12);
    chain.add_tx(11, tx_json(B256::repeat_byte(1), OTHER, Some(ACCOUNT), ether(1), 11));
    chain.install(&provider);

    let mut vm = view_model(&provider);
    vm.connect();
    assert_eq!(vm.state().mode, Mode::Connecting);
    vm.settle().await;

    let state = vm.state();
    assert_eq!(state.mode, Mode::Connected);
    assert_eq!(state.account, Some(ACCOUNT));
    assert_eq!(state.balance.to_string(), "3.0000");
    assert_eq!(state.network.as_ref().unwrap().name, "Ethereum Mainnet");
    assert_eq!(state.success.as_deref(), Some("Wallet connected successfully!"));
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.history.records()[0].direction, Direction::Received);
    assert_eq!(provider.listener_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn connect_without_provider() {
    let mut vm = WalletViewModel::<MockProvider>::new(None, WalletConfig::default());
    vm.connect();
    vm.settle().await;

    assert_eq!(vm.state().mode, Mode::Disconnected);
    assert_eq!(
        vm.state().error.as_deref(),
        Some("MetaMask is not installed. Please install MetaMask to use this wallet.")
    );
}

#[tokio::test(start_paused = true)]
async fn connect_failures_are_shown() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    provider.respond("eth_requestAccounts", Vec::<Address>::new());

    let mut vm = view_model(&provider);
    vm.connect();
    vm.settle().await;
    assert_eq!(vm.state().mode, Mode::Disconnected);
    assert_eq!(vm.state().account, None);
    assert_eq!(vm.state().error.as_deref(), Some("No accounts found"));
}

#[tokio::test(start_paused = true)]
async fn rejects_zero_amount_without_provider_calls() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    let mut vm = connected(&provider).await;
    provider.clear_requests();

    vm.set_form(form(&OTHER.to_string(), "0"));
    let err = vm.submit().unwrap_err();
    assert!(matches!(err, WalletError::Validation(_)));
    vm.settle().await;

    assert_eq!(vm.state().error.as_deref(), Some("Please enter a valid amount greater than 0"));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn rejects_amount_above_balance() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    let mut vm = connected(&provider).await;
    assert_eq!(vm.state().balance.to_string(), "3.0000");
    provider.clear_requests();

    vm.set_form(form(&OTHER.to_string(), "5"));
    assert!(vm.submit().is_err());
    vm.settle().await;

    assert_eq!(vm.state().error.as_deref(), Some("Insufficient balance for this transaction"));
    assert_eq!(provider.request_count(), 0);
    assert!(!vm.state().sending);
}

#[tokio::test(start_paused = true)]
async fn rejects_malformed_recipients() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    let mut vm = connected(&provider).await;
    provider.clear_requests();

    for recipient in ["0x1234", "hello world", "0x70997970c51812dc3A010C7d01b50e0d17dc79C8"] {
        vm.set_form(form(recipient, "1"));
        assert!(vm.submit().is_err(), "{recipient}");
        assert_eq!(vm.state().error.as_deref(), Some("Invalid recipient address format"));
    }
    vm.set_form(form("", "1"));
    assert!(vm.submit().is_err());
    assert_eq!(vm.state().error.as_deref(), Some("Please enter a recipient address"));

    vm.settle().await;
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn submit_requires_session() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    let mut vm = view_model(&provider);
    vm.set_form(form(&OTHER.to_string(), "1"));
    assert!(vm.submit().is_err());
    assert_eq!(vm.state().error.as_deref(), Some("Please connect your wallet first"));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn successful_send_is_pending_until_scanned() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    let chain = MockChain::new(0);
    chain.install(&provider);
    let hash = B256::repeat_byte(0xaa);
    provider.respond("eth_sendTransaction", hash);

    let mut vm = connected(&provider).await;
    vm.set_form(SendForm { gas_price: "25".to_string(), ..form(&OTHER.to_string(), "1.0") });
    vm.submit().unwrap();
    assert!(vm.state().sending);
    vm.settle().await;

    let state = vm.state();
    assert!(!state.sending);
    assert_eq!(state.success, Some(format!("Transaction sent successfully! Hash: {hash}")));
    similar_asserts::assert_eq!(state.form, SendForm::new(20));
    let head = &state.history.records()[0];
    assert_eq!(head.hash, hash);
    assert_eq!(head.direction, Direction::Sent);
    assert_eq!(head.value_display(), "1.0000");
    assert_eq!(head.block, BlockRef::Pending);

    let sent = provider.requests_for("eth_sendTransaction");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0][0]["gas"], "0x5208");
    assert_eq!(sent[0][0]["gasPrice"], json!(format!("{:#x}", 25_000_000_000u64)));
    // estimate went out before the send, with the same transfer
    assert_eq!(provider.requests_for("eth_estimateGas")[0][0]["value"], sent[0][0]["value"]);

    // the scanner picks the transaction up in the next block
    chain.add_tx(1, tx_json(hash, ACCOUNT, Some(OTHER), ether(1), 1));
    vm.refresh_history();
    vm.settle().await;

    let records = vm.state().history.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].hash, hash);
    assert_eq!(records[0].block, BlockRef::Confirmed(1));
}

#[tokio::test(start_paused = true)]
async fn balance_is_refreshed_after_send() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    provider.respond("eth_sendTransaction", B256::repeat_byte(1));
    let mut vm = connected(&provider).await;
    let queries = provider.requests_for("eth_getBalance").len();

    provider.respond("eth_getBalance", ether(2));
    vm.set_form(form(&OTHER.to_string(), "1"));
    vm.submit().unwrap();

    let start = tokio::time::Instant::now();
    vm.settle().await;
    assert!(start.elapsed() >= Duration::from_secs(1));
    assert_eq!(provider.requests_for("eth_getBalance").len(), queries + 1);
    assert_eq!(vm.state().balance.to_string(), "2.0000");
}

#[tokio::test(start_paused = true)]
async fn send_failures_are_shown() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    provider.fail("eth_sendTransaction", RpcError::user_rejected());
    let mut vm = connected(&provider).await;

    vm.set_form(form(&OTHER.to_string(), "1"));
    vm.submit().unwrap();
    vm.settle().await;

    assert!(!vm.state().sending);
    assert_eq!(vm.state().error.as_deref(), Some("Transaction failed: User rejected the request."));
    assert!(vm.state().history.is_empty());
    // the form is kept so the user can retry
    assert_eq!(vm.state().form.amount, "1");
}

#[tokio::test(start_paused = true)]
async fn history_never_exceeds_limit() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(100), 1));
    let chain = MockChain::new(30);
    for block in 1..=30u8 {
        let tx = tx_json(B256::repeat_byte(block), OTHER, Some(ACCOUNT), ether(1), block.into());
        chain.add_tx(block.into(), tx);
    }
    chain.install(&provider);
    let mut vm = connected(&provider).await;
    assert_eq!(vm.state().history.len(), 10);

    for i in 0..12u8 {
        provider.respond("eth_sendTransaction", B256::repeat_byte(0x80 + i));
        vm.set_form(form(&OTHER.to_string(), "0.1"));
        vm.submit().unwrap();
        vm.settle().await;
        assert!(vm.state().history.len() <= 10);
    }
    vm.refresh_history();
    vm.settle().await;

    let records = vm.state().history.records();
    assert_eq!(records.len(), 10);
    // pending submissions stay ahead of scanned records
    assert!(records.iter().all(|r| r.is_pending()));
    assert_eq!(records[0].hash, B256::repeat_byte(0x80 + 11));
    let mut hashes: Vec<_> = records.iter().map(|r| r.hash).collect();
    hashes.dedup();
    assert_eq!(hashes.len(), 10);
}

#[tokio::test(start_paused = true)]
async fn disconnect_clears_session() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    provider.respond("eth_sendTransaction", B256::repeat_byte(1));
    let mut vm = connected(&provider).await;
    vm.set_form(form(&OTHER.to_string(), "1"));
    vm.submit().unwrap();
    vm.settle().await;
    assert!(!vm.state().history.is_empty());

    vm.disconnect();
    let state = vm.state();
    assert_eq!(state.mode, Mode::Disconnected);
    assert_eq!(state.account, None);
    assert_eq!(state.balance.to_string(), "0.0000");
    assert_eq!(state.network, None);
    assert!(state.history.is_empty());
    assert_eq!(state.error, None);
    assert_eq!(state.success.as_deref(), Some("Wallet disconnected"));
    assert_eq!(provider.listener_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn stale_results_are_discarded_after_disconnect() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    provider.delay("eth_getBalance", Duration::from_secs(5));

    let mut vm = view_model(&provider);
    vm.connect();
    let epoch = vm.epoch();
    vm.disconnect();
    assert!(vm.epoch() > epoch);
    vm.settle().await;

    // the connect call completed but belonged to the old epoch
    assert_eq!(provider.requests_for("eth_getBalance").len(), 1);
    assert_eq!(vm.state().mode, Mode::Disconnected);
    assert_eq!(vm.state().account, None);
    assert_eq!(vm.state().success.as_deref(), Some("Wallet disconnected"));
}

#[tokio::test(start_paused = true)]
async fn stale_results_are_discarded_after_account_switch() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    let mut vm = connected(&provider).await;

    provider.delay("eth_getBalance", Duration::from_secs(5));
    provider.on_method("eth_getBalance", |params| {
        let account: Address = serde_json::from_value(params[0].clone()).unwrap_or_default();
        Ok(serde_json::to_value(if account == ACCOUNT { ether(7) } else { ether(1) }).unwrap())
    });
    vm.refresh_balance();
    provider.emit(ProviderEvent::AccountsChanged(vec![OTHER]));
    vm.settle().await;

    let state = vm.state();
    assert_eq!(state.account, Some(OTHER));
    assert_eq!(state.balance.to_string(), "1.0000");
    assert_eq!(provider.requests_for("eth_getBalance").len(), 3);
}

/// Submits a slow send, applies `event` while it is in flight, then checks a new send goes out.
async fn send_survives_event(event: ProviderEvent) {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    MockChain::new(0).install(&provider);
    provider.respond("eth_sendTransaction", B256::repeat_byte(0xbb));
    let mut vm = connected(&provider).await;

    provider.delay("eth_sendTransaction", Duration::from_secs(5));
    vm.set_form(form(&OTHER.to_string(), "1"));
    vm.submit().unwrap();
    assert!(vm.state().sending);
    provider.emit(event);
    vm.settle().await;

    let state = vm.state();
    assert!(!state.sending);
    assert_eq!(state.mode, Mode::Connected);
    assert!(state.success.is_none(), "{:?}", state.success);
    assert!(state.history.is_empty());
    assert_eq!(provider.requests_for("eth_sendTransaction").len(), 1);

    vm.set_form(form(&OTHER.to_string(), "1"));
    vm.submit().unwrap();
    assert!(vm.state().sending);
    vm.settle().await;
    assert!(!vm.state().sending);
    assert_eq!(provider.requests_for("eth_sendTransaction").len(), 2);
    assert_eq!(vm.state().history.records()[0].hash, B256::repeat_byte(0xbb));
}

#[tokio::test(start_paused = true)]
async fn account_switch_releases_in_flight_send() {
    send_survives_event(ProviderEvent::AccountsChanged(vec![OTHER])).await;
}

#[tokio::test(start_paused = true)]
async fn chain_change_releases_in_flight_send() {
    send_survives_event(ProviderEvent::ChainChanged(1)).await;
}

#[tokio::test(start_paused = true)]
async fn empty_accounts_disconnect() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    let mut vm = connected(&provider).await;

    provider.emit(ProviderEvent::AccountsChanged(vec![]));
    vm.settle().await;
    assert_eq!(vm.state().mode, Mode::Disconnected);
    assert_eq!(vm.state().success.as_deref(), Some("Wallet disconnected"));
}

#[tokio::test(start_paused = true)]
async fn chain_change_reloads_session() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    let mut vm = connected(&provider).await;
    let epoch = vm.epoch();

    provider.respond("eth_chainId", U64::from(11155111));
    provider.respond("eth_getBalance", ether(5));
    provider.emit(ProviderEvent::ChainChanged(11155111));
    vm.settle().await;

    let state = vm.state();
    assert!(vm.epoch() > epoch);
    assert_eq!(state.mode, Mode::Connected);
    assert_eq!(state.network.as_ref().unwrap().name, "Sepolia Testnet");
    assert_eq!(state.balance.to_string(), "5.0000");
    // still listening after the reload
    assert_eq!(provider.listener_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn switch_network_command() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    provider.respond("wallet_switchEthereumChain", Value::Null);
    let mut vm = connected(&provider).await;

    vm.dispatch(Command::SwitchNetwork(5));
    vm.settle().await;
    assert_eq!(
        provider.requests_for("wallet_switchEthereumChain"),
        vec![json!([{ "chainId": "0x5" }])]
    );
    assert_eq!(vm.state().error, None);

    vm.dispatch(Command::SwitchNetwork(12345));
    vm.settle().await;
    assert_eq!(vm.state().error.as_deref(), Some("Unsupported network: 12345"));
}

#[tokio::test(start_paused = true)]
async fn run_polls_balance_while_connected() {
    let provider = Arc::new(MockProvider::with_account(ACCOUNT, ether(3), 1));
    let vm = view_model(&provider);
    let (commands, rx) = mpsc::channel(8);
    let (snapshots, mut states) = watch::channel(WalletState::default());
    let handle = tokio::spawn(vm.run(rx, snapshots));

    commands.send(Command::Connect).await.unwrap();
    states.wait_for(|state| state.mode == Mode::Connected).await.unwrap();
    let initial = provider.requests_for("eth_getBalance").len();

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(provider.requests_for("eth_getBalance").len(), initial + 2);

    commands.send(Command::Disconnect).await.unwrap();
    states.wait_for(|state| state.mode == Mode::Disconnected).await.unwrap();
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(provider.requests_for("eth_getBalance").len(), initial + 2);

    drop(commands);
    handle.await.unwrap();
}
