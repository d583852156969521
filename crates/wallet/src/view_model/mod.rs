//! The wallet view-model.
//!
//! All state lives in a [`WalletState`] owned by one [`WalletViewModel`]. Provider calls run as
//! spawned tasks; their results come back through [`WalletViewModel::settle`] or
//! [`WalletViewModel::run`] and are applied on the caller's task, one at a time.
//!
//! Every task is tagged with the epoch current when it was spawned. Connecting, disconnecting,
//! entering demo mode, switching accounts and reloading after a chain change all start a new
//! epoch, and results tagged with an older one are dropped.

use crate::{
    config::WalletConfig,
    demo,
    error::{ProviderError, ValidationError, WalletError},
    history::{BlockScanner, HistorySource, TxRecord},
    network::NetworkDescriptor,
    provider::{InjectedProvider, ProviderEvent, Subscription, TxParams, WalletProvider},
    units::Balance,
};
use alloy_primitives::{Address, U256};
use std::{future::Future, sync::Arc};
use tokio::{
    sync::{mpsc, watch},
    task::{JoinError, JoinSet},
    time::MissedTickBehavior,
};

mod state;
pub use state::{Mode, SendForm, WalletState};

pub mod validate;
use validate::{ValidSend, validate_demo_send, validate_send};

/// User intents, as sent to [`WalletViewModel::run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Connect,
    Disconnect,
    EnterDemo,
    UpdateForm(SendForm),
    Submit,
    RefreshBalance,
    RefreshHistory,
    SwitchNetwork(u64),
    DismissError,
    DismissSuccess,
}

/// Data loaded when a session starts or is reloaded.
#[derive(Debug)]
struct Session {
    account: Address,
    balance: Balance,
    network: NetworkDescriptor,
}

#[derive(Debug)]
enum Update {
    Session { result: Result<Session, ProviderError>, announce: bool },
    Balance(Result<Balance, ProviderError>),
    History(Vec<TxRecord>),
    Sent(Result<TxRecord, ProviderError>),
    DemoSent { to: String, value: U256 },
    Switched(Result<(), ProviderError>),
    Event(ProviderEvent),
}

#[derive(Debug)]
struct Tagged {
    epoch: u64,
    update: Update,
}

pub struct WalletViewModel<P> {
    provider: Option<WalletProvider<P>>,
    history_source: Option<Arc<dyn HistorySource>>,
    config: WalletConfig,
    state: WalletState,
    epoch: u64,
    tasks: JoinSet<Tagged>,
    events_tx: mpsc::UnboundedSender<Tagged>,
    events_rx: mpsc::UnboundedReceiver<Tagged>,
    subscriptions: Vec<Subscription>,
}

impl<P: InjectedProvider + 'static> WalletViewModel<P> {
    /// Creates a view-model for the injected provider, if there is one.
    ///
    /// History comes from a [`BlockScanner`] sized by `config` unless replaced with
    /// [`WalletViewModel::with_history_source`].
    pub fn new(provider: Option<Arc<P>>, config: WalletConfig) -> Self {
        let provider = WalletProvider::detect(provider).ok();
        let history_source = provider.clone().map(|provider| {
            Arc::new(
                BlockScanner::new(provider)
                    .with_max_blocks(config.max_blocks_to_scan)
                    .with_max_matches(config.history_limit),
            ) as Arc<dyn HistorySource>
        });
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            provider,
            history_source,
            state: WalletState::new(config.history_limit, config.gas_price_gwei),
            config,
            epoch: 0,
            tasks: JoinSet::new(),
            events_tx,
            events_rx,
            subscriptions: Vec::new(),
        }
    }

    pub fn with_history_source(mut self, source: Arc<dyn HistorySource>) -> Self {
        self.history_source = Some(source);
        self
    }

    pub fn state(&self) -> &WalletState {
        &self.state
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of spawned provider calls whose results haven't been applied yet.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub fn dispatch(&mut self, command: Command) {
        trace!(target: "wallet::view_model", ?command, "dispatch");
        match command {
            Command::Connect => self.connect(),
            Command::Disconnect => self.disconnect(),
            Command::EnterDemo => self.enter_demo(),
            Command::UpdateForm(form) => self.set_form(form),
            Command::Submit => {
                // the rejection is already recorded in the state
                let _ = self.submit();
            }
            Command::RefreshBalance => self.refresh_balance(),
            Command::RefreshHistory => self.refresh_history(),
            Command::SwitchNetwork(chain_id) => self.switch_network(chain_id),
            Command::DismissError => self.state.error = None,
            Command::DismissSuccess => self.state.success = None,
        }
    }

    /// Requests account access and loads balance, network and history.
    pub fn connect(&mut self) {
        let Some(provider) = self.provider.clone() else {
            self.state.error = Some(WalletError::ProviderUnavailable.to_string());
            return;
        };
        self.next_epoch();
        self.state.reset(self.config.gas_price_gwei);
        self.state.mode = Mode::Connecting;
        self.spawn(async move {
            Update::Session { result: load_session(provider).await, announce: true }
        });
    }

    /// Forgets the session. Results of calls still in flight are discarded when they arrive.
    pub fn disconnect(&mut self) {
        self.next_epoch();
        self.state.reset(self.config.gas_price_gwei);
        self.state.success = Some("Wallet disconnected".to_string());
        debug!(target: "wallet::view_model", epoch = self.epoch, "disconnected");
    }

    /// Switches to the simulated wallet. Nothing in demo mode reaches the provider.
    pub fn enter_demo(&mut self) {
        self.next_epoch();
        self.state.reset(self.config.gas_price_gwei);
        self.state.mode = Mode::Demo;
        self.state.account = Some(demo::ACCOUNT);
        self.state.balance = Balance::from_wei(demo::STARTING_BALANCE);
        self.state.network = Some(NetworkDescriptor::demo());
        self.state.history.replace_with(demo::starter_history());
        self.state.success = Some(demo::ACTIVATED_MESSAGE.to_string());
    }

    pub fn set_form(&mut self, form: SendForm) {
        self.state.form = form;
    }

    /// Validates the send form and, if it passes, hands the transfer to the provider (or the
    /// demo simulation).
    ///
    /// Validation failures are returned and recorded as the state's error; provider failures
    /// only show up in the state once the spawned call completes.
    pub fn submit(&mut self) -> Result<(), WalletError> {
        if self.state.sending {
            debug!(target: "wallet::view_model", "submission already in flight");
            return Ok(());
        }
        self.state.error = None;
        self.state.success = None;

        match self.state.mode {
            Mode::Demo => {
                let value = validate_demo_send(&self.state.form, self.state.balance)
                    .map_err(|err| self.reject(err))?;
                let to = self.state.form.recipient.trim().to_string();
                let delay = self.config.demo_delay();
                self.state.sending = true;
                self.spawn(async move {
                    tokio::time::sleep(delay).await;
                    Update::DemoSent { to, value }
                });
            }
            Mode::Connected => {
                let (Some(provider), Some(from)) = (self.provider.clone(), self.state.account)
                else {
                    return Err(self.reject(ValidationError::NotConnected));
                };
                let send = validate_send(&self.state.form, self.state.balance)
                    .map_err(|err| self.reject(err))?;
                self.state.sending = true;
                self.spawn(async move { Update::Sent(send_transfer(provider, from, send).await) });
            }
            Mode::Disconnected | Mode::Connecting => {
                return Err(self.reject(ValidationError::NotConnected));
            }
        }
        Ok(())
    }

    pub fn refresh_balance(&mut self) {
        if let Some((provider, account)) = self.live_session() {
            self.spawn(async move { Update::Balance(provider.balance(account).await) });
        }
    }

    pub fn refresh_history(&mut self) {
        let Some((_, account)) = self.live_session() else { return };
        if let Some(source) = self.history_source.clone() {
            self.spawn(async move { Update::History(source.recent_transactions(account).await) });
        }
    }

    /// Called on every polling interval.
    pub fn poll_tick(&mut self) {
        self.refresh_balance();
    }

    /// Asks the provider to switch chains. The reload happens when the provider reports the
    /// change.
    pub fn switch_network(&mut self, chain_id: u64) {
        let Some((provider, _)) = self.live_session() else {
            debug!(
                target: "wallet::view_model",
                chain_id,
                mode = %self.state.mode,
                "not switching network"
            );
            return;
        };
        self.state.error = None;
        self.spawn(async move { Update::Switched(provider.switch_network(chain_id).await) });
    }

    /// Applies every result that is ready and waits for the outstanding calls, until there is
    /// nothing left to do.
    pub async fn settle(&mut self) {
        loop {
            while let Ok(tagged) = self.events_rx.try_recv() {
                self.apply(tagged);
            }
            match self.tasks.join_next().await {
                Some(joined) => self.on_joined(joined),
                None => match self.events_rx.try_recv() {
                    Ok(tagged) => self.apply(tagged),
                    Err(_) => break,
                },
            }
        }
    }

    /// Drives the view-model until `commands` closes, publishing the state after every change.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        snapshots: watch::Sender<WalletState>,
    ) {
        let mut poll = tokio::time::interval(self.config.poll_interval());
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        poll.tick().await;

        snapshots.send_replace(self.state.clone());
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.dispatch(command),
                    None => break,
                },
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    self.on_joined(joined)
                }
                Some(tagged) = self.events_rx.recv() => self.apply(tagged),
                _ = poll.tick() => self.poll_tick(),
            }
            snapshots.send_if_modified(|current| {
                if *current == self.state {
                    return false;
                }
                *current = self.state.clone();
                true
            });
        }
        debug!(target: "wallet::view_model", "command channel closed");
    }

    fn on_joined(&mut self, joined: Result<Tagged, JoinError>) {
        match joined {
            Ok(tagged) => self.apply(tagged),
            Err(err) => error!(target: "wallet::view_model", %err, "provider task failed"),
        }
    }

    fn apply(&mut self, Tagged { epoch, update }: Tagged) {
        if epoch != self.epoch {
            debug!(
                target: "wallet::view_model",
                epoch,
                current = self.epoch,
                ?update,
                "discarding stale result"
            );
            return;
        }

        match update {
            Update::Session { result: Ok(session), announce } => {
                self.state.mode = Mode::Connected;
                self.state.account = Some(session.account);
                self.state.balance = session.balance;
                self.state.network = Some(session.network);
                if announce {
                    self.state.success = Some("Wallet connected successfully!".to_string());
                }
                self.subscribe();
                self.refresh_history();
            }
            Update::Session { result: Err(err), .. } => {
                self.next_epoch();
                self.state.reset(self.config.gas_price_gwei);
                self.state.error = Some(WalletError::from(err).to_string());
            }
            Update::Balance(Ok(balance)) => self.state.balance = balance,
            Update::Balance(Err(err)) => {
                warn!(target: "wallet::view_model", %err, "balance refresh failed");
            }
            Update::History(records) => self.state.history.merge_scanned(records),
            Update::Sent(Ok(record)) => {
                self.state.sending = false;
                self.state.success =
                    Some(format!("Transaction sent successfully! Hash: {}", record.hash));
                self.state.history.record_submitted(record);
                self.state.form = SendForm::new(self.config.gas_price_gwei);
                self.schedule_settle_refresh();
            }
            Update::Sent(Err(err)) => {
                self.state.sending = false;
                self.state.error = Some(WalletError::from(err).to_string());
            }
            Update::DemoSent { to, value } => {
                let record = demo::sent_record(&to, value);
                self.state.sending = false;
                self.state.success = Some(format!("Demo transaction sent! Hash: {}", record.hash));
                self.state.balance = self.state.balance.debit(value.saturating_add(demo::FEE));
                self.state.history.record_submitted(record);
                self.state.form = SendForm::new(self.config.gas_price_gwei);
            }
            Update::Switched(Ok(())) => {}
            Update::Switched(Err(err)) => {
                self.state.error = Some(WalletError::from(err).to_string())
            }
            Update::Event(event) => self.handle_event(event),
        }
    }

    fn handle_event(&mut self, event: ProviderEvent) {
        if self.state.mode != Mode::Connected {
            return;
        }
        debug!(target: "wallet::view_model", ?event, "provider event");

        match event {
            ProviderEvent::AccountsChanged(accounts) => match accounts.first() {
                None => self.disconnect(),
                Some(&account) if Some(account) == self.state.account => self.refresh_balance(),
                Some(&account) => {
                    self.next_epoch();
                    self.state.account = Some(account);
                    self.state.balance = Balance::ZERO;
                    self.state.history.clear();
                    self.subscribe();
                    self.refresh_balance();
                    self.refresh_history();
                }
            },
            ProviderEvent::ChainChanged(chain_id) => {
                let Some(provider) = self.provider.clone() else { return };
                self.next_epoch();
                self.state.network = Some(NetworkDescriptor::from_chain_id(chain_id));
                self.state.balance = Balance::ZERO;
                self.state.history.clear();
                self.spawn(async move {
                    Update::Session { result: load_session(provider).await, announce: false }
                });
            }
        }
    }

    /// Re-reads the balance once the sent transaction has had a moment to land.
    fn schedule_settle_refresh(&mut self) {
        let Some((provider, account)) = self.live_session() else { return };
        let delay = self.config.settle_delay();
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            Update::Balance(provider.balance(account).await)
        });
    }

    fn subscribe(&mut self) {
        let Some(provider) = &self.provider else { return };
        let epoch = self.epoch;

        let tx = self.events_tx.clone();
        let accounts = provider.on_account_changed(move |accounts| {
            let update = Update::Event(ProviderEvent::AccountsChanged(accounts));
            let _ = tx.send(Tagged { epoch, update });
        });
        let tx = self.events_tx.clone();
        let chain = provider.on_network_changed(move |chain_id| {
            let update = Update::Event(ProviderEvent::ChainChanged(chain_id));
            let _ = tx.send(Tagged { epoch, update });
        });
        self.subscriptions = vec![accounts, chain];
    }

    /// Starts a new epoch and drops the listeners registered for the old one.
    ///
    /// A send still in flight belongs to the old epoch and its result will be discarded, so the
    /// form is released here.
    fn next_epoch(&mut self) {
        self.epoch += 1;
        self.subscriptions.clear();
        self.state.sending = false;
    }

    fn live_session(&self) -> Option<(WalletProvider<P>, Address)> {
        if self.state.mode != Mode::Connected {
            return None;
        }
        Some((self.provider.clone()?, self.state.account?))
    }

    fn reject(&mut self, err: impl Into<WalletError>) -> WalletError {
        let err = err.into();
        self.state.error = Some(err.to_string());
        err
    }

    fn spawn(&mut self, update: impl Future<Output = Update> + Send + 'static) {
        let epoch = self.epoch;
        self.tasks.spawn(async move { Tagged { epoch, update: update.await } });
    }
}

async fn load_session<P: InjectedProvider + 'static>(
    provider: WalletProvider<P>,
) -> Result<Session, ProviderError> {
    let account = provider.connect().await?;
    let balance = provider.balance(account).await?;
    let network = provider.network().await?;
    Ok(Session { account, balance, network })
}

async fn send_transfer<P: InjectedProvider + 'static>(
    provider: WalletProvider<P>,
    from: Address,
    send: ValidSend,
) -> Result<TxRecord, ProviderError> {
    let tx = TxParams::transfer(from, send.to, send.value);
    let gas = provider.estimate_gas(&tx).await?;
    let tx = tx.with_gas(gas).with_gas_price(send.gas_price);
    let hash = provider.send(&tx).await?;
    Ok(TxRecord::pending(hash, from, send.to, send.value))
}
