use super::rpc_provider;
use clap::Parser;
use defiguard_cli::{opts::ShellOptions, render};
use defiguard_wallet::{Command, WalletConfig, WalletState, WalletViewModel};
use eyre::Result;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// CLI arguments for `defiguard watch`.
#[derive(Clone, Debug, Parser)]
pub struct WatchArgs {
    /// How often to ask the node for account and chain changes, in seconds.
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,
}

impl WatchArgs {
    pub async fn run(self, config: WalletConfig, shell: ShellOptions) -> Result<()> {
        let provider = rpc_provider(&config)?;
        let wallet = WalletViewModel::new(Some(provider.clone()), config);

        let (commands, commands_rx) = mpsc::channel(16);
        let (snapshots, mut updates) = watch::channel(WalletState::default());
        let view_model = tokio::spawn(wallet.run(commands_rx, snapshots));
        commands.send(Command::Connect).await?;

        let mut poll = tokio::time::interval(Duration::from_secs(self.interval));
        let mut shown: Option<WalletState> = None;
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let mut state = updates.borrow_and_update().clone();
                    if !shell.quiet || state.error.is_some() {
                        for notice in render::notices(&state) {
                            eprintln!("{notice}");
                        }
                    }
                    // notices are shown once
                    if state.error.take().is_some() {
                        commands.send(Command::DismissError).await?;
                    }
                    if state.success.take().is_some() {
                        commands.send(Command::DismissSuccess).await?;
                    }
                    if shown.as_ref() != Some(&state) {
                        print_state(&state);
                        shown = Some(state);
                    }
                }
                _ = poll.tick() => {
                    if let Err(err) = provider.poll_events().await {
                        warn!(%err, "failed to poll provider events");
                    }
                }
            }
        }

        drop(commands);
        view_model.await?;
        Ok(())
    }
}

fn print_state(state: &WalletState) {
    println!("{}", render::status_table(state));
    if !state.history.is_empty() {
        println!("{}", render::history_table(state.history.records()));
    }
}
