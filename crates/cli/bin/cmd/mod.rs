//! Subcommands that drive the wallet view-model.

use defiguard_cli::{opts::ShellOptions, render};
use defiguard_wallet::{InjectedProvider, RpcProvider, WalletConfig, WalletState, WalletViewModel};
use eyre::{Result, WrapErr};
use std::sync::Arc;
use yansi::Paint;

pub mod demo;
pub mod send;
pub mod watch;

/// Builds the HTTP provider for the configured endpoint.
pub fn rpc_provider(config: &WalletConfig) -> Result<Arc<RpcProvider>> {
    let provider = RpcProvider::try_new(&config.rpc_url)
        .wrap_err_with(|| format!("invalid RPC URL `{}`", config.rpc_url))?;
    Ok(Arc::new(provider))
}

/// Connects a view-model to `provider` and waits for the session, history included.
pub async fn connect<P: InjectedProvider + 'static>(
    provider: Arc<P>,
    config: WalletConfig,
) -> Result<(Arc<P>, WalletViewModel<P>)> {
    let mut wallet = WalletViewModel::new(Some(provider.clone()), config);
    wallet.connect();
    wallet.settle().await;
    if let Some(error) = &wallet.state().error {
        eyre::bail!("{error}");
    }
    Ok((provider, wallet))
}

/// Fails with the state's error, otherwise prints its success notice.
pub fn report(state: &WalletState, shell: ShellOptions) -> Result<()> {
    if let Some(error) = &state.error {
        eyre::bail!("{error}");
    }
    if !shell.quiet
        && let Some(success) = &state.success
    {
        eprintln!("{}", success.green());
    }
    Ok(())
}

/// Asks the node to switch chains and reloads the session once it reports the new chain.
pub async fn switch(config: WalletConfig, chain_id: u64, shell: ShellOptions) -> Result<()> {
    let (provider, mut wallet) = connect(rpc_provider(&config)?, config).await?;
    // record the current chain so the switch shows up as a change
    provider.poll_events().await?;

    wallet.switch_network(chain_id);
    wallet.settle().await;
    report(wallet.state(), shell)?;

    provider.poll_events().await?;
    wallet.settle().await;
    report(wallet.state(), shell)?;
    println!("{}", render::status_table(wallet.state()));
    Ok(())
}
