use super::{connect, report, rpc_provider};
use clap::Parser;
use defiguard_cli::{opts::ShellOptions, render};
use defiguard_wallet::{InjectedProvider, SendForm, WalletConfig, WalletState};
use eyre::Result;
use std::sync::Arc;

/// CLI arguments for `defiguard send`.
#[derive(Clone, Debug, Parser)]
pub struct SendArgs {
    /// The recipient address.
    pub to: String,

    /// The amount to send, in ether.
    pub amount: String,

    /// The gas price in gwei. Defaults to `gas_price_gwei` from the config.
    #[arg(long)]
    pub gas_price: Option<String>,
}

impl SendArgs {
    pub async fn run(self, config: WalletConfig, shell: ShellOptions) -> Result<()> {
        let state = self.send(rpc_provider(&config)?, config).await?;
        report(&state, shell)?;
        println!("{}", render::status_table(&state));
        Ok(())
    }

    /// Submits the transfer and waits for the post-send balance refresh.
    pub async fn send<P: InjectedProvider + 'static>(
        self,
        provider: Arc<P>,
        config: WalletConfig,
    ) -> Result<WalletState> {
        let (_, mut wallet) = connect(provider, config).await?;
        let gas_price =
            self.gas_price.unwrap_or_else(|| wallet.config().gas_price_gwei.to_string());
        wallet.set_form(SendForm { recipient: self.to, amount: self.amount, gas_price });
        wallet.submit()?;
        wallet.settle().await;
        Ok(wallet.state().clone())
    }
}
