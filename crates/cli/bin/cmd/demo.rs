use super::report;
use clap::Parser;
use defiguard_cli::{opts::ShellOptions, render};
use defiguard_wallet::{RpcProvider, SendForm, WalletConfig, WalletState, WalletViewModel};
use eyre::Result;

/// CLI arguments for `defiguard demo`.
#[derive(Clone, Debug, Parser)]
pub struct DemoArgs {
    /// Simulate sending AMOUNT ether to TO.
    #[arg(long, num_args = 2, value_names = ["TO", "AMOUNT"])]
    pub send: Option<Vec<String>>,
}

impl DemoArgs {
    pub async fn run(self, config: WalletConfig, shell: ShellOptions) -> Result<()> {
        let state = self.simulate(config).await?;
        report(&state, shell)?;
        println!("{}", render::status_table(&state));
        println!("{}", render::history_table(state.history.records()));
        Ok(())
    }

    /// Enters demo mode and runs the simulated send, if one was requested.
    pub async fn simulate(self, config: WalletConfig) -> Result<WalletState> {
        let mut wallet = WalletViewModel::<RpcProvider>::new(None, config);
        wallet.enter_demo();

        if let Some([to, amount]) = self.send.as_deref() {
            let gas_price = wallet.config().gas_price_gwei.to_string();
            wallet.set_form(SendForm { recipient: to.clone(), amount: amount.clone(), gas_price });
            wallet.submit()?;
            wallet.settle().await;
        }
        Ok(wallet.state().clone())
    }
}
