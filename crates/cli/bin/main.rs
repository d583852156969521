#[macro_use]
extern crate tracing;

use clap::Parser;
use defiguard_cli::{handler, render, utils};
use defiguard_wallet::WalletProvider;
use eyre::{OptionExt, Result};

pub mod args;
pub mod cmd;

use args::{DefiGuard, DefiGuardSubcommand};

fn main() -> Result<()> {
    handler::install();
    utils::load_dotenv();
    utils::subscriber();
    let args = DefiGuard::parse();
    args.shell.apply();
    main_args(args)
}

#[tokio::main]
async fn main_args(args: DefiGuard) -> Result<()> {
    let config = args.rpc.load_config()?;
    debug!(rpc_url = %config.rpc_url, "loaded config");
    let shell = args.shell;

    match args.cmd {
        DefiGuardSubcommand::Status => {
            let (_, wallet) = cmd::connect(cmd::rpc_provider(&config)?, config).await?;
            cmd::report(wallet.state(), shell)?;
            println!("{}", render::status_table(wallet.state()));
        }
        DefiGuardSubcommand::History => {
            let (_, wallet) = cmd::connect(cmd::rpc_provider(&config)?, config).await?;
            let history = &wallet.state().history;
            if history.is_empty() {
                println!("No transactions found");
            } else {
                println!("{}", render::history_table(history.records()));
            }
        }
        DefiGuardSubcommand::Send(cmd) => cmd.run(config, shell).await?,
        DefiGuardSubcommand::Switch { chain_id } => cmd::switch(config, chain_id, shell).await?,
        DefiGuardSubcommand::Gas => {
            let provider = WalletProvider::new(cmd::rpc_provider(&config)?);
            println!("{}", render::gas_table(&provider.gas_price_recommendation().await));
        }
        DefiGuardSubcommand::Tx { tx_hash } => {
            let provider = WalletProvider::new(cmd::rpc_provider(&config)?);
            let details = provider
                .transaction(tx_hash)
                .await?
                .ok_or_eyre(format!("transaction {tx_hash} not found"))?;
            println!("{}", render::transaction_table(&details));
        }
        DefiGuardSubcommand::Demo(cmd) => cmd.run(config, shell).await?,
        DefiGuardSubcommand::Watch(cmd) => cmd.run(config, shell).await?,
    }
    Ok(())
}
