use crate::cmd::{demo::DemoArgs, send::SendArgs, watch::WatchArgs};
use alloy_primitives::TxHash;
use clap::{Parser, Subcommand};
use defiguard_cli::opts::{RpcOpts, ShellOptions};

/// A terminal wallet for Ethereum nodes with unlocked accounts.
///
/// Settings are read from `defiguard.toml` and `DEFIGUARD_*` environment variables.
#[derive(Parser)]
#[command(name = "defiguard", version, next_display_order = None)]
pub struct DefiGuard {
    #[command(flatten)]
    pub rpc: RpcOpts,

    #[command(flatten)]
    pub shell: ShellOptions,

    #[command(subcommand)]
    pub cmd: DefiGuardSubcommand,
}

#[derive(Subcommand)]
pub enum DefiGuardSubcommand {
    /// Connect and print the account, its balance and the network.
    #[command(visible_alias = "s")]
    Status,

    /// Print the recent transactions of the connected account.
    #[command(visible_alias = "h")]
    History,

    /// Send ether from the connected account.
    Send(SendArgs),

    /// Ask the node to switch to another known network.
    Switch {
        /// The EIP-155 chain ID to switch to.
        chain_id: u64,
    },

    /// Print slow, standard and fast gas prices.
    Gas,

    /// Print a transaction and its receipt status.
    Tx {
        /// The transaction hash.
        tx_hash: TxHash,
    },

    /// Run the simulated wallet. Nothing is sent to a node.
    Demo(DemoArgs),

    /// Stay connected and print the wallet whenever it changes, until Ctrl-C.
    #[command(visible_alias = "w")]
    Watch(WatchArgs),
}
