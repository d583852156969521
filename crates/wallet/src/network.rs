//! Known networks and the descriptor shown for the active chain.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// Static metadata about a chain the wallet knows how to name, switch to and add.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KnownNetwork {
    pub chain_id: u64,
    pub name: &'static str,
    pub rpc_url: &'static str,
    pub block_explorer: &'static str,
}

impl KnownNetwork {
    /// The `0x`-prefixed hex chain id used by `wallet_*` methods.
    pub fn hex_chain_id(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// Params for `wallet_switchEthereumChain`.
    pub fn switch_params(&self) -> Value {
        json!([{ "chainId": self.hex_chain_id() }])
    }

    /// Params for `wallet_addEthereumChain`.
    pub fn add_params(&self) -> Value {
        json!([{
            "chainId": self.hex_chain_id(),
            "chainName": self.name,
            "rpcUrls": [self.rpc_url],
            "blockExplorerUrls": [self.block_explorer],
        }])
    }
}

pub static KNOWN_NETWORKS: &[KnownNetwork] = &[
    KnownNetwork {
        chain_id: 1,
        name: "Ethereum Mainnet",
        rpc_url: "https://mainnet.infura.io/v3/",
        block_explorer: "https://etherscan.io",
    },
    KnownNetwork {
        chain_id: 3,
        name: "Ropsten Testnet",
        rpc_url: "https://ropsten.infura.io/v3/",
        block_explorer: "https://ropsten.etherscan.io",
    },
    KnownNetwork {
        chain_id: 4,
        name: "Rinkeby Testnet",
        rpc_url: "https://rinkeby.infura.io/v3/",
        block_explorer: "https://rinkeby.etherscan.io",
    },
    KnownNetwork {
        chain_id: 5,
        name: "Goerli Testnet",
        rpc_url: "https://goerli.infura.io/v3/",
        block_explorer: "https://goerli.etherscan.io",
    },
    KnownNetwork {
        chain_id: 42,
        name: "Kovan Testnet",
        rpc_url: "https://kovan.infura.io/v3/",
        block_explorer: "https://kovan.etherscan.io",
    },
    KnownNetwork {
        chain_id: 11155111,
        name: "Sepolia Testnet",
        rpc_url: "https://sepolia.infura.io/v3/",
        block_explorer: "https://sepolia.etherscan.io",
    },
    KnownNetwork {
        chain_id: 1337,
        name: "Local Development",
        rpc_url: "http://127.0.0.1:8545",
        block_explorer: "http://localhost",
    },
];

/// Looks up a chain in [`KNOWN_NETWORKS`].
pub fn known_network(chain_id: u64) -> Option<&'static KnownNetwork> {
    KNOWN_NETWORKS.iter().find(|network| network.chain_id == chain_id)
}

/// The network as displayed to the user.
///
/// `chain_id` is `None` only for the simulated demo network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub chain_id: Option<u64>,
    pub name: String,
}

impl NetworkDescriptor {
    /// Resolves a chain id through the known-network table, falling back to `Network ID: <id>`.
    pub fn from_chain_id(chain_id: u64) -> Self {
        let name = match known_network(chain_id) {
            Some(network) => network.name.to_string(),
            None => format!("Network ID: {chain_id}"),
        };
        Self { chain_id: Some(chain_id), name }
    }

    pub fn demo() -> Self {
        Self { chain_id: None, name: crate::demo::NETWORK_NAME.to_string() }
    }

    pub fn known(&self) -> Option<&'static KnownNetwork> {
        self.chain_id.and_then(known_network)
    }
}

impl fmt::Display for NetworkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
