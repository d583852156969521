use clap::Parser;
use defiguard_wallet::{ConfigError, WalletConfig};
use figment::{
    Figment, Metadata, Profile,
    value::{Dict, Map},
};

#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "RPC options")]
pub struct RpcOpts {
    /// The RPC endpoint of the node holding the wallet's unlocked accounts.
    ///
    /// Overrides `rpc_url` from `defiguard.toml` and `DEFIGUARD_RPC_URL`.
    #[arg(short = 'r', long = "rpc-url", env = "ETH_RPC_URL", global = true)]
    pub url: Option<String>,
}

impl figment::Provider for RpcOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("RpcOpts")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Ok(Map::from([(Profile::Default, self.dict())]))
    }
}

impl RpcOpts {
    pub fn dict(&self) -> Dict {
        let mut dict = Dict::new();
        if let Some(url) = self.url.as_deref().map(str::trim).filter(|url| !url.is_empty()) {
            dict.insert("rpc_url".into(), url.into());
        }
        dict
    }

    /// The wallet's config sources with these options merged on top.
    pub fn into_figment(self) -> Figment {
        WalletConfig::figment().merge(self)
    }

    pub fn load_config(&self) -> Result<WalletConfig, ConfigError> {
        WalletConfig::try_from(self.clone().into_figment())
    }
}
