//! Wallet configuration.
//!
//! Values are layered, later sources winning:
//!
//! 1. built-in defaults
//! 2. `defiguard.toml` (or the file named by `DEFIGUARD_CONFIG`)
//! 3. `DEFIGUARD_*` environment variables, e.g. `DEFIGUARD_POLL_INTERVAL_SECS=10`

use crate::error::ConfigError;
use figment::{
    Figment, Metadata, Profile, Provider,
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Endpoint of the node backing [`RpcProvider`](crate::RpcProvider).
    pub rpc_url: String,
    /// Balance polling period while connected.
    pub poll_interval_secs: u64,
    /// Delay between a successful send and the balance refresh that follows it.
    pub settle_delay_ms: u64,
    /// How long a simulated demo send takes.
    pub demo_delay_ms: u64,
    /// Number of blocks the history scanner walks back.
    pub max_blocks_to_scan: u64,
    /// Cap on displayed records and on scanner matches.
    pub history_limit: usize,
    /// Default gas price of the send form, in gwei.
    pub gas_price_gwei: u64,
}

impl WalletConfig {
    pub const FILE_NAME: &'static str = "defiguard.toml";

    /// Environment variable overriding the config file location.
    pub const PATH_ENV: &'static str = "DEFIGUARD_CONFIG";

    pub const ENV_PREFIX: &'static str = "DEFIGUARD_";

    /// Loads the config from all sources.
    pub fn load() -> Result<Self, ConfigError> {
        Self::try_from(Self::figment())
    }

    /// Extracts a config from `provider`, typically [`WalletConfig::figment`] with extra layers
    /// merged on top.
    pub fn try_from<T: Provider>(provider: T) -> Result<Self, ConfigError> {
        let figment = Figment::from(provider);
        trace!(target: "wallet::config", ?figment, "load config with provider");
        Ok(figment.extract::<Self>()?)
    }

    /// The default layering of defaults, config file and environment.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(Self::config_path()))
            .merge(Env::prefixed(Self::ENV_PREFIX).ignore(&["config"]))
    }

    fn config_path() -> PathBuf {
        std::env::var_os(Self::PATH_ENV).map_or_else(|| Self::FILE_NAME.into(), PathBuf::from)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn demo_delay(&self) -> Duration {
        Duration::from_millis(self.demo_delay_ms)
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            poll_interval_secs: 30,
            settle_delay_ms: 1000,
            demo_delay_ms: 2000,
            max_blocks_to_scan: 1000,
            history_limit: 10,
            gas_price_gwei: 20,
        }
    }
}

impl Provider for WalletConfig {
    fn metadata(&self) -> Metadata {
        Metadata::named("DefiGuard Config")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}
