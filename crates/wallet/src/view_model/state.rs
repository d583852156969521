use crate::{history::TxHistory, network::NetworkDescriptor, units::Balance};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    /// Simulated wallet; never talks to a provider.
    Demo,
}

impl Mode {
    /// Whether an account is shown, real or simulated.
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Connected | Self::Demo)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Demo => "demo",
        })
    }
}

/// The send form as typed by the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendForm {
    pub recipient: String,
    /// Amount in ether.
    pub amount: String,
    /// Gas price in gwei.
    pub gas_price: String,
}

impl SendForm {
    pub fn new(gas_price_gwei: u64) -> Self {
        Self {
            recipient: String::new(),
            amount: String::new(),
            gas_price: gas_price_gwei.to_string(),
        }
    }

    pub fn transfer(recipient: impl Into<String>, amount: impl Into<String>) -> Self {
        Self { recipient: recipient.into(), amount: amount.into(), ..Default::default() }
    }
}

impl Default for SendForm {
    fn default() -> Self {
        Self::new(20)
    }
}

/// Everything the presentation layer renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletState {
    pub mode: Mode,
    pub account: Option<Address>,
    pub balance: Balance,
    pub network: Option<NetworkDescriptor>,
    pub history: TxHistory,
    pub form: SendForm,
    /// A submission is in flight.
    pub sending: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl WalletState {
    pub fn new(history_limit: usize, gas_price_gwei: u64) -> Self {
        Self {
            mode: Mode::Disconnected,
            account: None,
            balance: Balance::ZERO,
            network: None,
            history: TxHistory::new(history_limit),
            form: SendForm::new(gas_price_gwei),
            sending: false,
            error: None,
            success: None,
        }
    }

    pub fn is_demo(&self) -> bool {
        self.mode == Mode::Demo
    }

    /// Drops the session, keeping only the configured limits.
    pub(crate) fn reset(&mut self, gas_price_gwei: u64) {
        *self = Self::new(self.history.limit(), gas_price_gwei);
    }
}

impl Default for WalletState {
    fn default() -> Self {
        Self::new(10, 20)
    }
}
