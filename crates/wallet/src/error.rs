//! Error types.

use crate::provider::RpcError;

/// Send-form validation failures. The display strings are shown to the user as is.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a recipient address")]
    EmptyRecipient,
    #[error("Please enter a valid amount greater than 0")]
    InvalidAmount,
    #[error("Insufficient balance for this transaction")]
    InsufficientBalance,
    #[error("Invalid recipient address format")]
    InvalidAddress,
    #[error("Please enter a valid recipient address")]
    RecipientTooShort,
    #[error("Please enter a valid gas price")]
    InvalidGasPrice,
    #[error("Please connect your wallet first")]
    NotConnected,
}

/// Errors returned by [`WalletProvider`](crate::WalletProvider).
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("MetaMask is not installed. Please install MetaMask to use this wallet.")]
    NoProviderInstalled,
    #[error("No accounts found")]
    NoAccountsAuthorized,
    #[error("Failed to connect wallet: {0}")]
    AccessRejected(RpcError),
    #[error("Failed to connect wallet: {0}")]
    ConnectFailed(RpcError),
    #[error("Failed to get {what}: {source}")]
    QueryFailed { what: &'static str, source: RpcError },
    #[error("invalid `{method}` response: {source}")]
    InvalidResponse { method: &'static str, source: serde_json::Error },
    #[error("Failed to estimate gas: {0}")]
    EstimateFailed(RpcError),
    #[error("Transaction failed: {0}")]
    TransactionRejected(RpcError),
    #[error("Transaction failed: {0}")]
    InsufficientFunds(RpcError),
    #[error("Transaction failed: {0}")]
    TransactionFailed(RpcError),
    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(u64),
    #[error("Failed to switch network: {0}")]
    SwitchFailed(RpcError),
}

impl ProviderError {
    /// Whether the user declined the request in the provider's UI.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::AccessRejected(_) | Self::TransactionRejected(_))
            || matches!(self, Self::SwitchFailed(err) if err.is_user_rejected())
    }
}

/// The error taxonomy surfaced by the [`WalletViewModel`](crate::WalletViewModel).
///
/// Its display string is what ends up in the view's error message.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("MetaMask is not installed. Please install MetaMask to use this wallet.")]
    ProviderUnavailable,
    #[error(transparent)]
    UserRejected(ProviderError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    ProviderQuery(ProviderError),
    #[error(transparent)]
    Transaction(ProviderError),
}

impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NoProviderInstalled => Self::ProviderUnavailable,
            err if err.is_user_rejection() => Self::UserRejected(err),
            err @ (ProviderError::EstimateFailed(_)
            | ProviderError::InsufficientFunds(_)
            | ProviderError::TransactionFailed(_)) => Self::Transaction(err),
            err => Self::ProviderQuery(err),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to extract wallet config: {0}")]
    Extract(#[from] figment::Error),
}
