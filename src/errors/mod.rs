/// Structured error handling for swap orchestration
/// Every failure is classified where it happens; nothing downstream inspects message text.
use alloy_primitives::TxHash;
use thiserror::Error;

pub mod wallet;
pub use wallet::*;

// =============================================================================
// MAIN ERROR TYPE
// =============================================================================

/// Wallet prompt that a human can decline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletAction {
    Connect,
    SwitchNetwork,
    SignTransaction,
}

impl std::fmt::Display for WalletAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletAction::Connect => write!(f, "connection request"),
            WalletAction::SwitchNetwork => write!(f, "network switch"),
            WalletAction::SignTransaction => write!(f, "transaction signature"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("User declined the {action}")]
    UserDeclined { action: WalletAction },

    #[error("No wallet provider found; install or enable a browser wallet and reload")]
    ProviderUnavailable,

    #[error("A wallet request is already pending; check your wallet")]
    RequestPending,

    #[error("Wallet is on network {actual:?}, expected chain id {expected}")]
    NetworkMismatch { expected: u64, actual: Option<u64> },

    #[error("Chain id {chain_id} is not registered in the wallet; add the network to your wallet first")]
    NetworkUnknownToWallet { chain_id: u64 },

    #[error("Switching to chain id {chain_id} failed: {reason}; switch manually")]
    SwitchDeclined { chain_id: u64, reason: String },

    #[error("Not ready to swap: {reason}")]
    NotReady { reason: String },

    #[error("Failed to read {what} of {token}: {message}")]
    ReadFailed {
        what: &'static str,
        token: String,
        message: String,
    },

    #[error("Route provider unavailable: {message}")]
    RouteProviderUnavailable { message: String },

    #[error("Route provider error (HTTP {status}): {description}")]
    RouteProviderError { status: u16, description: String },

    #[error("Transaction failed{}: {reason}", .hash.map(|h| format!(" ({})", h)).unwrap_or_default())]
    TransactionFailed {
        hash: Option<TxHash>,
        reason: String,
    },

    #[error("Wallet error{}: {message}", .code.map(|c| format!(" {}", c)).unwrap_or_default())]
    Wallet { code: Option<i64>, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub type SwapResult<T> = Result<T, SwapError>;

impl SwapError {
    /// Failures the user can fix in the wallet UI before trying again
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            SwapError::UserDeclined { .. }
                | SwapError::RequestPending
                | SwapError::NetworkMismatch { .. }
                | SwapError::NetworkUnknownToWallet { .. }
                | SwapError::SwitchDeclined { .. }
                | SwapError::NotReady { .. }
        )
    }

    /// Failures that end the whole session until the environment changes
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, SwapError::ProviderUnavailable | SwapError::Config { .. })
    }

    pub fn not_ready(reason: impl Into<String>) -> Self {
        SwapError::NotReady {
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        SwapError::Config {
            message: message.into(),
        }
    }

    /// Classify a wallet failure raised while submitting or awaiting a transaction
    pub fn from_transaction(err: WalletError, hash: Option<TxHash>) -> Self {
        match err {
            WalletError::UserRejected => SwapError::UserDeclined {
                action: WalletAction::SignTransaction,
            },
            WalletError::AlreadyPending => SwapError::RequestPending,
            WalletError::Reverted { hash, reason } => SwapError::TransactionFailed {
                hash: Some(hash),
                reason: reason.unwrap_or_else(|| "execution reverted".to_string()),
            },
            WalletError::Rpc { message, .. } | WalletError::Transport(message) => {
                SwapError::TransactionFailed {
                    hash,
                    reason: message,
                }
            }
            WalletError::UnknownChain => SwapError::Wallet {
                code: Some(UNRECOGNIZED_CHAIN_CODE),
                message: "chain is not recognized by the wallet".to_string(),
            },
        }
    }

    /// Classify a failure while polling for the receipt of `hash`
    ///
    /// Only a reverted receipt is a failed transaction; anything else leaves the
    /// transaction's fate unknown and is reported as a wallet error.
    pub fn from_receipt(err: WalletError, hash: TxHash) -> Self {
        match err {
            WalletError::Reverted { .. } => SwapError::from_transaction(err, Some(hash)),
            other => SwapError::Wallet {
                code: other.code(),
                message: format!("receipt for {} unavailable: {}", hash, other),
            },
        }
    }
}

/// Generic wallet failure; prompts with a known action map their rejection at the call site
impl From<WalletError> for SwapError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::AlreadyPending => SwapError::RequestPending,
            WalletError::Rpc { code, message } => SwapError::Wallet {
                code: Some(code),
                message,
            },
            other => SwapError::Wallet {
                code: other.code(),
                message: other.to_string(),
            },
        }
    }
}
