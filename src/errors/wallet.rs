/// Wallet and JSON-RPC error classification
/// Maps EIP-1193 provider error codes to structured variants at the point of failure.
use alloy_primitives::TxHash;
use serde::Deserialize;
use thiserror::Error;

/// EIP-1193: user rejected the request
pub const USER_REJECTED_CODE: i64 = 4001;

/// EIP-3326: the requested chain has not been added to the wallet
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

/// MetaMask-style "request already pending" (JSON-RPC resource unavailable)
pub const REQUEST_PENDING_CODE: i64 = -32002;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("user rejected the request")]
    UserRejected,

    #[error("a request of the same kind is already pending")]
    AlreadyPending,

    #[error("the wallet does not know this chain")]
    UnknownChain,

    #[error("transaction {hash} reverted{}", .reason.as_ref().map(|r| format!(": {}", r)).unwrap_or_default())]
    Reverted {
        hash: TxHash,
        reason: Option<String>,
    },

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("transport error: {0}")]
    Transport(String),
}

impl WalletError {
    /// Classify a JSON-RPC error object by its numeric code
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        match code {
            USER_REJECTED_CODE => WalletError::UserRejected,
            UNRECOGNIZED_CHAIN_CODE => WalletError::UnknownChain,
            REQUEST_PENDING_CODE => WalletError::AlreadyPending,
            _ => WalletError::Rpc {
                code,
                message: message.into(),
            },
        }
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            WalletError::UserRejected => Some(USER_REJECTED_CODE),
            WalletError::AlreadyPending => Some(REQUEST_PENDING_CODE),
            WalletError::UnknownChain => Some(UNRECOGNIZED_CHAIN_CODE),
            WalletError::Rpc { code, .. } => Some(*code),
            WalletError::Reverted { .. } | WalletError::Transport(_) => None,
        }
    }
}

/// JSON-RPC error object as returned in the `error` member of a response
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl From<RpcErrorObject> for WalletError {
    fn from(obj: RpcErrorObject) -> Self {
        // Wallets that wrap node errors nest the original code under data.originalError
        let nested = obj
            .data
            .as_ref()
            .and_then(|d| d.get("originalError"))
            .and_then(|o| o.get("code"))
            .and_then(|c| c.as_i64());
        WalletError::from_rpc(nested.unwrap_or(obj.code), obj.message)
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(err: reqwest::Error) -> Self {
        WalletError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::Transport(format!("JSON parsing error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_are_classified() {
        assert_eq!(WalletError::from_rpc(4001, "denied"), WalletError::UserRejected);
        assert_eq!(WalletError::from_rpc(4902, "unknown"), WalletError::UnknownChain);
        assert_eq!(WalletError::from_rpc(-32002, "pending"), WalletError::AlreadyPending);
        assert_eq!(
            WalletError::from_rpc(-32000, "nonce too low"),
            WalletError::Rpc {
                code: -32000,
                message: "nonce too low".to_string()
            }
        );
    }

    #[test]
    fn nested_original_error_code_wins() {
        let obj: RpcErrorObject = serde_json::from_value(serde_json::json!({
            "code": -32603,
            "message": "Internal JSON-RPC error.",
            "data": { "originalError": { "code": 4902, "message": "Unrecognized chain ID" } }
        }))
        .unwrap();
        assert_eq!(WalletError::from(obj), WalletError::UnknownChain);
    }

    #[test]
    fn codes_round_trip_through_variants() {
        assert_eq!(WalletError::UserRejected.code(), Some(4001));
        assert_eq!(WalletError::Transport("down".into()).code(), None);
    }
}
