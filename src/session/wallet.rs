/// Wallet capability boundary
/// The process never holds keys: account access, network switching and signing
/// all go through an external provider implementing `WalletProvider`.
use crate::errors::WalletError;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;

/// Transaction handed to the wallet for signing and broadcast
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    /// Gas limit; the wallet estimates when absent
    pub gas: Option<u64>,
    /// Legacy gas price; the wallet prices when absent
    pub gas_price: Option<U256>,
}

impl TransactionRequest {
    pub fn call(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            data: data.into(),
            ..Default::default()
        }
    }
}

/// Inclusion result of a broadcast transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    /// False when execution reverted
    pub success: bool,
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Prompt for account access; first entry is the active account
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Ask the wallet to switch its active network
    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;

    /// Read-only contract call against the latest block
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, WalletError>;

    /// Sign and broadcast; returns once the node accepted the transaction
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, WalletError>;

    /// Block until the transaction is included in a block
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TransactionReceipt, WalletError>;
}
