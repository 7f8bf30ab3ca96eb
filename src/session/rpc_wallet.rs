//! EIP-1193 wallet over JSON-RPC/HTTP
//!
//! Talks to a wallet that exposes its provider interface on a local RPC endpoint
//! (desktop wallets, signer proxies). Error objects are classified by `code`.

use super::wallet::{TransactionReceipt, TransactionRequest, WalletProvider};
use crate::config::{RECEIPT_POLL_INTERVAL_MS, WALLET_TIMEOUT_SECS};
use crate::errors::{RpcErrorObject, WalletError};
use crate::logger::{self, LogTag};
use alloy_primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub struct JsonRpcWallet {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
    poll_interval: Duration,
}

impl JsonRpcWallet {
    pub fn new(url: impl Into<String>) -> Result<Self, WalletError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(WALLET_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
            poll_interval: Duration::from_millis(RECEIPT_POLL_INTERVAL_MS),
        })
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, WalletError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        });

        if logger::is_debug_enabled(LogTag::Wallet) {
            logger::debug(LogTag::Wallet, &format!("→ {} #{} {}", method, id, payload["params"]));
        }

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(WalletError::Transport(format!("HTTP {}: {}", status, text)));
        }

        let body: Value = response.json().await?;
        parse_rpc_response(body)
    }
}

/// Split a JSON-RPC response into its result or a classified error
pub(crate) fn parse_rpc_response<T: DeserializeOwned>(body: Value) -> Result<T, WalletError> {
    #[derive(Deserialize)]
    struct Envelope {
        #[serde(default)]
        result: Option<Value>,
        #[serde(default)]
        error: Option<RpcErrorObject>,
    }

    let envelope: Envelope = serde_json::from_value(body)?;
    if let Some(error) = envelope.error {
        return Err(error.into());
    }
    Ok(serde_json::from_value(envelope.result.unwrap_or(Value::Null))?)
}

pub(crate) fn parse_hex_u64(raw: &str) -> Result<u64, WalletError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    u64::from_str_radix(digits, 16)
        .map_err(|e| WalletError::Transport(format!("invalid hex quantity '{}': {}", raw, e)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcReceipt {
    transaction_hash: TxHash,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl RpcReceipt {
    pub(crate) fn into_receipt(self) -> Result<TransactionReceipt, WalletError> {
        let block_number = match self.block_number.as_deref() {
            Some(raw) => Some(parse_hex_u64(raw)?),
            None => None,
        };
        // Pre-Byzantium receipts carry no status field
        let success = match self.status.as_deref() {
            Some(raw) => parse_hex_u64(raw)? == 1,
            None => true,
        };
        Ok(TransactionReceipt {
            transaction_hash: self.transaction_hash,
            block_number,
            success,
        })
    }
}

fn transaction_object(tx: &TransactionRequest) -> Value {
    let mut obj = Map::new();
    if let Some(from) = tx.from {
        obj.insert("from".into(), json!(from));
    }
    obj.insert("to".into(), json!(tx.to));
    obj.insert("data".into(), json!(tx.data));
    obj.insert("value".into(), json!(format!("0x{:x}", tx.value)));
    if let Some(gas) = tx.gas {
        obj.insert("gas".into(), json!(format!("{:#x}", gas)));
    }
    if let Some(gas_price) = tx.gas_price {
        obj.insert("gasPrice".into(), json!(format!("0x{:x}", gas_price)));
    }
    Value::Object(obj)
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.request("eth_requestAccounts", json!([])).await
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        let raw: String = self.request("eth_chainId", json!([])).await?;
        parse_hex_u64(&raw)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        let _: Value = self
            .request(
                "wallet_switchEthereumChain",
                json!([{ "chainId": format!("{:#x}", chain_id) }]),
            )
            .await?;
        Ok(())
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, WalletError> {
        self.request("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, WalletError> {
        self.request("eth_sendTransaction", json!([transaction_object(&tx)]))
            .await
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TransactionReceipt, WalletError> {
        let mut polls: u64 = 0;
        loop {
            let receipt: Option<RpcReceipt> = self
                .request("eth_getTransactionReceipt", json!([hash]))
                .await?;
            if let Some(receipt) = receipt {
                return receipt.into_receipt();
            }

            polls += 1;
            logger::verbose(LogTag::Wallet, &format!("Receipt for {} not available yet", hash));
            if polls % 15 == 0 {
                logger::info(
                    LogTag::Wallet,
                    &format!("Still waiting for {} to be included ({} polls)", hash, polls),
                );
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
