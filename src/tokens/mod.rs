//! Token accessor - ERC-20 reads and allowance grants through the wallet capability
//! One accessor per configured token, bound to the session generation it was built under.

pub mod erc20;
pub mod units;

pub use units::format_units;

use crate::errors::{SwapError, SwapResult};
use crate::logger::{self, LogTag};
use crate::session::{PendingTransaction, Session, TransactionRequest, WalletProvider};
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Address and symbol of one token of interest
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenHandle {
    pub address: Address,
    pub symbol: String,
}

/// Balance snapshot reported after a refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenBalance {
    pub symbol: String,
    pub raw: U256,
    pub decimals: u8,
    pub formatted: String,
}

pub struct TokenAccessor {
    handle: TokenHandle,
    session: Arc<Session>,
    wallet: Arc<dyn WalletProvider>,
    decimals: OnceCell<u8>,
    generation: u64,
}

impl TokenAccessor {
    /// Bind `handle` to the session's wallet at the current generation
    pub fn new(handle: TokenHandle, session: Arc<Session>) -> SwapResult<Self> {
        let wallet = session.wallet()?;
        let generation = session.generation();
        Ok(Self {
            handle,
            session,
            wallet,
            decimals: OnceCell::new(),
            generation,
        })
    }

    pub fn handle(&self) -> &TokenHandle {
        &self.handle
    }

    pub fn address(&self) -> Address {
        self.handle.address
    }

    pub fn symbol(&self) -> &str {
        &self.handle.symbol
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False once a chain change or reset happened after construction
    pub fn is_current(&self) -> bool {
        self.generation == self.session.generation()
    }

    pub async fn current_balance(&self, owner: Address) -> SwapResult<U256> {
        let data = erc20::balanceOfCall { owner }.abi_encode();
        let raw = self.read("balance", data).await?;
        erc20::balanceOfCall::abi_decode_returns(&raw).map_err(|e| self.read_failed("balance", e))
    }

    /// Always read fresh; allowances are never cached
    pub async fn current_allowance(&self, owner: Address, spender: Address) -> SwapResult<U256> {
        let data = erc20::allowanceCall { owner, spender }.abi_encode();
        let raw = self.read("allowance", data).await?;
        erc20::allowanceCall::abi_decode_returns(&raw)
            .map_err(|e| self.read_failed("allowance", e))
    }

    /// Submit `approve(spender, amount)` signed by `from`
    pub async fn grant_allowance(
        &self,
        from: Address,
        spender: Address,
        amount: U256,
    ) -> SwapResult<PendingTransaction> {
        logger::info(
            LogTag::Tokens,
            &format!("Approving {} for spender {}", self.handle.symbol, spender),
        );
        let data = erc20::approveCall { spender, amount }.abi_encode();
        self.session
            .send_transaction(from, TransactionRequest::call(self.handle.address, data))
            .await
    }

    pub async fn decimals(&self) -> SwapResult<u8> {
        self.decimals
            .get_or_try_init(|| async {
                let data = erc20::decimalsCall {}.abi_encode();
                let raw = self.read("decimals", data).await?;
                let decimals = erc20::decimalsCall::abi_decode_returns(&raw)
                    .map_err(|e| self.read_failed("decimals", e))?;
                if logger::is_debug_enabled(LogTag::Tokens) {
                    logger::debug(
                        LogTag::Tokens,
                        &format!("{} uses {} decimals", self.handle.symbol, decimals),
                    );
                }
                Ok::<u8, SwapError>(decimals)
            })
            .await
            .copied()
    }

    pub async fn balance_report(&self, owner: Address) -> SwapResult<TokenBalance> {
        let raw = self.current_balance(owner).await?;
        let decimals = self.decimals().await?;
        Ok(TokenBalance {
            symbol: self.handle.symbol.clone(),
            raw,
            decimals,
            formatted: format_units(raw, decimals),
        })
    }

    async fn read(&self, what: &'static str, data: Vec<u8>) -> SwapResult<Bytes> {
        self.wallet
            .call(self.handle.address, Bytes::from(data))
            .await
            .map_err(|e| self.read_failed(what, e))
    }

    fn read_failed(&self, what: &'static str, err: impl std::fmt::Display) -> SwapError {
        SwapError::ReadFailed {
            what,
            token: self.handle.symbol.clone(),
            message: err.to_string(),
        }
    }
}
