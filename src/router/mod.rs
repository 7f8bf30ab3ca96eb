//! Route provider client
//! Stateless request/response access to a DEX aggregator: the spender address
//! that needs an allowance, and an executable trade for a given amount.

pub mod oneinch;
pub mod types;

pub use oneinch::OneInchClient;

use crate::errors::SwapResult;
use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;

/// Executable trade returned by the aggregator; used once and discarded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapQuote {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas: Option<u64>,
    pub gas_price: Option<U256>,
}

#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Contract that must be allowed to spend the source token
    async fn spender_address(&self) -> SwapResult<Address>;

    /// Trade `amount` of `source` into `destination` for `from`
    async fn quote(
        &self,
        source: Address,
        destination: Address,
        amount: U256,
        from: Address,
        slippage_bps: u16,
    ) -> SwapResult<SwapQuote>;
}

#[async_trait]
impl<T: RouteProvider + ?Sized> RouteProvider for std::sync::Arc<T> {
    async fn spender_address(&self) -> SwapResult<Address> {
        (**self).spender_address().await
    }

    async fn quote(
        &self,
        source: Address,
        destination: Address,
        amount: U256,
        from: Address,
        slippage_bps: u16,
    ) -> SwapResult<SwapQuote> {
        (**self)
            .quote(source, destination, amount, from, slippage_bps)
            .await
    }
}
