//! swapall - swap the entire balance of one ERC-20 token for another through a
//! DEX aggregator, signing with an external wallet.
//!
//! Typical flow: build a `Session` around a `WalletProvider`, `connect()` it, then
//! hand it to a `SwapOrchestrator` together with a `RouteProvider` and call
//! `prepare()` followed by `swap_all` / `swap_all_by_symbol`.

pub mod config;
pub mod errors;
pub mod logger;
pub mod router;
pub mod session;
pub mod swaps;
pub mod tokens;

#[cfg(test)]
mod testing;

pub use config::{SwapConfig, TokenConfig};
pub use errors::{SwapError, SwapResult, WalletAction, WalletError};
pub use router::{OneInchClient, RouteProvider, SwapQuote};
pub use session::{JsonRpcWallet, Session, SessionEvent, SessionSnapshot, SessionTransition, WalletProvider};
pub use swaps::{LogSink, StatusSink, SwapEvent, SwapOrchestrator, SwapOutcome, SwapPhase};
pub use tokens::{TokenAccessor, TokenBalance, TokenHandle};
