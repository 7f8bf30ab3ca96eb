/// Swap attempt structures and outcomes
use crate::session::SessionSnapshot;
use crate::tokens::TokenBalance;
use alloy_primitives::{Address, TxHash, U256};
use serde::Serialize;
use std::fmt;

/// Phases of one full-balance swap attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapPhase {
    QuotingSpender,
    CheckingAllowance,
    Approving,
    QuotingRoute,
    Submitting,
    Confirming,
    Done,
    Failed,
}

impl SwapPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SwapPhase::Done | SwapPhase::Failed)
    }
}

impl fmt::Display for SwapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SwapPhase::QuotingSpender => "QUOTING_SPENDER",
            SwapPhase::CheckingAllowance => "CHECKING_ALLOWANCE",
            SwapPhase::Approving => "APPROVING",
            SwapPhase::QuotingRoute => "QUOTING_ROUTE",
            SwapPhase::Submitting => "SUBMITTING",
            SwapPhase::Confirming => "CONFIRMING",
            SwapPhase::Done => "DONE",
            SwapPhase::Failed => "FAILED",
        };
        write!(f, "{}", label)
    }
}

/// Ephemeral record of the attempt in flight
#[derive(Debug, Clone)]
pub struct SwapAttempt {
    pub source: Address,
    pub destination: Address,
    pub source_symbol: String,
    pub destination_symbol: String,
    pub amount: U256,
    pub phase: SwapPhase,
    pub session: SessionSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Source balance was zero; nothing was read beyond it and nothing was sent
    NothingToSwap { token: String },
    Completed {
        tx_hash: TxHash,
        amount: U256,
        /// Hash of the allowance grant when one was needed
        approval: Option<TxHash>,
        /// Balances read after inclusion; empty when the refresh failed
        balances: Vec<TokenBalance>,
    },
}

impl SwapOutcome {
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            SwapOutcome::Completed { tx_hash, .. } => Some(*tx_hash),
            SwapOutcome::NothingToSwap { .. } => None,
        }
    }
}
