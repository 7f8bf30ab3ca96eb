/// Status events for the presentation layer
use super::types::SwapPhase;
use crate::errors::SwapError;
use crate::logger::{self, LogTag};
use alloy_primitives::TxHash;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapEvent {
    Phase { phase: SwapPhase, detail: String },
    TransactionSent { phase: SwapPhase, hash: TxHash },
    Warning { message: String },
    Failed { phase: SwapPhase, error: SwapError },
    /// Refused by the entry guard before any phase began
    Rejected { error: SwapError },
}

/// Receives every status event of an attempt
pub trait StatusSink: Send + Sync {
    fn emit(&self, event: SwapEvent);
}

/// Default sink writing through the logger
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl StatusSink for LogSink {
    fn emit(&self, event: SwapEvent) {
        match event {
            SwapEvent::Phase { phase, detail } => {
                logger::info(LogTag::Swap, &format!("[{}] {}", phase, detail));
            }
            SwapEvent::TransactionSent { phase, hash } => {
                logger::info(LogTag::Swap, &format!("[{}] transaction sent: {}", phase, hash));
            }
            SwapEvent::Warning { message } => logger::warning(LogTag::Swap, &message),
            SwapEvent::Failed { phase, error } => {
                logger::error(LogTag::Swap, &format!("[{}] swap failed: {}", phase, error));
            }
            SwapEvent::Rejected { error } => {
                logger::warning(LogTag::Swap, &format!("Swap not started: {}", error));
            }
        }
    }
}
