//! Swap orchestrator - full-balance swaps driven through the aggregator and the wallet
//!
//! One attempt walks balance discovery, allowance reconciliation, route acquisition,
//! submission, confirmation and balance refresh. Every phase transition is emitted
//! to the configured `StatusSink`; every failure aborts the attempt without retry.

pub mod status;
pub mod types;


pub use status::{LogSink, StatusSink, SwapEvent};
pub use types::{SwapAttempt, SwapOutcome, SwapPhase};

use crate::config::SwapConfig;
use crate::errors::{SwapError, SwapResult};
use crate::logger::{self, LogTag};
use crate::router::RouteProvider;
use crate::session::{Session, TransactionRequest};
use crate::tokens::{TokenAccessor, TokenBalance, TokenHandle};
use alloy_primitives::{Address, U256};
use std::sync::Arc;

pub struct SwapOrchestrator<R: RouteProvider> {
    session: Arc<Session>,
    router: R,
    config: SwapConfig,
    accessors: Vec<TokenAccessor>,
    sink: Arc<dyn StatusSink>,
}

impl<R: RouteProvider> SwapOrchestrator<R> {
    pub fn new(session: Arc<Session>, router: R, config: SwapConfig) -> SwapResult<Self> {
        config.validate()?;
        if session.target_chain_id() != config.chain_id {
            return Err(SwapError::config(format!(
                "session targets chain id {} but configuration uses {}",
                session.target_chain_id(),
                config.chain_id
            )));
        }

        Ok(Self {
            session,
            router,
            config,
            accessors: Vec::new(),
            sink: Arc::new(LogSink),
        })
    }

    pub fn with_sink(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    /// Switch to the target network if needed, build token accessors and report balances
    pub async fn prepare(&mut self) -> SwapResult<Vec<TokenBalance>> {
        self.session.ensure_network(self.config.chain_id).await?;
        self.initialize()?;
        self.refresh_balances().await
    }

    /// Build one accessor per configured token, bound to the current session generation
    pub fn initialize(&mut self) -> SwapResult<()> {
        if !self.session.can_sign() {
            return Err(SwapError::not_ready(
                "wallet is not connected to the target network",
            ));
        }

        let mut accessors = Vec::with_capacity(self.config.tokens.len());
        for token in &self.config.tokens {
            accessors.push(TokenAccessor::new(
                TokenHandle {
                    address: token.address,
                    symbol: token.symbol.clone(),
                },
                self.session.clone(),
            )?);
        }
        self.accessors = accessors;

        logger::info(
            LogTag::Swap,
            &format!(
                "Initialized {} token accessors (generation {})",
                self.accessors.len(),
                self.session.generation()
            ),
        );
        Ok(())
    }

    /// Read every configured token balance for the connected account
    pub async fn refresh_balances(&self) -> SwapResult<Vec<TokenBalance>> {
        let account = self
            .session
            .account()
            .ok_or_else(|| SwapError::not_ready("no connected account"))?;
        let generation = self.session.generation();

        let mut balances = Vec::with_capacity(self.config.tokens.len());
        for token in &self.config.tokens {
            let accessor = self.current_accessor(token.address, generation)?;
            let balance = accessor.balance_report(account).await?;
            logger::info(
                LogTag::Tokens,
                &format!("{} balance: {}", balance.symbol, balance.formatted),
            );
            balances.push(balance);
        }
        Ok(balances)
    }

    pub async fn swap_all_by_symbol(
        &mut self,
        source_symbol: &str,
        destination_symbol: &str,
    ) -> SwapResult<SwapOutcome> {
        let source = self.address_of(source_symbol)?;
        let destination = self.address_of(destination_symbol)?;
        self.swap_all(source, destination).await
    }

    /// Swap the entire balance of `source` into `destination`
    ///
    /// Takes `&mut self` so a second attempt cannot start while one is in flight.
    pub async fn swap_all(
        &mut self,
        source: Address,
        destination: Address,
    ) -> SwapResult<SwapOutcome> {
        let mut attempt = match self.begin_attempt(source, destination) {
            Ok(attempt) => attempt,
            Err(error) => {
                self.sink.emit(SwapEvent::Rejected {
                    error: error.clone(),
                });
                return Err(error);
            }
        };

        match self.run_attempt(&mut attempt).await {
            Ok(outcome) => Ok(outcome),
            Err(error) => {
                let phase = attempt.phase;
                attempt.phase = SwapPhase::Failed;
                self.sink.emit(SwapEvent::Failed {
                    phase,
                    error: error.clone(),
                });
                if error.is_user_actionable() {
                    logger::warning(LogTag::Swap, "Attempt aborted; resolve it in the wallet and retry");
                }
                Err(error)
            }
        }
    }

    /// Entry guard: signing capability plus current-generation accessors for both tokens
    fn begin_attempt(&self, source: Address, destination: Address) -> SwapResult<SwapAttempt> {
        let snapshot = self.session.snapshot();
        if !snapshot.can_sign {
            return Err(SwapError::not_ready(
                "wallet is not connected to the target network",
            ));
        }
        if source == destination {
            return Err(SwapError::not_ready(
                "source and destination token are the same",
            ));
        }

        let source_accessor = self.current_accessor(source, snapshot.generation)?;
        let destination_accessor = self.current_accessor(destination, snapshot.generation)?;

        Ok(SwapAttempt {
            source,
            destination,
            source_symbol: source_accessor.symbol().to_string(),
            destination_symbol: destination_accessor.symbol().to_string(),
            amount: U256::ZERO,
            phase: SwapPhase::QuotingSpender,
            session: snapshot,
        })
    }

    async fn run_attempt(&self, attempt: &mut SwapAttempt) -> SwapResult<SwapOutcome> {
        let account = attempt
            .session
            .account
            .ok_or_else(|| SwapError::not_ready("no connected account"))?;
        let source = self.current_accessor(attempt.source, attempt.session.generation)?;
        let source_symbol = attempt.source_symbol.clone();
        let destination_symbol = attempt.destination_symbol.clone();

        self.enter(
            attempt,
            SwapPhase::QuotingSpender,
            format!("Reading {} balance", source_symbol),
        );
        let balance = source.current_balance(account).await?;
        if balance.is_zero() {
            attempt.phase = SwapPhase::Done;
            self.sink.emit(SwapEvent::Phase {
                phase: SwapPhase::Done,
                detail: format!("No {} to swap", source_symbol),
            });
            return Ok(SwapOutcome::NothingToSwap {
                token: source_symbol,
            });
        }
        attempt.amount = balance;
        let spender = self.router.spender_address().await?;

        self.enter(
            attempt,
            SwapPhase::CheckingAllowance,
            format!("Checking {} allowance for {}", source_symbol, spender),
        );
        let allowance = source.current_allowance(account, spender).await?;

        let approval = if allowance < balance {
            self.enter(
                attempt,
                SwapPhase::Approving,
                format!(
                    "Allowance {} below balance {}; approving {}",
                    allowance, balance, source_symbol
                ),
            );
            let pending = source.grant_allowance(account, spender, U256::MAX).await?;
            let hash = pending.hash();
            self.sink.emit(SwapEvent::TransactionSent {
                phase: SwapPhase::Approving,
                hash,
            });
            pending.wait().await?;

            let granted = source.current_allowance(account, spender).await?;
            logger::info(
                LogTag::Swap,
                &format!("{} allowance after approval: {}", source_symbol, granted),
            );
            Some(hash)
        } else {
            None
        };

        self.enter(
            attempt,
            SwapPhase::QuotingRoute,
            format!(
                "Requesting route for {} {} -> {}",
                balance, source_symbol, destination_symbol
            ),
        );
        let quote = self
            .router
            .quote(
                attempt.source,
                attempt.destination,
                balance,
                account,
                self.config.slippage_bps,
            )
            .await?;

        self.enter(
            attempt,
            SwapPhase::Submitting,
            format!("Submitting swap to {}", quote.to),
        );
        let request = TransactionRequest {
            from: None,
            to: quote.to,
            data: quote.data,
            value: quote.value,
            gas: quote.gas,
            gas_price: quote.gas_price,
        };
        let pending = self.session.send_transaction(account, request).await?;
        let tx_hash = pending.hash();
        self.sink.emit(SwapEvent::TransactionSent {
            phase: SwapPhase::Submitting,
            hash: tx_hash,
        });

        self.enter(
            attempt,
            SwapPhase::Confirming,
            format!("Waiting for {} to be included", tx_hash),
        );
        let receipt = pending.wait().await?;

        let balances = self.refresh_pair(attempt, account).await;
        self.enter(
            attempt,
            SwapPhase::Done,
            format!(
                "Swapped {} {} -> {} in block {}",
                balance,
                source_symbol,
                destination_symbol,
                receipt
                    .block_number
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "?".to_string())
            ),
        );

        Ok(SwapOutcome::Completed {
            tx_hash,
            amount: balance,
            approval,
            balances,
        })
    }

    /// Post-swap refresh; failures are reported but do not fail the confirmed swap
    async fn refresh_pair(&self, attempt: &SwapAttempt, account: Address) -> Vec<TokenBalance> {
        let mut balances = Vec::with_capacity(2);
        for address in [attempt.source, attempt.destination] {
            let report = match self.current_accessor(address, attempt.session.generation) {
                Ok(accessor) => accessor.balance_report(account).await,
                Err(e) => Err(e),
            };
            match report {
                Ok(balance) => balances.push(balance),
                Err(e) => {
                    self.sink.emit(SwapEvent::Warning {
                        message: format!("Balance refresh failed after swap: {}", e),
                    });
                    return Vec::new();
                }
            }
        }
        balances
    }

    fn enter(&self, attempt: &mut SwapAttempt, phase: SwapPhase, detail: String) {
        attempt.phase = phase;
        self.sink.emit(SwapEvent::Phase { phase, detail });
    }

    fn current_accessor(&self, address: Address, generation: u64) -> SwapResult<&TokenAccessor> {
        let accessor = self
            .accessors
            .iter()
            .find(|a| a.address() == address)
            .ok_or_else(|| {
                SwapError::not_ready(format!("token {} is not initialized", address))
            })?;

        if accessor.generation() != generation {
            return Err(SwapError::not_ready(format!(
                "{} handle is stale after a network or account change; re-initialize",
                accessor.symbol()
            )));
        }
        Ok(accessor)
    }

    fn address_of(&self, symbol: &str) -> SwapResult<Address> {
        self.config
            .token_by_symbol(symbol)
            .map(|t| t.address)
            .ok_or_else(|| SwapError::config(format!("unknown token symbol {}", symbol)))
    }
}
