//! Chain/account session
//! Tracks the wallet's active network and account and owns the signing capability.
//! State changes only through `connect`, `ensure_network` and the two event intakes.

pub mod rpc_wallet;
pub mod wallet;

pub use rpc_wallet::JsonRpcWallet;
pub use wallet::{TransactionReceipt, TransactionRequest, WalletProvider};

use crate::errors::{SwapError, SwapResult, WalletAction, WalletError};
use crate::logger::{self, LogTag};
use alloy_primitives::{Address, TxHash};
use parking_lot::RwLock;
use std::sync::Arc;

/// Wallet notifications fed in by the embedder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(u64),
}

/// What an event did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTransition {
    Disconnected,
    AccountAdopted { account: Address, changed: bool },
    NetworkChanged {
        from: Option<u64>,
        to: u64,
        on_target: bool,
    },
}

#[derive(Debug, Clone, Default)]
struct SessionState {
    network_id: Option<u64>,
    account: Option<Address>,
    generation: u64,
}

/// Immutable view captured by a swap attempt at its start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub account: Option<Address>,
    pub network_id: Option<u64>,
    pub generation: u64,
    pub can_sign: bool,
}

pub struct Session {
    wallet: Option<Arc<dyn WalletProvider>>,
    target_chain_id: u64,
    state: RwLock<SessionState>,
}

impl Session {
    /// `wallet` is `None` when the environment offers no wallet capability
    pub fn new(wallet: Option<Arc<dyn WalletProvider>>, target_chain_id: u64) -> Self {
        if wallet.is_none() {
            logger::warning(
                LogTag::Session,
                "No wallet provider detected; connect will fail until one is available",
            );
        }
        Self {
            wallet,
            target_chain_id,
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn wallet(&self) -> SwapResult<Arc<dyn WalletProvider>> {
        self.wallet.clone().ok_or(SwapError::ProviderUnavailable)
    }

    pub fn target_chain_id(&self) -> u64 {
        self.target_chain_id
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read();
        SessionSnapshot {
            account: state.account,
            network_id: state.network_id,
            generation: state.generation,
            can_sign: state.account.is_some() && state.network_id == Some(self.target_chain_id),
        }
    }

    pub fn can_sign(&self) -> bool {
        self.snapshot().can_sign
    }

    pub fn account(&self) -> Option<Address> {
        self.state.read().account
    }

    pub fn network_id(&self) -> Option<u64> {
        self.state.read().network_id
    }

    /// Bumped whenever previously initialized token handles become stale
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// Request account access and learn the active network
    pub async fn connect(&self) -> SwapResult<Address> {
        let wallet = self.wallet()?;

        logger::info(LogTag::Session, "Requesting wallet account access...");
        let accounts = wallet.request_accounts().await.map_err(|e| match e {
            WalletError::UserRejected => SwapError::UserDeclined {
                action: WalletAction::Connect,
            },
            other => SwapError::from(other),
        })?;

        let account = match self.on_accounts_changed(&accounts) {
            SessionTransition::AccountAdopted { account, .. } => account,
            _ => {
                return Err(SwapError::UserDeclined {
                    action: WalletAction::Connect,
                })
            }
        };

        let chain_id = wallet.chain_id().await?;
        self.record_network(chain_id);

        logger::info(
            LogTag::Session,
            &format!("Connected {} on chain id {}", account, chain_id),
        );
        Ok(account)
    }

    /// Make sure the wallet is on `target`, asking it to switch when it is not
    ///
    /// No automatic network registration is attempted when the wallet does not
    /// know the chain.
    pub async fn ensure_network(&self, target: u64) -> SwapResult<()> {
        let wallet = self.wallet()?;

        let current = wallet.chain_id().await?;
        self.record_network(current);
        if current == target {
            return Ok(());
        }

        logger::warning(
            LogTag::Session,
            &format!(
                "Wallet is on chain id {}, requesting switch to {}",
                current, target
            ),
        );

        wallet.switch_chain(target).await.map_err(|e| match e {
            WalletError::UnknownChain => SwapError::NetworkUnknownToWallet { chain_id: target },
            WalletError::UserRejected => SwapError::SwitchDeclined {
                chain_id: target,
                reason: "user rejected the switch".to_string(),
            },
            other => SwapError::SwitchDeclined {
                chain_id: target,
                reason: other.to_string(),
            },
        })?;

        let switched = wallet.chain_id().await?;
        self.record_network(switched);
        if switched != target {
            return Err(SwapError::NetworkMismatch {
                expected: target,
                actual: Some(switched),
            });
        }

        logger::info(LogTag::Session, &format!("Switched to chain id {}", target));
        Ok(())
    }

    pub fn handle_event(&self, event: SessionEvent) -> SessionTransition {
        match event {
            SessionEvent::AccountsChanged(accounts) => self.on_accounts_changed(&accounts),
            SessionEvent::ChainChanged(chain_id) => self.on_chain_changed(chain_id),
        }
    }

    pub fn on_accounts_changed(&self, accounts: &[Address]) -> SessionTransition {
        let mut state = self.state.write();
        match accounts.first() {
            None => {
                state.account = None;
                state.generation += 1;
                drop(state);
                logger::warning(LogTag::Session, "Wallet disconnected or no account selected");
                SessionTransition::Disconnected
            }
            Some(&account) => {
                let changed = state.account != Some(account);
                state.account = Some(account);
                drop(state);
                if changed {
                    logger::info(LogTag::Session, &format!("Active account is now {}", account));
                }
                SessionTransition::AccountAdopted { account, changed }
            }
        }
    }

    /// Any chain change invalidates token handles built for the previous network
    pub fn on_chain_changed(&self, chain_id: u64) -> SessionTransition {
        let mut state = self.state.write();
        let from = state.network_id;
        state.network_id = Some(chain_id);
        state.generation += 1;
        drop(state);

        let on_target = chain_id == self.target_chain_id;
        logger::info(
            LogTag::Session,
            &format!(
                "Network changed {:?} -> {}{}",
                from,
                chain_id,
                if on_target { "" } else { " (not the target network)" }
            ),
        );
        SessionTransition::NetworkChanged {
            from,
            to: chain_id,
            on_target,
        }
    }

    /// First observation only fills the id; a different id counts as a chain change
    fn record_network(&self, chain_id: u64) {
        let known = self.state.read().network_id;
        match known {
            None => self.state.write().network_id = Some(chain_id),
            Some(id) if id != chain_id => {
                self.on_chain_changed(chain_id);
            }
            Some(_) => {}
        }
    }

    /// Sign and broadcast from `from`, which must still be the active account
    ///
    /// An attempt passes the account captured at its start; if the wallet switched
    /// accounts since, the transaction is refused rather than signed by the new one.
    pub async fn send_transaction(
        &self,
        from: Address,
        mut request: TransactionRequest,
    ) -> SwapResult<PendingTransaction> {
        let wallet = self.wallet()?;
        match self.account() {
            Some(active) if active == from => {}
            Some(active) => {
                return Err(SwapError::not_ready(format!(
                    "active account changed from {} to {}",
                    from, active
                )))
            }
            None => return Err(SwapError::not_ready("no connected account")),
        }
        request.from = Some(from);

        let hash = wallet
            .send_transaction(request)
            .await
            .map_err(|e| SwapError::from_transaction(e, None))?;

        logger::info(LogTag::Session, &format!("Transaction broadcast: {}", hash));
        Ok(PendingTransaction { hash, wallet })
    }
}

/// Broadcast transaction awaiting inclusion
pub struct PendingTransaction {
    hash: TxHash,
    wallet: Arc<dyn WalletProvider>,
}

impl std::fmt::Debug for PendingTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingTransaction")
            .field("hash", &self.hash)
            .finish_non_exhaustive()
    }
}

impl PendingTransaction {
    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// Block until included; a reverted receipt is a failure
    pub async fn wait(self) -> SwapResult<TransactionReceipt> {
        let receipt = self
            .wallet
            .wait_for_receipt(self.hash)
            .await
            .map_err(|e| SwapError::from_receipt(e, self.hash))?;

        if !receipt.success {
            return Err(SwapError::from_transaction(
                WalletError::Reverted {
                    hash: self.hash,
                    reason: None,
                },
                Some(self.hash),
            ));
        }
        Ok(receipt)
    }
}
