//! In-memory collaborators for tests
//!
//! `MockWallet` simulates an ERC-20 chain behind the wallet capability: it decodes
//! `balanceOf`/`allowance`/`decimals` calls, applies `approve` on submission, and
//! executes router transactions as a 1:1 transfer from source to destination.
//! `MockRouter` answers spender/quote requests with calldata the wallet understands.

use crate::errors::{SwapError, SwapResult, WalletError};
use crate::router::{RouteProvider, SwapQuote};
use crate::swaps::{StatusSink, SwapEvent};
use crate::tokens::erc20;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::session::{TransactionReceipt, TransactionRequest, WalletProvider};

/// Router contract; also the spender that needs the allowance
pub const ROUTER: Address = Address::repeat_byte(0x1e);

pub fn token(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

fn word(value: U256) -> Bytes {
    Bytes::from(value.to_be_bytes::<32>().to_vec())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentTransaction {
    pub hash: TxHash,
    pub request: TransactionRequest,
}

#[derive(Default)]
struct ChainState {
    chain_id: u64,
    decimals: HashMap<Address, u8>,
    balances: HashMap<(Address, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
    receipts: HashMap<TxHash, bool>,
    sent: Vec<SentTransaction>,
    approvals: Vec<(Address, Address, U256)>,
    calls: Vec<&'static str>,
    decimals_calls: usize,
    next_hash: u8,
    // Failure injection
    accounts_failure: Option<WalletError>,
    switch_failure: Option<WalletError>,
    switch_lands_on: Option<u64>,
    call_failure: Option<WalletError>,
    send_failure: Option<WalletError>,
    receipt_failure: Option<WalletError>,
    revert_next: bool,
    no_accounts: bool,
}

pub struct MockWallet {
    owner: Address,
    state: Mutex<ChainState>,
}

impl MockWallet {
    pub fn new(chain_id: u64) -> Self {
        Self {
            owner: Address::repeat_byte(0xaa),
            state: Mutex::new(ChainState {
                chain_id,
                next_hash: 1,
                ..Default::default()
            }),
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn deploy_token(&self, address: Address, decimals: u8) {
        self.state.lock().decimals.insert(address, decimals);
    }

    pub fn set_balance(&self, token: Address, holder: Address, amount: U256) {
        self.state.lock().balances.insert((token, holder), amount);
    }

    pub fn balance(&self, token: Address, holder: Address) -> U256 {
        self.state
            .lock()
            .balances
            .get(&(token, holder))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_allowance(&self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.state
            .lock()
            .allowances
            .insert((token, owner, spender), amount);
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.state
            .lock()
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Simulates the user picking another network in the wallet UI
    pub fn set_chain_id(&self, chain_id: u64) {
        self.state.lock().chain_id = chain_id;
    }

    pub fn fail_next_request_accounts(&self, err: WalletError) {
        self.state.lock().accounts_failure = Some(err);
    }

    pub fn return_no_accounts(&self) {
        self.state.lock().no_accounts = true;
    }

    pub fn fail_switch(&self, err: WalletError) {
        self.state.lock().switch_failure = Some(err);
    }

    /// Report success on switch but stay on / land on `chain_id`
    pub fn switch_lands_on(&self, chain_id: u64) {
        self.state.lock().switch_lands_on = Some(chain_id);
    }

    pub fn fail_calls(&self, err: WalletError) {
        self.state.lock().call_failure = Some(err);
    }

    pub fn fail_next_send(&self, err: WalletError) {
        self.state.lock().send_failure = Some(err);
    }

    pub fn fail_next_receipt(&self, err: WalletError) {
        self.state.lock().receipt_failure = Some(err);
    }

    pub fn revert_next(&self) {
        self.state.lock().revert_next = true;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn sent(&self) -> Vec<SentTransaction> {
        self.state.lock().sent.clone()
    }

    pub fn approvals(&self) -> Vec<(Address, Address, U256)> {
        self.state.lock().approvals.clone()
    }

    pub fn decimals_calls(&self) -> usize {
        self.state.lock().decimals_calls
    }

    /// Router calldata: source (20) | destination (20) | amount (32)
    pub fn swap_calldata(source: Address, destination: Address, amount: U256) -> Bytes {
        let mut data = Vec::with_capacity(72);
        data.extend_from_slice(source.as_slice());
        data.extend_from_slice(destination.as_slice());
        data.extend_from_slice(&amount.to_be_bytes::<32>());
        Bytes::from(data)
    }

    fn execute(state: &mut ChainState, from: Address, tx: &TransactionRequest) -> bool {
        let data: &[u8] = tx.data.as_ref();

        if data.len() >= 4 && data[..4] == erc20::approveCall::SELECTOR {
            return match erc20::approveCall::abi_decode(data) {
                Ok(call) => {
                    state
                        .allowances
                        .insert((tx.to, from, call.spender), call.amount);
                    state.approvals.push((tx.to, call.spender, call.amount));
                    true
                }
                Err(_) => false,
            };
        }

        if tx.to == ROUTER && data.len() == 72 {
            let source = Address::from_slice(&data[..20]);
            let destination = Address::from_slice(&data[20..40]);
            let amount = U256::from_be_slice(&data[40..72]);

            let balance = state
                .balances
                .get(&(source, from))
                .copied()
                .unwrap_or_default();
            let allowance = state
                .allowances
                .get(&(source, from, ROUTER))
                .copied()
                .unwrap_or_default();
            if balance < amount || allowance < amount {
                return false;
            }

            state.balances.insert((source, from), balance - amount);
            if allowance != U256::MAX {
                state
                    .allowances
                    .insert((source, from, ROUTER), allowance - amount);
            }
            let credited = state
                .balances
                .get(&(destination, from))
                .copied()
                .unwrap_or_default();
            state.balances.insert((destination, from), credited + amount);
            return true;
        }

        false
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        let mut state = self.state.lock();
        state.calls.push("eth_requestAccounts");
        if let Some(err) = state.accounts_failure.take() {
            return Err(err);
        }
        if state.no_accounts {
            return Ok(Vec::new());
        }
        Ok(vec![self.owner])
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        let mut state = self.state.lock();
        state.calls.push("eth_chainId");
        Ok(state.chain_id)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        let mut state = self.state.lock();
        state.calls.push("wallet_switchEthereumChain");
        if let Some(err) = state.switch_failure.clone() {
            return Err(err);
        }
        state.chain_id = state.switch_lands_on.unwrap_or(chain_id);
        Ok(())
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, WalletError> {
        let mut state = self.state.lock();
        if let Some(err) = state.call_failure.clone() {
            return Err(err);
        }

        let data: &[u8] = data.as_ref();
        if data.len() < 4 {
            return Err(WalletError::Rpc {
                code: -32000,
                message: "execution reverted".to_string(),
            });
        }
        let selector = &data[..4];

        if selector == erc20::balanceOfCall::SELECTOR {
            state.calls.push("balanceOf");
            let call = erc20::balanceOfCall::abi_decode(data)
                .map_err(|e| WalletError::Transport(e.to_string()))?;
            let value = state
                .balances
                .get(&(to, call.owner))
                .copied()
                .unwrap_or_default();
            return Ok(word(value));
        }

        if selector == erc20::allowanceCall::SELECTOR {
            state.calls.push("allowance");
            let call = erc20::allowanceCall::abi_decode(data)
                .map_err(|e| WalletError::Transport(e.to_string()))?;
            let value = state
                .allowances
                .get(&(to, call.owner, call.spender))
                .copied()
                .unwrap_or_default();
            return Ok(word(value));
        }

        if selector == erc20::decimalsCall::SELECTOR {
            state.calls.push("decimals");
            state.decimals_calls += 1;
            let decimals = state.decimals.get(&to).copied().unwrap_or(18);
            return Ok(word(U256::from(decimals)));
        }

        Err(WalletError::Rpc {
            code: -32000,
            message: "execution reverted".to_string(),
        })
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, WalletError> {
        let mut state = self.state.lock();
        let data: &[u8] = tx.data.as_ref();
        let is_approve = data.len() >= 4 && data[..4] == erc20::approveCall::SELECTOR;
        state.calls.push(if is_approve { "approve" } else { "swap" });
        if let Some(err) = state.send_failure.take() {
            return Err(err);
        }

        let hash = TxHash::with_last_byte(state.next_hash);
        state.next_hash = state.next_hash.wrapping_add(1);

        let from = tx.from.unwrap_or(self.owner);
        let success = if std::mem::take(&mut state.revert_next) {
            false
        } else {
            Self::execute(&mut state, from, &tx)
        };
        state.receipts.insert(hash, success);
        state.sent.push(SentTransaction { hash, request: tx });
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TransactionReceipt, WalletError> {
        let mut state = self.state.lock();
        state.calls.push("eth_getTransactionReceipt");
        if let Some(err) = state.receipt_failure.take() {
            return Err(err);
        }
        let success = state
            .receipts
            .get(&hash)
            .copied()
            .ok_or_else(|| WalletError::Transport(format!("unknown transaction {}", hash)))?;
        Ok(TransactionReceipt {
            transaction_hash: hash,
            block_number: Some(100),
            success,
        })
    }
}

#[derive(Default)]
struct RouterState {
    calls: Vec<&'static str>,
    quotes: Vec<(Address, Address, U256, Address, u16)>,
    spender_failure: Option<SwapError>,
    quote_failure: Option<SwapError>,
    gas_hint: Option<u64>,
}

/// Scripted aggregator producing calldata `MockWallet` executes
#[derive(Default)]
pub struct MockRouter {
    state: Mutex<RouterState>,
}

impl MockRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gas_hint(self, gas: u64) -> Self {
        self.state.lock().gas_hint = Some(gas);
        self
    }

    pub fn fail_next_spender(&self, err: SwapError) {
        self.state.lock().spender_failure = Some(err);
    }

    pub fn fail_next_quote(&self, err: SwapError) {
        self.state.lock().quote_failure = Some(err);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().calls.clone()
    }

    pub fn quotes(&self) -> Vec<(Address, Address, U256, Address, u16)> {
        self.state.lock().quotes.clone()
    }
}

#[async_trait]
impl RouteProvider for MockRouter {
    async fn spender_address(&self) -> SwapResult<Address> {
        let mut state = self.state.lock();
        state.calls.push("spender");
        if let Some(err) = state.spender_failure.take() {
            return Err(err);
        }
        Ok(ROUTER)
    }

    async fn quote(
        &self,
        source: Address,
        destination: Address,
        amount: U256,
        from: Address,
        slippage_bps: u16,
    ) -> SwapResult<SwapQuote> {
        let mut state = self.state.lock();
        state.calls.push("quote");
        state
            .quotes
            .push((source, destination, amount, from, slippage_bps));
        if let Some(err) = state.quote_failure.take() {
            return Err(err);
        }
        Ok(SwapQuote {
            to: ROUTER,
            data: MockWallet::swap_calldata(source, destination, amount),
            value: U256::ZERO,
            gas: state.gas_hint,
            gas_price: None,
        })
    }
}

/// Sink keeping every emitted event
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SwapEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SwapEvent> {
        self.events.lock().clone()
    }

    pub fn phases(&self) -> Vec<crate::swaps::SwapPhase> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SwapEvent::Phase { phase, .. } => Some(*phase),
                _ => None,
            })
            .collect()
    }
}

impl StatusSink for RecordingSink {
    fn emit(&self, event: SwapEvent) {
        self.events.lock().push(event);
    }
}
