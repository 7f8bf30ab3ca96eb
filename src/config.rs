/// Swap configuration - static parameters supplied at construction
/// Constants carry the defaults; `SwapConfig` bundles them with the token list.
use crate::errors::{SwapError, SwapResult};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

// =============================================================================
// NETWORK CONFIGURATION
// =============================================================================

/// BNB Smart Chain mainnet
pub const DEFAULT_CHAIN_ID: u64 = 56;

// =============================================================================
// ROUTER CONFIGURATION
// =============================================================================

/// 1inch swap API base URL; the chain id is appended per request
pub const DEFAULT_ROUTER_BASE_URL: &str = "https://api.1inch.dev/swap/v6.0";

/// Slippage tolerance sent with every quote (basis points)
pub const DEFAULT_SLIPPAGE_BPS: u16 = 100;

/// Upper bound accepted by `SwapConfig::validate` (50%)
pub const MAX_SLIPPAGE_BPS: u16 = 5_000;

/// Router HTTP request timeout (seconds)
pub const ROUTER_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// WALLET RPC CONFIGURATION
// =============================================================================

/// Wallet JSON-RPC request timeout (seconds); wallet prompts block on the user
pub const WALLET_TIMEOUT_SECS: u64 = 300;

/// Delay between receipt polls while awaiting inclusion (milliseconds)
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 2_000;

/// One token of interest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub symbol: String,
    pub address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    #[serde(default = "default_router_base_url")]
    pub router_base_url: String,
    /// Bearer token for the hosted aggregator API
    #[serde(default)]
    pub router_api_key: Option<String>,
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u16,
    #[serde(default = "default_router_timeout_secs")]
    pub router_timeout_secs: u64,
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

fn default_router_base_url() -> String {
    DEFAULT_ROUTER_BASE_URL.to_string()
}

fn default_slippage_bps() -> u16 {
    DEFAULT_SLIPPAGE_BPS
}

fn default_router_timeout_secs() -> u64 {
    ROUTER_TIMEOUT_SECS
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            router_base_url: DEFAULT_ROUTER_BASE_URL.to_string(),
            router_api_key: None,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            router_timeout_secs: ROUTER_TIMEOUT_SECS,
            tokens: Vec::new(),
        }
    }
}

impl SwapConfig {
    pub fn with_token(mut self, symbol: impl Into<String>, address: Address) -> Self {
        self.tokens.push(TokenConfig {
            symbol: symbol.into(),
            address,
        });
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> SwapResult<Self> {
        let config: SwapConfig = toml::from_str(raw)
            .map_err(|e| SwapError::config(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SwapResult<()> {
        if self.tokens.len() < 2 {
            return Err(SwapError::config("at least two tokens must be configured"));
        }

        let mut symbols = HashSet::new();
        let mut addresses = HashSet::new();
        for token in &self.tokens {
            if token.symbol.trim().is_empty() {
                return Err(SwapError::config("token symbol must not be empty"));
            }
            if !symbols.insert(token.symbol.to_uppercase()) {
                return Err(SwapError::config(format!("duplicate token symbol {}", token.symbol)));
            }
            if token.address == Address::ZERO || !addresses.insert(token.address) {
                return Err(SwapError::config(format!(
                    "invalid or duplicate address for {}",
                    token.symbol
                )));
            }
        }

        if self.slippage_bps == 0 || self.slippage_bps > MAX_SLIPPAGE_BPS {
            return Err(SwapError::config(format!(
                "slippage must be within 1..={} bps, got {}",
                MAX_SLIPPAGE_BPS, self.slippage_bps
            )));
        }

        validate_router_url(&self.router_base_url)
    }

    pub fn token_by_symbol(&self, symbol: &str) -> Option<&TokenConfig> {
        self.tokens
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn router_timeout(&self) -> Duration {
        Duration::from_secs(self.router_timeout_secs)
    }
}

/// https anywhere; plain http only for a loopback host
fn validate_router_url(raw: &str) -> SwapResult<()> {
    let url = reqwest::Url::parse(raw)
        .map_err(|e| SwapError::config(format!("invalid router_base_url {}: {}", raw, e)))?;

    let allowed = match url.scheme() {
        "https" => true,
        "http" => matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]")),
        _ => false,
    };
    if !allowed {
        return Err(SwapError::config(
            "router_base_url must use https (or http://localhost for local testing)",
        ));
    }
    Ok(())
}
