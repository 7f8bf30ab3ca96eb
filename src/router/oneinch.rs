/// 1inch swap API client
/// `GET {base}/{chain}/approve/spender` and `GET {base}/{chain}/swap`.
use super::types::{ErrorBody, SpenderResponse, SwapResponse};
use super::{RouteProvider, SwapQuote};
use crate::config::SwapConfig;
use crate::errors::{SwapError, SwapResult};
use crate::logger::{self, LogTag};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use std::str::FromStr;
use std::time::Duration;

pub struct OneInchClient {
    client: reqwest::Client,
    base_url: String,
    chain_id: u64,
    api_key: Option<String>,
}

impl OneInchClient {
    pub fn new(
        base_url: impl Into<String>,
        chain_id: u64,
        api_key: Option<String>,
        timeout: Duration,
    ) -> SwapResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SwapError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            chain_id,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn from_config(config: &SwapConfig) -> SwapResult<Self> {
        Self::new(
            config.router_base_url.clone(),
            config.chain_id,
            config.router_api_key.clone(),
            config.router_timeout(),
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.chain_id, path)
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> SwapResult<reqwest::Url> {
        reqwest::Url::parse_with_params(&self.endpoint(path), params).map_err(|e| {
            SwapError::RouteProviderUnavailable {
                message: format!("invalid URL: {}", e),
            }
        })
    }

    /// Returns the status code and body text; transport failures are `RouteProviderUnavailable`
    async fn get(&self, path: &str, params: &[(&str, String)]) -> SwapResult<(u16, String)> {
        let url = self.url(path, params)?;

        if logger::is_debug_enabled(LogTag::Router) {
            logger::debug(LogTag::Router, &format!("GET {}", url));
        }

        let mut request = self.client.get(url).header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key.trim()));
        }

        let response = request
            .send()
            .await
            .map_err(|e| SwapError::RouteProviderUnavailable {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| SwapError::RouteProviderUnavailable {
                message: format!("failed to read response body: {}", e),
            })?;

        Ok((status, text))
    }
}

/// 1inch expects slippage in percent (100 bps -> "1.00")
pub fn slippage_percent(bps: u16) -> String {
    format!("{}.{:02}", bps / 100, bps % 100)
}

/// Query of `GET /swap`, with on-chain estimation disabled
pub(crate) fn swap_params(
    source: Address,
    destination: Address,
    amount: U256,
    from: Address,
    slippage_bps: u16,
) -> Vec<(&'static str, String)> {
    vec![
        ("src", format!("{:#x}", source)),
        ("dst", format!("{:#x}", destination)),
        ("amount", amount.to_string()),
        ("from", format!("{:#x}", from)),
        ("slippage", slippage_percent(slippage_bps)),
        ("disableEstimate", "true".to_string()),
    ]
}

/// Error description from a non-2xx body: `description` when parseable, raw text otherwise
pub fn parse_error_body(status: u16, text: &str) -> SwapError {
    let description = serde_json::from_str::<ErrorBody>(text)
        .ok()
        .and_then(|body| body.description)
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| text.trim().to_string());

    SwapError::RouteProviderError {
        status,
        description,
    }
}

fn check_status(status: u16, text: &str) -> SwapResult<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(parse_error_body(status, text))
    }
}

fn malformed(status: u16, what: &str, err: impl std::fmt::Display) -> SwapError {
    SwapError::RouteProviderError {
        status,
        description: format!("malformed {} response: {}", what, err),
    }
}

pub fn parse_spender_response(status: u16, text: &str) -> SwapResult<Address> {
    check_status(status, text)?;
    let body: SpenderResponse =
        serde_json::from_str(text).map_err(|e| malformed(status, "spender", e))?;
    Ok(body.address)
}

pub fn parse_swap_response(status: u16, text: &str) -> SwapResult<SwapQuote> {
    check_status(status, text)?;
    let body: SwapResponse = serde_json::from_str(text).map_err(|e| malformed(status, "swap", e))?;
    let tx = body.tx;

    let value = match tx.value.as_deref() {
        Some(raw) => U256::from_str(raw).map_err(|e| malformed(status, "swap value", e))?,
        None => U256::ZERO,
    };

    // A zero gas hint carries no information; leave estimation to the wallet
    let gas = match tx.gas.as_deref() {
        Some(raw) => Some(
            raw.parse::<u64>()
                .map_err(|e| malformed(status, "swap gas", e))?,
        )
        .filter(|g| *g > 0),
        None => None,
    };

    let gas_price = match tx.gas_price.as_deref() {
        Some(raw) => Some(U256::from_str(raw).map_err(|e| malformed(status, "swap gasPrice", e))?)
            .filter(|p| !p.is_zero()),
        None => None,
    };

    Ok(SwapQuote {
        to: tx.to,
        data: tx.data,
        value,
        gas,
        gas_price,
    })
}

#[async_trait]
impl RouteProvider for OneInchClient {
    async fn spender_address(&self) -> SwapResult<Address> {
        let (status, text) = self.get("approve/spender", &[]).await?;
        let spender = parse_spender_response(status, &text)?;
        logger::info(LogTag::Router, &format!("Router spender: {}", spender));
        Ok(spender)
    }

    async fn quote(
        &self,
        source: Address,
        destination: Address,
        amount: U256,
        from: Address,
        slippage_bps: u16,
    ) -> SwapResult<SwapQuote> {
        logger::info(
            LogTag::Router,
            &format!(
                "Requesting route {} -> {} for {} (slippage {}%)",
                source,
                destination,
                amount,
                slippage_percent(slippage_bps)
            ),
        );

        let params = swap_params(source, destination, amount, from, slippage_bps);
        let (status, text) = self.get("swap", &params).await?;
        let quote = parse_swap_response(status, &text)?;

        if logger::is_debug_enabled(LogTag::Router) {
            logger::debug(
                LogTag::Router,
                &format!(
                    "Route to {} value {} gas {:?} gasPrice {:?}",
                    quote.to, quote.value, quote.gas, quote.gas_price
                ),
            );
        }
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slippage_is_rendered_as_percent() {
        assert_eq!(slippage_percent(100), "1.00");
        assert_eq!(slippage_percent(50), "0.50");
        assert_eq!(slippage_percent(1_234), "12.34");
    }

    #[test]
    fn error_description_is_extracted() {
        let err = parse_error_body(
            400,
            r#"{"error":"Bad Request","description":"insufficient liquidity","statusCode":400}"#,
        );
        assert_eq!(
            err,
            SwapError::RouteProviderError {
                status: 400,
                description: "insufficient liquidity".to_string()
            }
        );
    }

    #[test]
    fn generic_error_title_is_not_used_as_description() {
        let body = r#"{"error":"Bad Request","statusCode":400}"#;
        let err = parse_error_body(400, body);
        assert_eq!(
            err,
            SwapError::RouteProviderError {
                status: 400,
                description: body.to_string()
            }
        );
    }

    #[test]
    fn unparseable_error_body_is_kept_raw() {
        let err = parse_error_body(502, "Bad Gateway\n");
        assert_eq!(
            err,
            SwapError::RouteProviderError {
                status: 502,
                description: "Bad Gateway".to_string()
            }
        );
    }

    #[test]
    fn spender_is_parsed() {
        let spender = parse_spender_response(
            200,
            r#"{"address":"0x111111125421ca6dc452d289314280a0f8842a65"}"#,
        )
        .unwrap();
        assert_eq!(
            spender,
            Address::from_str("0x111111125421ca6dc452d289314280a0f8842a65").unwrap()
        );
    }

    #[test]
    fn swap_fields_accept_strings_and_numbers() {
        let quote = parse_swap_response(
            200,
            r#"{
                "toAmount": "998",
                "tx": {
                    "from": "0x00000000000000000000000000000000000000aa",
                    "to": "0x111111125421ca6dc452d289314280a0f8842a65",
                    "data": "0x12aa3caf",
                    "value": "0",
                    "gas": 250000,
                    "gasPrice": "3000000000"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(quote.data.as_ref(), &[0x12, 0xaa, 0x3c, 0xaf]);
        assert_eq!(quote.value, U256::ZERO);
        assert_eq!(quote.gas, Some(250_000));
        assert_eq!(quote.gas_price, Some(U256::from(3_000_000_000u64)));
    }

    #[test]
    fn zero_gas_hint_counts_as_absent() {
        let quote = parse_swap_response(
            200,
            r#"{"tx":{"to":"0x111111125421ca6dc452d289314280a0f8842a65","data":"0x","value":"0","gas":0}}"#,
        )
        .unwrap();
        assert_eq!(quote.gas, None);
        assert_eq!(quote.gas_price, None);
    }

    #[test]
    fn non_success_swap_status_is_classified() {
        let err = parse_swap_response(429, r#"{"description":"rate limited"}"#).unwrap_err();
        assert!(matches!(err, SwapError::RouteProviderError { status: 429, .. }));
    }

    #[test]
    fn endpoint_includes_chain_id() {
        let client = OneInchClient::new(
            "https://api.1inch.dev/swap/v6.0/",
            56,
            Some("  ".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.endpoint("approve/spender"),
            "https://api.1inch.dev/swap/v6.0/56/approve/spender"
        );
        assert!(client.api_key.is_none());
    }

    #[test]
    fn swap_query_disables_estimation_and_keeps_exact_amount() {
        let client = OneInchClient::new(
            "https://api.1inch.dev/swap/v6.0",
            56,
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        let amount = U256::from(1_000u64) * U256::from(10u64).pow(U256::from(18u64));
        let params = swap_params(
            Address::repeat_byte(0x11),
            Address::repeat_byte(0x22),
            amount,
            Address::repeat_byte(0xaa),
            100,
        );

        let url = client.url("swap", &params).unwrap();
        assert!(url.path().ends_with("/56/swap"));
        let query = url.query().unwrap_or_default();
        assert!(query.contains("disableEstimate=true"));
        assert!(query.contains("amount=1000000000000000000000"));
        assert!(query.contains("slippage=1.00"));
        assert!(query.contains("src=0x1111111111111111111111111111111111111111"));
    }
}
