//! Quote providers: Finnhub for equities, Binance for crypto pairs.
//!
//! Every failure is swallowed here and turned into the sentinel quote.

use crate::config::ProviderConfig;
use crate::models::{AssetClass, Quote, Symbol};
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

const USER_AGENT: &str = concat!("pricewatch/", env!("CARGO_PKG_VERSION"));

/// Anything that can turn a symbol into a quote without failing.
pub trait QuoteSource: Send + Sync + 'static {
    fn fetch_quote(&self, symbol: &Symbol) -> impl Future<Output = Quote> + Send;
}

/// Why a single fetch produced no data. Never leaves this module.
#[derive(Debug, Error)]
enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {0}")]
    Status(StatusCode),
    #[error("provider has no price for this symbol")]
    NoData,
}

/// HTTP quote client shared by every fetch task.
#[derive(Debug, Clone)]
pub struct QuoteClient {
    client: Client,
    equity_url: String,
    crypto_url: String,
    api_key: String,
}

impl QuoteClient {
    /// Create a client with its own connection pool and per-call timeout.
    pub fn new(providers: &ProviderConfig, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, providers, api_key))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(client: Client, providers: &ProviderConfig, api_key: String) -> Self {
        Self {
            client,
            equity_url: providers.equity_url.clone(),
            crypto_url: providers.crypto_url.clone(),
            api_key,
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn fetch_equity(&self, symbol: &Symbol) -> Result<Quote, FetchError> {
        let url = format!(
            "{}?symbol={}&token={}",
            self.equity_url,
            urlencoding::encode(symbol.as_str()),
            urlencoding::encode(&self.api_key)
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let data: FinnhubQuote = response.json().await?;
        data.into_quote().ok_or(FetchError::NoData)
    }

    async fn fetch_crypto(&self, symbol: &Symbol) -> Result<Quote, FetchError> {
        let url = format!(
            "{}?symbol={}",
            self.crypto_url,
            urlencoding::encode(symbol.as_str())
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let data: BinanceTicker = response.json().await?;
        Ok(data.into_quote())
    }
}

impl QuoteSource for QuoteClient {
    async fn fetch_quote(&self, symbol: &Symbol) -> Quote {
        let result = match symbol.asset_class() {
            AssetClass::Equity if !self.has_api_key() => {
                trace!(%symbol, "no API key, skipping equity fetch");
                return Quote::UNAVAILABLE;
            }
            AssetClass::Equity => self.fetch_equity(symbol).await,
            AssetClass::Crypto => self.fetch_crypto(symbol).await,
        };

        match result {
            Ok(quote) => quote,
            Err(e) => {
                debug!(%symbol, error = %e, "quote unavailable");
                Quote::UNAVAILABLE
            }
        }
    }
}

// Provider response structures

/// Finnhub `/quote` body. Unknown symbols come back as all zeros or nulls.
#[derive(Debug, Deserialize)]
struct FinnhubQuote {
    #[serde(default, rename = "c")]
    current: Option<f64>,
    #[serde(default, rename = "dp")]
    change_percent: Option<f64>,
}

impl FinnhubQuote {
    fn into_quote(self) -> Option<Quote> {
        let price = self.current.unwrap_or(0.0);
        if price == 0.0 {
            return None;
        }
        Some(Quote::new(price, self.change_percent.unwrap_or(0.0)))
    }
}

/// Binance `/ticker/24hr` body. Numbers arrive as strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinanceTicker {
    #[serde(default)]
    last_price: String,
    #[serde(default)]
    price_change_percent: String,
}

impl BinanceTicker {
    fn into_quote(self) -> Quote {
        Quote::new(
            parse_decimal(&self.last_price),
            parse_decimal(&self.price_change_percent),
        )
    }
}

fn parse_decimal(s: &str) -> f64 {
    s.trim().parse().unwrap_or(0.0)
}
