//! Price oracle client
//!
//! One unauthenticated GET against a Binance-style ticker endpoint
//! (`?symbol=ETHUSDT` → `{"symbol":"ETHUSDT","price":"2000.00"}`). No retry,
//! no caching, and the request never goes through a wallet proxy.

use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Source of the current exchange rate for a currency pair
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Price of one unit of the pair's base currency in its quote currency
    async fn fetch_price(&self, symbol: &str) -> Result<f64>;
}

#[derive(Debug, Deserialize)]
struct TickerResponse {
    price: Option<Value>,
}

/// Extract the `price` field from a ticker body
///
/// Binance sends the price as a decimal string; plain JSON numbers are
/// accepted too.
pub fn parse_ticker(body: &str) -> Result<f64> {
    let ticker: TickerResponse = serde_json::from_str(body)
        .map_err(|e| Error::Oracle(format!("Unparseable ticker response: {}", e)))?;

    let price = match ticker.price {
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::Oracle(format!("Non-numeric price {:?}", s)))?,
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| Error::Oracle(format!("Price {} is not representable", n)))?,
        Some(other) => {
            return Err(Error::Oracle(format!("Non-numeric price {}", other)));
        }
        None => return Err(Error::Oracle("Ticker response has no price".to_string())),
    };

    Ok(price)
}

/// Binance public ticker client
pub struct BinanceOracle {
    client: Client,
    base_url: String,
}

impl BinanceOracle {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PriceOracle for BinanceOracle {
    async fn fetch_price(&self, symbol: &str) -> Result<f64> {
        let url = format!("{}?symbol={}", self.base_url, symbol);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Oracle(format!("Ticker request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Oracle(format!(
                "Ticker endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Oracle(format!("Failed to read ticker body: {}", e)))?;
        let price = parse_ticker(&body)?;

        tracing::debug!(symbol, price, "Fetched price");
        Ok(price)
    }
}

/// Oracle pinned to a fixed price, for offline dry runs
#[derive(Debug, Clone, Copy)]
pub struct StaticPriceOracle(pub f64);

#[async_trait]
impl PriceOracle for StaticPriceOracle {
    async fn fetch_price(&self, _symbol: &str) -> Result<f64> {
        Ok(self.0)
    }
}
