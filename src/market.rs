use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::GatewayError;

/// Holder count and market capitalization for the best pair found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairStats {
    pub holders: u64,
    pub market_cap: f64,
}

/// Market lookup for a candidate address. `Ok(None)` covers both "no
/// pair found" and an unusable record shape; faults reaching the
/// service are `Err`.
#[async_trait]
pub trait MarketData: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<Option<PairStats>, GatewayError>;
}

#[derive(Clone)]
pub struct DexScreenerClient {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    pairs: Vec<PairRecord>,
}

#[derive(Debug, Deserialize)]
struct PairRecord {
    holders: Option<u64>,
    mcap: Option<f64>,
}

impl DexScreenerClient {
    pub fn new(base_url: String, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[async_trait]
impl MarketData for DexScreenerClient {
    async fn lookup(&self, address: &str) -> Result<Option<PairStats>, GatewayError> {
        let resp = self
            .http
            .get(&self.base_url)
            .query(&[("q", address)])
            .send()
            .await?
            .error_for_status()?;

        let body: SearchResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        // First pair wins, matching the upstream search ordering.
        let Some(record) = body.pairs.into_iter().next() else {
            return Ok(None);
        };

        match (record.holders, record.mcap) {
            (Some(holders), Some(market_cap)) => Ok(Some(PairStats { holders, market_cap })),
            _ => {
                debug!(address, "market.pair_missing_fields");
                Ok(None)
            }
        }
    }
}
