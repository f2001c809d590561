use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::Candidate;
use crate::error::GatewayError;

/// Raw record texts from the signal feed.
#[async_trait]
pub trait SignalFeed: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<String>, GatewayError>;
}

#[derive(Clone)]
pub struct TwitterFeed {
    search_url: String,
    bearer_token: Option<String>,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Tweet>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    text: String,
}

impl TwitterFeed {
    pub fn new(search_url: String, bearer_token: Option<String>, http: Client) -> Self {
        Self {
            search_url,
            bearer_token,
            http,
        }
    }
}

#[async_trait]
impl SignalFeed for TwitterFeed {
    async fn search(&self, query: &str) -> Result<Vec<String>, GatewayError> {
        let mut req = self.http.get(&self.search_url).query(&[("query", query)]);
        if let Some(token) = self.bearer_token.as_deref() {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?.error_for_status()?;
        let body: SearchResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        Ok(body.data.into_iter().map(|t| t.text).collect())
    }
}

/// Pulls raw records from the feed and extracts candidate addresses.
pub struct Scanner {
    feed: Box<dyn SignalFeed>,
    query: String,
    address_pattern: Regex,
}

impl Scanner {
    pub fn new(feed: Box<dyn SignalFeed>, query: String) -> Self {
        // 40-hex-char EVM-style addresses embedded in record text.
        let address_pattern =
            Regex::new(r"0x[a-fA-F0-9]{40}").expect("address pattern is valid");
        Self {
            feed,
            query,
            address_pattern,
        }
    }

    /// A fresh finite batch of candidates. Duplicates are possible;
    /// downstream stages are idempotent.
    ///
    /// Any feed fault degrades to an empty batch so the run becomes a
    /// no-op instead of aborting.
    pub async fn fetch_candidates(&self) -> Vec<Candidate> {
        let records = match self.feed.search(&self.query).await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, query = %self.query, "scanner.feed_failed");
                return Vec::new();
            }
        };

        let candidates: Vec<Candidate> = records
            .iter()
            .flat_map(|text| self.extract_addresses(text))
            .collect();

        info!(
            records = records.len(),
            candidates = candidates.len(),
            "scanner.candidates"
        );
        candidates
    }

    fn extract_addresses(&self, text: &str) -> Vec<Candidate> {
        self.address_pattern
            .find_iter(text)
            .map(|m| Candidate(m.as_str().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticFeed(Vec<String>);

    #[async_trait]
    impl SignalFeed for StaticFeed {
        async fn search(&self, _query: &str) -> Result<Vec<String>, GatewayError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenFeed;

    #[async_trait]
    impl SignalFeed for BrokenFeed {
        async fn search(&self, _query: &str) -> Result<Vec<String>, GatewayError> {
            Err(GatewayError::MalformedResponse("truncated body".into()))
        }
    }

    fn scanner(feed: Box<dyn SignalFeed>) -> Scanner {
        Scanner::new(feed, "from:Monitor_fi".into())
    }

    #[tokio::test]
    async fn extracts_addresses_from_record_text() {
        let feed = StaticFeed(vec![
            "ape into 0x00000000000000000000000000000000000000aa now".into(),
            "no address here".into(),
            "two: 0x00000000000000000000000000000000000000bb 0x00000000000000000000000000000000000000cc".into(),
        ]);
        let got = scanner(Box::new(feed)).fetch_candidates().await;
        assert_eq!(
            got,
            vec![
                Candidate("0x00000000000000000000000000000000000000aa".into()),
                Candidate("0x00000000000000000000000000000000000000bb".into()),
                Candidate("0x00000000000000000000000000000000000000cc".into()),
            ]
        );
    }

    #[tokio::test]
    async fn short_hex_runs_are_ignored() {
        let feed = StaticFeed(vec!["0x0000000000000000000000000000000000000a".into()]);
        let got = scanner(Box::new(feed)).fetch_candidates().await;
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn feed_fault_degrades_to_empty_batch() {
        let got = scanner(Box::new(BrokenFeed)).fetch_candidates().await;
        assert!(got.is_empty());
    }
}
