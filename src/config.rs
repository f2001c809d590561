use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Signal feed
    pub twitter_bearer_token: Option<String>,
    pub twitter_api_url: String,
    pub feed_query: String,

    // Market data
    pub dexscreener_api_url: String,

    // Web-driven probes
    pub solsniffer_url: String,
    pub tweetscout_url: String,
    pub social_handle: String,

    // Messaging dispatch
    pub telegram_api_url: String,
    pub telegram_bot_token: Option<String>,
    pub toxi_chat_id: Option<String>,

    // Screening thresholds
    pub ratio_threshold: f64,
    pub min_social_score: u32,

    // Timing
    /// Reserved for transaction pacing; recognized but not consulted yet.
    pub max_tx_delay_ms: u64,
    pub settle_timeout_ms: u64,
    pub settle_poll_ms: u64,
    pub http_timeout_ms: u64,

    // Runtime
    pub dry_run: bool,
}

fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().map(|s| s.trim().to_lowercase()) {
        None => default,
        Some(v) if v.is_empty() => default,
        Some(v) if v == "1" || v == "true" || v == "yes" || v == "y" || v == "on" => true,
        Some(v) if v == "0" || v == "false" || v == "no" || v == "n" || v == "off" => false,
        Some(_) => default,
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|x| x.parse().ok())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Signal feed
        let twitter_bearer_token = std::env::var("TWITTER_BEARER_TOKEN").ok();
        let twitter_api_url = std::env::var("TWITTER_API_URL")
            .unwrap_or_else(|_| "https://api.twitter.com/2/tweets/search/recent".to_string());
        let feed_query =
            std::env::var("FEED_QUERY").unwrap_or_else(|_| "from:Monitor_fi".to_string());

        // Market data
        let dexscreener_api_url = std::env::var("DEXSCREENER_API_URL")
            .unwrap_or_else(|_| "https://api.dexscreener.com/latest/dex/search".to_string());

        // Web-driven probes
        let solsniffer_url = std::env::var("SOLSNIFFER_URL")
            .unwrap_or_else(|_| "https://solsniffer.com".to_string());
        let tweetscout_url = std::env::var("TWEETSCOUT_URL")
            .unwrap_or_else(|_| "https://tweetscout.io".to_string());
        let social_handle =
            std::env::var("SOCIAL_HANDLE").unwrap_or_else(|_| "@tokenTwitterHandle".to_string());

        // Messaging dispatch
        let telegram_api_url = std::env::var("TELEGRAM_API_URL")
            .unwrap_or_else(|_| "https://api.telegram.org".to_string());
        let telegram_bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok();
        let toxi_chat_id = std::env::var("TOXI_CHAT_ID").ok();

        // Screening thresholds
        let ratio_threshold = env_parse::<f64>("RATIO_THRESHOLD").unwrap_or(0.05);
        let min_social_score = env_parse::<u32>("MIN_SOCIAL_SCORE").unwrap_or(300);

        if ratio_threshold <= 0.0 {
            return Err(anyhow!("RATIO_THRESHOLD must be positive"));
        }

        // Timing
        let max_tx_delay_ms = env_parse::<u64>("MAX_TX_DELAY_MS").unwrap_or(5_000);
        let settle_timeout_ms = env_parse::<u64>("SETTLE_TIMEOUT_MS").unwrap_or(5_000);
        let settle_poll_ms = env_parse::<u64>("SETTLE_POLL_MS").unwrap_or(250);
        let http_timeout_ms = env_parse::<u64>("HTTP_TIMEOUT_MS").unwrap_or(10_000);

        if settle_poll_ms == 0 || settle_poll_ms > settle_timeout_ms {
            return Err(anyhow!("SETTLE_POLL_MS must be in 1..=SETTLE_TIMEOUT_MS"));
        }

        // Runtime
        let dry_run = env_bool("DRY_RUN", true);

        if !dry_run && (telegram_bot_token.is_none() || toxi_chat_id.is_none()) {
            return Err(anyhow!(
                "TELEGRAM_BOT_TOKEN and TOXI_CHAT_ID are required when DRY_RUN=false"
            ));
        }

        Ok(Self {
            twitter_bearer_token,
            twitter_api_url,
            feed_query,
            dexscreener_api_url,
            solsniffer_url,
            tweetscout_url,
            social_handle,
            telegram_api_url,
            telegram_bot_token,
            toxi_chat_id,
            ratio_threshold,
            min_social_score,
            max_tx_delay_ms,
            settle_timeout_ms,
            settle_poll_ms,
            http_timeout_ms,
            dry_run,
        })
    }
}
