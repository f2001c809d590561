mod config;
mod domain;
mod engine;
mod error;
mod executor;
mod market;
mod monitoring;
mod pipeline;
mod scanner;
mod validators;
mod web;

use std::time::Duration;

use anyhow::Result;
use tracing::{error, info};

use crate::config::Config;
use crate::engine::Engine;
use crate::validators::{MarketRatioValidator, SafetyValidator, SocialScoreValidator, Validator};

#[tokio::main]
async fn main() -> Result<()> {
    // Load local .env if present (no-op in prod/systemd envs)
    let _ = dotenvy::dotenv();

    monitoring::init_tracing();

    let cfg = Config::from_env()?;
    info!(?cfg, "boot");

    let engine = build_engine(cfg)?;
    if let Err(err) = engine.run().await {
        error!(error = ?err, "engine.fatal");
    }

    Ok(())
}

fn build_engine(cfg: Config) -> Result<Engine> {
    let http_timeout = Duration::from_millis(cfg.http_timeout_ms);
    let http = reqwest::Client::builder().timeout(http_timeout).build()?;
    let settle = web::SettlePolicy::from_millis(cfg.settle_timeout_ms, cfg.settle_poll_ms);

    let feed = scanner::TwitterFeed::new(
        cfg.twitter_api_url.clone(),
        cfg.twitter_bearer_token.clone(),
        http.clone(),
    );
    let scanner = scanner::Scanner::new(Box::new(feed), cfg.feed_query.clone());

    let market = market::DexScreenerClient::new(cfg.dexscreener_api_url.clone(), http.clone());
    let validators: Vec<Box<dyn Validator>> = vec![
        Box::new(MarketRatioValidator::new(
            Box::new(market),
            cfg.ratio_threshold,
        )),
        Box::new(SafetyValidator::new(
            Box::new(web::HttpFormDriver::new(http_timeout)),
            cfg.solsniffer_url.clone(),
            settle,
        )),
        Box::new(SocialScoreValidator::new(
            Box::new(web::HttpFormDriver::new(http_timeout)),
            cfg.tweetscout_url.clone(),
            cfg.social_handle.clone(),
            cfg.min_social_score,
            settle,
        )),
    ];
    let pipeline = pipeline::Pipeline::new(validators);

    let dispatcher = executor::TelegramDispatcher::new(
        cfg.telegram_api_url.clone(),
        cfg.telegram_bot_token.clone(),
        cfg.toxi_chat_id.clone(),
        http,
    );

    Ok(Engine::new(cfg, scanner, pipeline, Box::new(dispatcher)))
}
