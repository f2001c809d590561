use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::TradeCommand;
use crate::error::GatewayError;

/// Fire-and-forget dispatch of a trade command to the actuator. No
/// confirmation that the downstream bot acted on it.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, command: &TradeCommand) -> Result<(), GatewayError>;
}

#[derive(Clone)]
pub struct TelegramDispatcher {
    api_url: String,
    bot_token: Option<String>,
    chat_id: Option<String>,
    http: Client,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

impl TelegramDispatcher {
    pub fn new(
        api_url: String,
        bot_token: Option<String>,
        chat_id: Option<String>,
        http: Client,
    ) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            bot_token,
            chat_id,
            http,
        }
    }
}

#[async_trait]
impl Dispatcher for TelegramDispatcher {
    async fn dispatch(&self, command: &TradeCommand) -> Result<(), GatewayError> {
        let (Some(token), Some(chat_id)) = (self.bot_token.as_deref(), self.chat_id.as_deref())
        else {
            // In dev/test we allow missing messaging config.
            debug!("executor.unconfigured");
            return Ok(());
        };

        let url = format!("{}/bot{}/sendMessage", self.api_url, token);
        let resp = self
            .http
            .post(url)
            .json(&SendMessage {
                chat_id,
                text: &command.text,
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(GatewayError::Dispatch(resp.status().to_string()));
        }

        info!(command = %command.text, "executor.dispatched");
        Ok(())
    }
}
