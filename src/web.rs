use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::time::{sleep, Instant};

use crate::error::GatewayError;

/// Opens a scraping session against an external page. Each validator
/// invocation gets its own session; dropping the session releases the
/// underlying handle.
#[async_trait]
pub trait WebDriver: Send + Sync {
    async fn open(&self, url: &str) -> Result<Box<dyn WebSession>, GatewayError>;
}

/// One live page interaction.
#[async_trait]
pub trait WebSession: Send {
    async fn submit_form(&mut self, field: &str, value: &str) -> Result<(), GatewayError>;
    async fn page_text(&mut self) -> Result<String, GatewayError>;
}

/// How long to keep polling a page for its result to render.
#[derive(Debug, Clone, Copy)]
pub struct SettlePolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl SettlePolicy {
    pub fn from_millis(timeout_ms: u64, poll_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            poll_interval: Duration::from_millis(poll_ms),
        }
    }
}

/// Polls the session until `extract` yields a value or the settle
/// window closes.
pub async fn wait_for<T>(
    session: &mut dyn WebSession,
    settle: SettlePolicy,
    extract: impl Fn(&str) -> Option<T>,
) -> Result<T, GatewayError> {
    let deadline = Instant::now() + settle.timeout;
    loop {
        let text = session.page_text().await?;
        if let Some(value) = extract(&text) {
            return Ok(value);
        }
        if Instant::now() + settle.poll_interval > deadline {
            return Err(GatewayError::SettleTimeout(settle.timeout));
        }
        sleep(settle.poll_interval).await;
    }
}

/// HTTP-backed driver: plain GET/POST form flows against pages that
/// render their verdict server-side. A fresh client per session keeps
/// invocations isolated, like the throwaway browser it replaces.
#[derive(Clone)]
pub struct HttpFormDriver {
    timeout: Duration,
}

impl HttpFormDriver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl WebDriver for HttpFormDriver {
    async fn open(&self, url: &str) -> Result<Box<dyn WebSession>, GatewayError> {
        let http = Client::builder().timeout(self.timeout).build()?;
        // Navigate first so an unreachable page fails the open, not the
        // submit.
        http.get(url).send().await?.error_for_status()?;
        Ok(Box::new(HttpFormSession {
            http,
            url: url.to_string(),
        }))
    }
}

struct HttpFormSession {
    http: Client,
    url: String,
}

#[async_trait]
impl WebSession for HttpFormSession {
    async fn submit_form(&mut self, field: &str, value: &str) -> Result<(), GatewayError> {
        self.http
            .post(&self.url)
            .form(&[(field, value)])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn page_text(&mut self) -> Result<String, GatewayError> {
        let resp = self.http.get(&self.url).send().await?.error_for_status()?;
        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedSession {
        bodies: Vec<String>,
        cursor: usize,
    }

    #[async_trait]
    impl WebSession for ScriptedSession {
        async fn submit_form(&mut self, _field: &str, _value: &str) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn page_text(&mut self) -> Result<String, GatewayError> {
            let body = self.bodies[self.cursor.min(self.bodies.len() - 1)].clone();
            self.cursor += 1;
            Ok(body)
        }
    }

    fn quick_settle() -> SettlePolicy {
        SettlePolicy::from_millis(50, 5)
    }

    #[tokio::test]
    async fn wait_for_returns_once_page_renders() {
        let mut session = ScriptedSession {
            bodies: vec!["loading".into(), "loading".into(), "done: 42".into()],
            cursor: 0,
        };
        let got = wait_for(&mut session, quick_settle(), |text| {
            text.strip_prefix("done: ").map(str::to_string)
        })
        .await
        .unwrap();
        assert_eq!(got, "42");
    }

    #[tokio::test]
    async fn wait_for_times_out_on_unrendered_page() {
        let mut session = ScriptedSession {
            bodies: vec!["loading".into()],
            cursor: 0,
        };
        let err = wait_for(&mut session, quick_settle(), |text| {
            text.contains("done").then_some(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, GatewayError::SettleTimeout(_)));
    }
}
