use async_trait::async_trait;
use regex::Regex;
use tracing::{info, warn};

use crate::domain::{Candidate, Verdict};
use crate::error::GatewayError;
use crate::validators::Validator;
use crate::web::{wait_for, SettlePolicy, WebDriver, WebSession};

/// Looks up the reputation score for the project's social handle and
/// passes at or above the configured minimum.
pub struct SocialScoreValidator {
    driver: Box<dyn WebDriver>,
    page_url: String,
    handle: String,
    min_score: u32,
    settle: SettlePolicy,
    score_pattern: Regex,
}

impl SocialScoreValidator {
    pub fn new(
        driver: Box<dyn WebDriver>,
        page_url: String,
        handle: String,
        min_score: u32,
        settle: SettlePolicy,
    ) -> Self {
        let score_pattern = Regex::new(r"(?i)score\D{0,16}(\d+)").expect("score pattern is valid");
        Self {
            driver,
            page_url,
            handle,
            min_score,
            settle,
            score_pattern,
        }
    }

    fn parse_score(&self, text: &str) -> Option<u32> {
        self.score_pattern
            .captures(text)
            .and_then(|caps| caps[1].parse().ok())
    }

    async fn read_score(&self, session: &mut dyn WebSession) -> Result<u32, GatewayError> {
        session.submit_form("handle", &self.handle).await?;
        wait_for(session, self.settle, |text| self.parse_score(text))
            .await
            .map_err(|err| match err {
                // The page never rendered a score element to read.
                GatewayError::SettleTimeout(_) => GatewayError::MissingElement("score".into()),
                other => other,
            })
    }
}

#[async_trait]
impl Validator for SocialScoreValidator {
    fn name(&self) -> &'static str {
        "social_score"
    }

    async fn evaluate(&self, candidate: &Candidate) -> Verdict {
        let mut session = match self.driver.open(&self.page_url).await {
            Ok(session) => session,
            Err(err) => {
                warn!(candidate = %candidate, error = %err, "social.open_failed");
                return Verdict::Unreachable(err);
            }
        };

        // A score that never renders is an infra fault, unlike the
        // safety marker: absence here proves nothing about the handle.
        match self.read_score(session.as_mut()).await {
            Ok(score) => {
                info!(
                    candidate = %candidate,
                    handle = %self.handle,
                    score,
                    min = self.min_score,
                    "social.score"
                );
                if score >= self.min_score {
                    Verdict::Pass
                } else {
                    Verdict::Fail
                }
            }
            Err(err) => {
                warn!(candidate = %candidate, handle = %self.handle, error = %err, "social.lookup_failed");
                Verdict::Unreachable(err)
            }
        }
    }
}
