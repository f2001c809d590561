use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::{Candidate, Verdict};
use crate::error::GatewayError;
use crate::validators::Validator;
use crate::web::{wait_for, SettlePolicy, WebDriver, WebSession};

const SAFETY_MARKER: &str = "Safe";

/// Submits the candidate address to the safety checker page and waits
/// for its rendered verdict.
pub struct SafetyValidator {
    driver: Box<dyn WebDriver>,
    page_url: String,
    settle: SettlePolicy,
}

impl SafetyValidator {
    pub fn new(driver: Box<dyn WebDriver>, page_url: String, settle: SettlePolicy) -> Self {
        Self {
            driver,
            page_url,
            settle,
        }
    }

    async fn check(&self, session: &mut dyn WebSession, candidate: &Candidate) -> Verdict {
        if let Err(err) = session.submit_form("address", candidate.as_str()).await {
            warn!(candidate = %candidate, error = %err, "safety.submit_failed");
            return Verdict::Unreachable(err);
        }

        match wait_for(session, self.settle, |text| {
            text.contains(SAFETY_MARKER).then_some(())
        })
        .await
        {
            Ok(()) => {
                info!(candidate = %candidate, "safety.marker_present");
                Verdict::Pass
            }
            // The page rendered without the marker for the whole settle
            // window: that is the negative verdict itself.
            Err(GatewayError::SettleTimeout(_)) => {
                info!(candidate = %candidate, "safety.marker_absent");
                Verdict::Fail
            }
            Err(err) => {
                warn!(candidate = %candidate, error = %err, "safety.poll_failed");
                Verdict::Unreachable(err)
            }
        }
    }
}

#[async_trait]
impl Validator for SafetyValidator {
    fn name(&self) -> &'static str {
        "safety"
    }

    async fn evaluate(&self, candidate: &Candidate) -> Verdict {
        let mut session = match self.driver.open(&self.page_url).await {
            Ok(session) => session,
            Err(err) => {
                warn!(candidate = %candidate, error = %err, "safety.open_failed");
                return Verdict::Unreachable(err);
            }
        };

        // Session drops (and releases its handle) on every return path.
        self.check(session.as_mut(), candidate).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[derive(Default)]
    struct SessionLog {
        opened: AtomicUsize,
        closed: AtomicUsize,
    }

    struct FakeDriver {
        log: Arc<SessionLog>,
        body: &'static str,
        fail_submit: bool,
    }

    struct FakeSession {
        log: Arc<SessionLog>,
        body: &'static str,
        fail_submit: bool,
    }

    #[async_trait]
    impl WebDriver for FakeDriver {
        async fn open(&self, _url: &str) -> Result<Box<dyn WebSession>, GatewayError> {
            self.log.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeSession {
                log: Arc::clone(&self.log),
                body: self.body,
                fail_submit: self.fail_submit,
            }))
        }
    }

    #[async_trait]
    impl WebSession for FakeSession {
        async fn submit_form(&mut self, _field: &str, _value: &str) -> Result<(), GatewayError> {
            if self.fail_submit {
                return Err(GatewayError::MissingElement("input[name=address]".into()));
            }
            Ok(())
        }

        async fn page_text(&mut self) -> Result<String, GatewayError> {
            Ok(self.body.to_string())
        }
    }

    impl Drop for FakeSession {
        fn drop(&mut self) {
            self.log.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn validator(log: Arc<SessionLog>, body: &'static str, fail_submit: bool) -> SafetyValidator {
        SafetyValidator::new(
            Box::new(FakeDriver {
                log,
                body,
                fail_submit,
            }),
            "https://solsniffer.test".into(),
            SettlePolicy::from_millis(50, 5),
        )
    }

    fn candidate() -> Candidate {
        Candidate("0x3333333333333333333333333333333333333333".into())
    }

    #[tokio::test]
    async fn marker_present_passes_and_releases_session() {
        let log = Arc::new(SessionLog::default());
        let v = validator(Arc::clone(&log), "Token report: Safe", false);
        assert!(v.evaluate(&candidate()).await.is_pass());
        assert_eq!(log.opened.load(Ordering::SeqCst), 1);
        assert_eq!(log.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn marker_absent_fails_after_settle_window() {
        let log = Arc::new(SessionLog::default());
        let v = validator(Arc::clone(&log), "Token report: Unsafe", false);
        assert!(matches!(v.evaluate(&candidate()).await, Verdict::Fail));
        assert_eq!(log.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn submit_fault_is_unreachable_and_still_releases_session() {
        let log = Arc::new(SessionLog::default());
        let v = validator(Arc::clone(&log), "", true);
        assert!(matches!(
            v.evaluate(&candidate()).await,
            Verdict::Unreachable(_)
        ));
        assert_eq!(log.opened.load(Ordering::SeqCst), 1);
        assert_eq!(log.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn open_fault_is_unreachable() {
        struct ClosedDriver;

        #[async_trait]
        impl WebDriver for ClosedDriver {
            async fn open(&self, url: &str) -> Result<Box<dyn WebSession>, GatewayError> {
                Err(GatewayError::MissingElement(url.to_string()))
            }
        }

        let v = SafetyValidator::new(
            Box::new(ClosedDriver),
            "https://solsniffer.test".into(),
            SettlePolicy::from_millis(50, 5),
        );
        assert!(matches!(
            v.evaluate(&candidate()).await,
            Verdict::Unreachable(_)
        ));
    }
}
