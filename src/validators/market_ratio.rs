use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::{Candidate, Verdict};
use crate::market::{MarketData, PairStats};
use crate::validators::Validator;

/// Passes candidates whose holder count is large relative to market
/// cap. Thin markets with a broad holder base are the target profile.
pub struct MarketRatioValidator {
    market: Box<dyn MarketData>,
    threshold: f64,
}

impl MarketRatioValidator {
    pub fn new(market: Box<dyn MarketData>, threshold: f64) -> Self {
        Self { market, threshold }
    }
}

/// `None` when market cap is zero or the ratio is otherwise not a
/// usable number.
fn holder_mcap_ratio(stats: PairStats) -> Option<f64> {
    if stats.market_cap <= 0.0 {
        return None;
    }
    let ratio = stats.holders as f64 / stats.market_cap;
    ratio.is_finite().then_some(ratio)
}

#[async_trait]
impl Validator for MarketRatioValidator {
    fn name(&self) -> &'static str {
        "market_ratio"
    }

    async fn evaluate(&self, candidate: &Candidate) -> Verdict {
        let stats = match self.market.lookup(candidate.as_str()).await {
            Ok(Some(stats)) => stats,
            Ok(None) => {
                // No pair listed is a rejection, not a fault.
                info!(candidate = %candidate, "market.no_pair");
                return Verdict::Fail;
            }
            Err(err) => {
                warn!(candidate = %candidate, error = %err, "market.lookup_failed");
                return Verdict::Unreachable(err);
            }
        };

        match holder_mcap_ratio(stats) {
            Some(ratio) => {
                info!(
                    candidate = %candidate,
                    holders = stats.holders,
                    mcap = stats.market_cap,
                    ratio,
                    "market.analysis"
                );
                if ratio > self.threshold {
                    Verdict::Pass
                } else {
                    Verdict::Fail
                }
            }
            None => {
                info!(candidate = %candidate, mcap = stats.market_cap, "market.degenerate_mcap");
                Verdict::Fail
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;

    struct StaticMarket(Option<PairStats>);

    #[async_trait]
    impl MarketData for StaticMarket {
        async fn lookup(&self, _address: &str) -> Result<Option<PairStats>, GatewayError> {
            Ok(self.0)
        }
    }

    struct DownMarket;

    #[async_trait]
    impl MarketData for DownMarket {
        async fn lookup(&self, _address: &str) -> Result<Option<PairStats>, GatewayError> {
            Err(GatewayError::MalformedResponse("bad gateway".into()))
        }
    }

    fn candidate() -> Candidate {
        Candidate("0x2222222222222222222222222222222222222222".into())
    }

    fn validator(stats: Option<PairStats>) -> MarketRatioValidator {
        MarketRatioValidator::new(Box::new(StaticMarket(stats)), 0.05)
    }

    #[tokio::test]
    async fn high_ratio_passes() {
        // 10 / 100 = 0.10 > 0.05
        let v = validator(Some(PairStats {
            holders: 10,
            market_cap: 100.0,
        }));
        assert!(v.evaluate(&candidate()).await.is_pass());
    }

    #[tokio::test]
    async fn low_ratio_fails() {
        // 1 / 100 = 0.01 <= 0.05
        let v = validator(Some(PairStats {
            holders: 1,
            market_cap: 100.0,
        }));
        assert!(matches!(v.evaluate(&candidate()).await, Verdict::Fail));
    }

    #[tokio::test]
    async fn exact_threshold_fails() {
        let v = validator(Some(PairStats {
            holders: 5,
            market_cap: 100.0,
        }));
        assert!(matches!(v.evaluate(&candidate()).await, Verdict::Fail));
    }

    #[tokio::test]
    async fn missing_pair_is_a_fail_not_an_error() {
        let v = validator(None);
        assert!(matches!(v.evaluate(&candidate()).await, Verdict::Fail));
    }

    #[tokio::test]
    async fn zero_mcap_fails_instead_of_passing_on_infinity() {
        let v = validator(Some(PairStats {
            holders: 10,
            market_cap: 0.0,
        }));
        assert!(matches!(v.evaluate(&candidate()).await, Verdict::Fail));
    }

    #[tokio::test]
    async fn lookup_fault_is_unreachable() {
        let v = MarketRatioValidator::new(Box::new(DownMarket), 0.05);
        assert!(matches!(
            v.evaluate(&candidate()).await,
            Verdict::Unreachable(_)
        ));
    }
}
