pub mod market_ratio;
pub mod safety;
pub mod social;

pub use market_ratio::MarketRatioValidator;
pub use safety::SafetyValidator;
pub use social::SocialScoreValidator;

use async_trait::async_trait;

use crate::domain::{Candidate, Verdict};

/// One screening stage.
///
/// Evaluation never returns an error: faults in the external call
/// surface as `Verdict::Unreachable` so the pipeline can keep going
/// with the next candidate.
#[async_trait]
pub trait Validator: Send + Sync {
    fn name(&self) -> &'static str;
    async fn evaluate(&self, candidate: &Candidate) -> Verdict;
}
