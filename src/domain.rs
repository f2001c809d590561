use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Wallet or token address under evaluation. Opaque beyond the pattern
/// match at the feed boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate(pub String);

impl Candidate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one validator on one candidate.
///
/// `Unreachable` marks an external-call fault, distinct from a genuine
/// rejection; both stop the pipeline for that candidate.
#[derive(Debug)]
pub enum Verdict {
    Pass,
    Fail,
    Unreachable(GatewayError),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// Short label for log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Fail => "fail",
            Verdict::Unreachable(_) => "unreachable",
        }
    }
}

/// Final per-candidate outcome of the validator chain.
#[derive(Debug)]
pub enum PipelineResult {
    Survived(Candidate),
    Eliminated {
        candidate: Candidate,
        /// Zero-based index of the validator that stopped the chain.
        stage: usize,
        validator: &'static str,
        verdict: Verdict,
    },
}

/// Payload sent to the trade actuator for a surviving candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeCommand {
    pub text: String,
}

impl TradeCommand {
    pub fn buy(candidate: &Candidate) -> Self {
        Self {
            text: format!("/buy {}", candidate.as_str()),
        }
    }
}
