use tracing::info;

use crate::domain::{Candidate, PipelineResult};
use crate::validators::Validator;

/// Runs a candidate through the validators in order, stopping at the
/// first non-pass verdict so later (slow) stages are never consulted
/// for a candidate that is already out.
pub struct Pipeline {
    validators: Vec<Box<dyn Validator>>,
}

impl Pipeline {
    pub fn new(validators: Vec<Box<dyn Validator>>) -> Self {
        Self { validators }
    }

    pub async fn screen(&self, candidate: Candidate) -> PipelineResult {
        for (stage, validator) in self.validators.iter().enumerate() {
            let verdict = validator.evaluate(&candidate).await;
            if !verdict.is_pass() {
                info!(
                    candidate = %candidate,
                    stage,
                    validator = validator.name(),
                    verdict = verdict.label(),
                    "pipeline.eliminated"
                );
                return PipelineResult::Eliminated {
                    candidate,
                    stage,
                    validator: validator.name(),
                    verdict,
                };
            }
        }

        info!(candidate = %candidate, "pipeline.survived");
        PipelineResult::Survived(candidate)
    }
}
