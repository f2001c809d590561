use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{PipelineResult, TradeCommand};
use crate::executor::Dispatcher;
use crate::pipeline::Pipeline;
use crate::scanner::Scanner;

/// Drives one end-to-end run: fetch candidates, screen each through
/// the pipeline, dispatch a buy command for every survivor.
///
/// Strictly sequential: one candidate finishes (elimination or
/// dispatch) before the next starts.
pub struct Engine {
    cfg: Config,
    scanner: Scanner,
    pipeline: Pipeline,
    dispatcher: Box<dyn Dispatcher>,
}

impl Engine {
    pub fn new(
        cfg: Config,
        scanner: Scanner,
        pipeline: Pipeline,
        dispatcher: Box<dyn Dispatcher>,
    ) -> Self {
        Self {
            cfg,
            scanner,
            pipeline,
            dispatcher,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let candidates = self.scanner.fetch_candidates().await;
        info!(
            candidates = candidates.len(),
            dry_run = self.cfg.dry_run,
            "engine.run"
        );

        let mut dispatched = 0usize;
        for candidate in candidates {
            let survivor = match self.pipeline.screen(candidate).await {
                PipelineResult::Survived(candidate) => candidate,
                PipelineResult::Eliminated { .. } => continue,
            };

            let command = TradeCommand::buy(&survivor);
            if self.cfg.dry_run {
                info!(candidate = %survivor, command = %command.text, "engine.dry_run_skip");
                continue;
            }

            match self.dispatcher.dispatch(&command).await {
                Ok(()) => {
                    dispatched += 1;
                    info!(candidate = %survivor, command = %command.text, "engine.dispatched");
                }
                Err(err) => {
                    // Fire-and-forget: log and move on, no retry.
                    warn!(candidate = %survivor, error = %err, "engine.dispatch_failed");
                }
            }
        }

        info!(dispatched, "engine.done");
        Ok(())
    }
}
