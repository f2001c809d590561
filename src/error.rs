use std::time::Duration;

use thiserror::Error;

/// Faults raised by external collaborators (feed, market lookup, web
/// probes, messaging). Carried inside `Verdict::Unreachable` so callers
/// can tell a flaky dependency from a genuine rejection.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    // Web-driven probes
    #[error("element not found: {0}")]
    MissingElement(String),

    #[error("page did not settle within {0:?}")]
    SettleTimeout(Duration),

    // Messaging dispatch
    #[error("dispatch rejected: {0}")]
    Dispatch(String),
}
