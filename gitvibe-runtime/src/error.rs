use thiserror::Error;

/// Errors surfaced by the runtime to its callers.
///
/// Domain not-found conditions (unknown PR, unknown job id) are *not*
/// errors; they come back as typed results from the repository. The
/// variants here are either contract violations or live-transport
/// failures.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Demo mode was requested on a host that is not a local loopback
    /// name, without the explicit escape flag. Fatal at composition.
    #[error(
        "APP_MODE=demo is blocked on non-local hosts. \
         Set ALLOW_DEMO_ON_PUBLIC_HOST=true only for controlled demos."
    )]
    DemoModeBlocked,

    /// A data operation was called before `DemoRepository::init`.
    #[error("demo repository is not initialized")]
    NotInitialized,

    /// No mock route matches the requested verb and normalized path.
    #[error("Mock route not implemented: {method} {path}")]
    RouteNotImplemented { method: &'static str, path: String },

    /// `GET /api/jobs/{id}` for an id the repository does not know.
    #[error("Job not found.")]
    JobNotFound,

    /// Live-mode transport or status failure, with the best message we
    /// could extract from the response body.
    #[error("{message}")]
    Http { message: String },
}

/// Failure of a single persistence tier.
///
/// Tier errors never cross the chain boundary; the chain logs them and
/// consults the next tier.
#[derive(Debug, Error)]
#[error("storage failure during {op}: {detail}")]
pub struct TierError {
    pub op: &'static str,
    pub detail: String,
}

impl TierError {
    pub fn storage(op: &'static str, detail: impl Into<String>) -> Self {
        Self {
            op,
            detail: detail.into(),
        }
    }
}
