//! Errors surfaced by the front end.

use thiserror::Error;

/// Convenience alias for front-end results.
pub type Result<T> = core::result::Result<T, Error>;

/// Anything that can stop an experiment or a report from being produced.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid input or an aborted run in the numerical core.
    #[error(transparent)]
    Core(#[from] banditry_core::Error),

    /// A report could not be serialized.
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    /// A sweep was requested over no seeds.
    #[error("sweep needs at least one seed")]
    EmptySweep,
}
