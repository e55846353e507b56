//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they surface core failures.

use thiserror::Error;

use crate::{PlaneId, TaskId};

/// The top-level error type for `sf-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("plane {0} not found")]
    PlaneNotFound(PlaneId),

    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("identifier space exhausted for {0}")]
    IdsExhausted(&'static str),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `sf-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
