use sf_core::{CoreError, PlaneId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("a simulation needs at least one plane")]
    NoPlanes,

    #[error("plane {plane}: {reason}")]
    InvalidPlane { plane: PlaneId, reason: &'static str },

    #[error("installing behaviors on plane {plane} failed: {source}")]
    Install {
        plane:  PlaneId,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
