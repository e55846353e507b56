use sf_behavior::BehaviorError;
use sf_mobility::MobilityError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MaxSumError {
    #[error("belief rounds must be at least 1")]
    ZeroRounds,

    #[error("cycle of {cycle_ticks} ticks cannot fit a rebuild, {rounds} rounds and a decision")]
    CycleTooShort { cycle_ticks: u64, rounds: u64 },

    #[error("workload weight must be finite and non-negative, got {0}")]
    InvalidWeight(f64),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error(transparent)]
    Mobility(#[from] MobilityError),
}

pub type MaxSumResult<T> = Result<T, MaxSumError>;
