use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MobilityError {
    #[error("task time-to-live must be at least one tick")]
    ZeroTtl,
}

pub type MobilityResult<T> = Result<T, MobilityError>;
