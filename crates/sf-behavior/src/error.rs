use thiserror::Error;

use crate::MessageKind;

/// Composition errors, reported by [`BehaviorSet::attach`][crate::BehaviorSet::attach].
///
/// All of these are configuration mistakes: they surface before the first
/// tick and leave the behavior set unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BehaviorError {
    #[error("behavior `{behavior}` requires `{missing}`, which is not attached")]
    MissingDependency {
        behavior: &'static str,
        missing:  &'static str,
    },

    #[error("attaching `{behavior}` would create a dependency cycle")]
    DependencyCycle { behavior: &'static str },

    #[error("behavior `{0}` is already attached")]
    DuplicateBehavior(&'static str),

    #[error("message kind {kind} is claimed by both `{first}` and `{second}`")]
    DuplicateHandler {
        kind:   MessageKind,
        first:  &'static str,
        second: &'static str,
    },

    #[error("behavior limit of {0} per plane exceeded")]
    TooManyBehaviors(usize),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
