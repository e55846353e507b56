//! `sf-behavior` — per-plane behavior composition and dispatch.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                         |
//! |--------------|------------------------------------------------------------------|
//! | [`message`]  | `Message`, `Payload`, `MessageKind`, `Belief`                    |
//! | [`behavior`] | `Behavior` trait, `BehaviorKind`, `BehaviorId`                   |
//! | [`context`]  | `BehaviorCtx<'a>`, `Deps<'a>`, `StepEnv<'a>`                     |
//! | [`runtime`]  | `BehaviorSet` — attach-time validation and the four-phase step   |
//! | [`dag`]      | Kahn topological sort used at attach time                        |
//! | [`tally`]    | `MessageTally` — passive promiscuous message counter             |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                             |
//!
//! # Design notes
//!
//! Every coordination strategy (max-sum, auctions, …) is a set of
//! [`Behavior`]s attached to each plane.  A [`BehaviorSet`] validates the
//! composition once, when behaviors are attached:
//!
//! - required behavior kinds must already be attached,
//! - the dependency graph must be acyclic,
//! - each [`MessageKind`] has at most one handler.
//!
//! After that, a tick for one plane is a fixed sequence of `before_messages`,
//! message delivery, `after_messages` and `post_step`, each in dependency order.
//! Task lifecycle events recorded on the plane are fanned out to every behavior
//! after every hook, so per-task state held by behaviors never lags the task
//! list by more than one hook.

pub mod behavior;
pub mod context;
pub mod dag;
pub mod error;
pub mod message;
pub mod runtime;
pub mod tally;

#[cfg(test)]
mod tests;

pub use behavior::{Behavior, BehaviorId, BehaviorKind};
pub use context::{BehaviorCtx, Deps, StepEnv};
pub use error::{BehaviorError, BehaviorResult};
pub use message::{Belief, Message, MessageKind, Payload};
pub use runtime::{BehaviorSet, StepReport};
pub use tally::MessageTally;
