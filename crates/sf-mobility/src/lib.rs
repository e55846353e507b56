//! `sf-mobility` — planes flying to their tasks.
//!
//! # Crate layout
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`navigator`] | `Navigator` behavior, `NavigatorConfig`                |
//! | [`error`]     | `MobilityError`, `MobilityResult<T>`                   |
//!
//! # Movement model
//!
//! Planes fly in a straight line at constant speed towards their current
//! target, the nearest owned task.  The target is recomputed whenever the task
//! list changes, so a plane that just received a closer task turns around
//! immediately.  Reaching the task's location exactly completes it.
//!
//! Tasks may optionally expire after a fixed number of ticks, measured from
//! creation rather than from acquisition, so hand-offs do not reset the clock.

pub mod error;
pub mod navigator;

#[cfg(test)]
mod tests;

pub use error::{MobilityError, MobilityResult};
pub use navigator::{Navigator, NavigatorConfig};
