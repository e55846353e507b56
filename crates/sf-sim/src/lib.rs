//! `sf-sim` — the world and its tick loop.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Snapshot — plane positions and ranges are frozen into a RangeIndex.
//!   ② Planes   — for each plane in registration order:
//!                  take its inbox, run its BehaviorSet for one step,
//!                  record task events in the TaskLedger,
//!                  route its outbox through the channel right away.
//!   ③ Report   — TickStats to the observer; snapshot rows when due.
//! ```
//!
//! Routing a plane's outbox as soon as its pass ends means a plane later in
//! registration order hears a message in the same tick, an earlier one only
//! in the next tick.  Every protocol running on top has to tolerate a
//! one-tick skew between planes.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`sim`]      | `Sim` — planes, behavior sets, clock, task API           |
//! | [`builder`]  | `SimBuilder`                                             |
//! | [`channel`]  | `Channel` — range-gated delivery, `RouteStats`           |
//! | [`ledger`]   | `TaskLedger` — global task statistics                    |
//! | [`observer`] | `SimObserver`, `NoopObserver`, `TickStats`               |
//! | [`error`]    | `SimError`, `SimResult<T>`                               |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `fx-hash` | FxHash in `sf-spatial`'s neighbor trackers.              |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mut sim = SimBuilder::new(config)
//!     .planes(specs)
//!     .install(|id, set| sf_maxsum::install(set, id, &max_sum, &nav, &costs))
//!     .build()?;
//! sim.spawn_task(PlaneId(0), Point::new(10.0, 0.0))?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod channel;
pub mod error;
pub mod ledger;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use channel::{Channel, RouteStats};
pub use error::{SimError, SimResult};
pub use ledger::TaskLedger;
pub use observer::{NoopObserver, SimObserver, TickStats};
pub use sim::Sim;
