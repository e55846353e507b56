//! `sf-core` — foundational types for the `skyfleet` simulator.
//!
//! This crate is a dependency of every other `sf-*` crate.  It intentionally
//! has no `sf-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `PlaneId`, `TaskId`, `FactorId`, `IdAllocator`        |
//! | [`geo`]         | `Point`, planar distance and stepping                 |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`task`]        | `Task`                                                |
//! | [`rng`]         | `SimRng` (seeded scenario randomness)                 |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod task;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::{FactorId, IdAllocator, PlaneId, TaskId};
pub use rng::SimRng;
pub use task::Task;
pub use time::{SimClock, SimConfig, Tick};
