//! `sf-maxsum` — distributed task reallocation by bounded belief propagation.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`config`]   | `MaxSumConfig` (cycle length R, rounds I, workload weight k)  |
//! | [`cost`]     | `CostFunction`, `WorkloadCost`, `CostFactory`                 |
//! | [`factor`]   | `Edge`, `WorkloadNode`, `SelectorNode` and their message rules |
//! | [`graph`]    | `FactorGraph` — per-plane nodes, rebuild, belief intake       |
//! | [`engine`]   | One belief-propagation round                                  |
//! | [`decision`] | Selector decisions → hand-offs                                |
//! | [`behavior`] | `MaxSum` behavior and `install`                               |
//! | [`error`]    | `MaxSumError`, `MaxSumResult<T>`                              |
//!
//! # Protocol
//!
//! Every plane hosts one *workload node* and one *selector node* per task it
//! owns.  Time is cut into reallocation cycles of R ticks, aligned on the
//! global clock so every plane is in the same phase:
//!
//! | Cycle offset | Step                                                       |
//! |--------------|------------------------------------------------------------|
//! | 0            | rebuild edges from the neighbors confirmed over I ticks    |
//! | 1 ..= I      | one round of min-sum beliefs                               |
//! | I + 1        | every selector picks a plane; non-self picks hand off      |
//! | I + 2 ..     | idle                                                       |
//!
//! A plane that confirms fewer than two neighbors (itself included) or sees
//! no task at rebuild sits the cycle out.
//!
//! A selector whose best candidates tie picks the one holding the fewest
//! tasks, counting hand-offs its host already made that tick.
//!
//! Only a task's owner evaluates its selector, so a task changes hands at most
//! once per cycle.  A hand-off that cannot reach its recipient comes back to
//! the sender, which keeps the task until the next cycle.

pub mod behavior;
pub mod config;
pub mod cost;
pub mod decision;
pub mod engine;
pub mod error;
pub mod factor;
pub mod graph;


pub use behavior::{MaxSum, MaxSumStats, install};
pub use config::{CyclePhase, MaxSumConfig};
pub use cost::{CostFactory, CostFunction, WorkloadCost};
pub use decision::{HandOff, decide};
pub use engine::run_round;
pub use error::{MaxSumError, MaxSumResult};
pub use factor::{Edge, SelectorNode, WorkloadNode};
pub use graph::{BeliefIntake, FactorGraph, FleetView};
