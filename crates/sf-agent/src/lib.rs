//! `sf-agent` — per-plane state for the `skyfleet` simulator.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                        |
//! |------------|-----------------------------------------------------------------|
//! | [`plane`]  | `PlaneSpec`, `PlaneState` (location, range, owned task list)    |
//! | [`event`]  | `TaskEvent`, `RemovalReason` — task lifecycle notifications     |
//! | [`peers`]  | `TrustedRead` trait, `PeerView` split-borrow implementation     |
//!
//! # Ownership discipline
//!
//! A `PlaneState` is only ever borrowed mutably by its own behaviors.  Other
//! planes' state is reachable exclusively through [`TrustedRead`], which hands
//! out shared references.  Cross-plane changes travel as messages.

pub mod event;
pub mod peers;
pub mod plane;


pub use event::{RemovalReason, TaskEvent};
pub use peers::{PeerView, TrustedRead};
pub use plane::{PlaneSpec, PlaneState};
