//! `sf-spatial` — who can hear whom.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`range`]     | `RangeIndex` — R-tree over a snapshot of plane positions  |
//! | [`neighbors`] | `NeighborTracker` — heartbeat-driven neighbor confirmation |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `fx-hash` | Uses `FxHashMap` for the tracker's sighting table.       |

pub mod neighbors;
pub mod range;


pub use neighbors::{NeighborTracker, Sighting};
pub use range::RangeIndex;
