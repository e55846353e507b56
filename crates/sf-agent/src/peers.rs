//! Trusted, read-only access to other planes' state.
//!
//! Reading a neighbor's public state directly is a shortcut: a real fleet would
//! have to learn positions and workloads over the radio.  Keeping it behind a
//! dedicated trait makes every such read visible at the call site and lets
//! tests substitute a fake.

use sf_core::PlaneId;

use crate::PlaneState;

/// Read-only lookup of planes other than the caller.
pub trait TrustedRead {
    /// State of `plane`, or `None` if it does not exist or is the reader
    /// itself.
    fn peer(&self, plane: PlaneId) -> Option<&PlaneState>;
}

/// [`TrustedRead`] over the world's plane slice with the reader carved out.
///
/// The world holds planes in a `Vec<PlaneState>` indexed by `PlaneId`.  To
/// hand one plane out mutably while the rest stay readable it splits the
/// slice around that index; `PeerView` holds the two halves.
pub struct PeerView<'a> {
    head: &'a [PlaneState],
    tail: &'a [PlaneState],
}

impl<'a> PeerView<'a> {
    /// Split `planes` into the reader at `me` and a view of everyone else.
    ///
    /// Returns `None` if `me` is out of bounds.
    pub fn split(
        planes: &'a mut [PlaneState],
        me:     PlaneId,
    ) -> Option<(&'a mut PlaneState, PeerView<'a>)> {
        if me.index() >= planes.len() {
            return None;
        }
        let (head, rest) = planes.split_at_mut(me.index());
        let (mine, tail) = rest.split_first_mut()?;
        Some((mine, PeerView { head, tail }))
    }

    /// A view with no peers at all.
    pub fn empty() -> PeerView<'static> {
        PeerView { head: &[], tail: &[] }
    }

    /// Iterator over every peer in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PlaneState> + '_ {
        self.head.iter().chain(self.tail.iter())
    }
}

impl TrustedRead for PeerView<'_> {
    fn peer(&self, plane: PlaneId) -> Option<&PlaneState> {
        let idx = plane.index();
        let head = self.head.len();
        if idx < head {
            self.head.get(idx)
        } else if idx == head {
            None
        } else {
            self.tail.get(idx - head - 1)
        }
    }
}
