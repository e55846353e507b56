//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  `PlaneId` doubles as the index of a
//! plane in the world's registration order, so `id.index()` addresses the
//! world's per-plane `Vec`s directly.
//!
//! Fresh IDs come from an [`IdAllocator`] owned by whoever creates the entity
//! (the world for planes and tasks).  There is no global counter.

use std::fmt;
use std::marker::PhantomData;

use crate::{CoreError, CoreResult};

/// Implemented by every ID type an [`IdAllocator`] can hand out.
pub trait AllocatedId: Copy {
    /// Human-readable kind, used in error messages.
    const KIND: &'static str;

    /// Wrap a raw counter value.
    fn from_raw(raw: u32) -> Self;
}

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }

        impl AllocatedId for $name {
            const KIND: &'static str = stringify!($name);

            #[inline(always)]
            fn from_raw(raw: u32) -> Self {
                $name(raw)
            }
        }
    };
}

typed_id! {
    /// Identity of a plane; also its position in registration order.
    pub struct PlaneId(u32);
}

typed_id! {
    /// Identity of a task, unique for the lifetime of a world.
    pub struct TaskId(u32);
}

// ── FactorId ──────────────────────────────────────────────────────────────────

/// Address of one factor-graph node.
///
/// `task == None` is the plane's workload node; `task == Some(t)` is the
/// selector node for task `t`, hosted by `plane` (its current owner).  Equality
/// is structural on the `(plane, task)` pair.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactorId {
    pub plane: PlaneId,
    pub task:  Option<TaskId>,
}

impl FactorId {
    /// The workload node of `plane`.
    #[inline]
    pub fn workload(plane: PlaneId) -> Self {
        Self { plane, task: None }
    }

    /// The selector node of `task`, hosted by `plane`.
    #[inline]
    pub fn selector(plane: PlaneId, task: TaskId) -> Self {
        Self { plane, task: Some(task) }
    }

    #[inline]
    pub fn is_workload(self) -> bool {
        self.task.is_none()
    }
}

impl fmt::Display for FactorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.task {
            None       => write!(f, "W[{}]", self.plane),
            Some(task) => write!(f, "S[{}, {}]", self.plane, task),
        }
    }
}

// ── IdAllocator ───────────────────────────────────────────────────────────────

/// Monotonic allocator for one ID type.
///
/// IDs are handed out densely from 0.  The `INVALID` sentinel (`u32::MAX`) is
/// never produced; allocation fails with [`CoreError::IdsExhausted`] instead.
#[derive(Debug)]
pub struct IdAllocator<I: AllocatedId> {
    next:    u32,
    _marker: PhantomData<I>,
}

impl<I: AllocatedId> Default for IdAllocator<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: AllocatedId> IdAllocator<I> {
    pub fn new() -> Self {
        Self { next: 0, _marker: PhantomData }
    }

    /// Hand out the next unused ID.
    pub fn allocate(&mut self) -> CoreResult<I> {
        if self.next == u32::MAX {
            return Err(CoreError::IdsExhausted(I::KIND));
        }
        let id = I::from_raw(self.next);
        self.next += 1;
        Ok(id)
    }

    /// Number of IDs handed out so far.
    pub fn allocated(&self) -> usize {
        self.next as usize
    }
}
