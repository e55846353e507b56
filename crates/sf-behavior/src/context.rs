//! What a behavior can see and do while one of its hooks runs.

use sf_agent::{PlaneState, TrustedRead};
use sf_core::{PlaneId, Tick};

use crate::behavior::AsAny;
use crate::runtime::Slot;
use crate::{Behavior, BehaviorKind, Message, Payload};

/// Per-plane inputs to one [`BehaviorSet::step`][crate::BehaviorSet::step].
///
/// The world builds one of these for each plane it visits and keeps the
/// `outbox` so it can route whatever the plane sent once the pass is over.
pub struct StepEnv<'a> {
    pub tick:   Tick,
    pub plane:  &'a mut PlaneState,
    pub peers:  &'a dyn TrustedRead,
    pub outbox: &'a mut Vec<Message>,
}

/// Read-only access to the other behaviors attached to the same plane.
///
/// The behavior currently running is taken out of its slot for the duration
/// of the hook, so it never sees itself here.
#[derive(Copy, Clone)]
pub struct Deps<'a> {
    slots: &'a [Slot],
}

impl<'a> Deps<'a> {
    pub(crate) fn new(slots: &'a [Slot]) -> Self {
        Self { slots }
    }

    /// The attached behavior of concrete type `T`, if any.
    pub fn get<T: Behavior>(&self) -> Option<&'a T> {
        let kind = BehaviorKind::of::<T>();
        self.slots
            .iter()
            .filter(|slot| slot.kind == kind)
            .find_map(|slot| slot.behavior.as_deref())
            .and_then(|b| <dyn Behavior as AsAny>::as_any(b).downcast_ref::<T>())
    }
}

/// Context handed to every behavior hook.
pub struct BehaviorCtx<'a> {
    /// The tick being processed.
    pub tick:  Tick,
    /// The plane this behavior is bound to.
    pub plane: &'a mut PlaneState,
    /// Trusted, read-only access to every other plane.
    pub peers: &'a dyn TrustedRead,
    deps:      Deps<'a>,
    outbox:    &'a mut Vec<Message>,
}

impl<'a> BehaviorCtx<'a> {
    pub(crate) fn new(
        tick:   Tick,
        plane:  &'a mut PlaneState,
        peers:  &'a dyn TrustedRead,
        deps:   Deps<'a>,
        outbox: &'a mut Vec<Message>,
    ) -> Self {
        Self { tick, plane, peers, deps, outbox }
    }

    #[inline]
    pub fn me(&self) -> PlaneId {
        self.plane.id
    }

    /// Another behavior of this plane, typically a declared dependency.
    pub fn dependency<T: Behavior>(&self) -> Option<&T> {
        self.deps.get::<T>()
    }

    /// State of any plane, this one included.
    pub fn view(&self, plane: PlaneId) -> Option<&PlaneState> {
        if plane == self.plane.id {
            Some(&*self.plane)
        } else {
            self.peers.peer(plane)
        }
    }

    /// Queue a message for `to`.  Delivery is range-gated by the world.
    pub fn send_to(&mut self, to: PlaneId, payload: Payload) {
        self.push(Some(to), payload);
    }

    /// Queue a message for every plane in range.
    pub fn broadcast(&mut self, payload: Payload) {
        self.push(None, payload);
    }

    /// Messages queued during the current pass so far.
    pub fn queued(&self) -> usize {
        self.outbox.len()
    }

    fn push(&mut self, recipient: Option<PlaneId>, payload: Payload) {
        self.outbox.push(Message {
            sender:  self.plane.id,
            recipient,
            origin:  self.plane.position,
            sent_at: self.tick,
            payload,
        });
    }
}
