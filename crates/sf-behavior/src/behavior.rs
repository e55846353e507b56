//! The `Behavior` trait — the extension point every coordination strategy
//! plugs into.

use std::any::{Any, TypeId};
use std::fmt;

use sf_agent::RemovalReason;
use sf_core::Task;

use crate::{BehaviorCtx, Message, MessageKind};

// ── BehaviorId ────────────────────────────────────────────────────────────────

/// Stable handle of a behavior inside one plane's [`BehaviorSet`][crate::BehaviorSet].
///
/// Handles are assigned in attach order and never reused.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct BehaviorId(pub u16);

impl BehaviorId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BehaviorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BehaviorId({})", self.0)
    }
}

// ── BehaviorKind ──────────────────────────────────────────────────────────────

/// The concrete type of a behavior, used to declare and resolve dependencies.
///
/// Two kinds are equal iff they name the same Rust type.
#[derive(Copy, Clone, Debug)]
pub struct BehaviorKind {
    id:   TypeId,
    name: &'static str,
}

impl BehaviorKind {
    pub fn of<T: Behavior>() -> Self {
        let full = std::any::type_name::<T>();
        Self {
            id:   TypeId::of::<T>(),
            name: full.rsplit("::").next().unwrap_or(full),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for BehaviorKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BehaviorKind {}

// ── AsAny ─────────────────────────────────────────────────────────────────────

/// Upcast helper so dependencies can be downcast to their concrete type.
///
/// Blanket-implemented for every `'static` type; never implement by hand.
pub trait AsAny {
    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ── Behavior ──────────────────────────────────────────────────────────────────

/// A reactive unit bound to one plane.
///
/// # Hooks
///
/// Per tick the runtime calls, for every attached behavior in dependency
/// order: [`before_messages`](Self::before_messages), then
/// [`on_message`](Self::on_message) once per delivered message, then
/// [`after_messages`](Self::after_messages), then
/// [`post_step`](Self::post_step).  [`initialize`](Self::initialize) runs once
/// before the first tick the behavior takes part in.  The task hooks run
/// whenever the plane's task list changed during the previous hook.
///
/// # Message routing
///
/// A message goes to the single behavior whose [`handles`](Self::handles)
/// table lists its kind, plus every behavior that reports
/// [`is_promiscuous`](Self::is_promiscuous).
///
/// Every hook has a no-op default, so a behavior only implements what it
/// reacts to.
pub trait Behavior: AsAny + Send + 'static {
    /// Short name for logs and error messages.
    fn name(&self) -> &'static str;

    /// Behavior kinds that must be attached before this one.
    fn requires(&self) -> Vec<BehaviorKind> {
        Vec::new()
    }

    /// Message kinds this behavior is the authority for.
    fn handles(&self) -> &'static [MessageKind] {
        &[]
    }

    /// Observe every delivered message regardless of `handles`.
    fn is_promiscuous(&self) -> bool {
        false
    }

    fn initialize(&mut self, _ctx: &mut BehaviorCtx<'_>) {}

    fn before_messages(&mut self, _ctx: &mut BehaviorCtx<'_>) {}

    fn on_message(&mut self, _msg: &Message, _ctx: &mut BehaviorCtx<'_>) {}

    fn after_messages(&mut self, _ctx: &mut BehaviorCtx<'_>) {}

    fn post_step(&mut self, _ctx: &mut BehaviorCtx<'_>) {}

    fn on_task_added(&mut self, _task: &Task, _ctx: &mut BehaviorCtx<'_>) {}

    fn on_task_removed(&mut self, _task: &Task, _reason: RemovalReason, _ctx: &mut BehaviorCtx<'_>) {}
}
