//! `BehaviorSet` — one plane's attached behaviors and their dispatch.

use std::collections::BTreeMap;

use sf_agent::TaskEvent;
use tracing::trace;

use crate::behavior::AsAny;
use crate::dag::topological_sort;
use crate::{
    Behavior, BehaviorCtx, BehaviorError, BehaviorId, BehaviorKind, BehaviorResult, Deps, Message,
    MessageKind, StepEnv,
};

/// Arena entry for one attached behavior.
///
/// `behavior` is `None` only while that behavior's own hook is running.
pub(crate) struct Slot {
    pub(crate) kind:        BehaviorKind,
    pub(crate) name:        &'static str,
    pub(crate) promiscuous: bool,
    pub(crate) initialized: bool,
    pub(crate) behavior:    Option<Box<dyn Behavior>>,
}

/// What happened during one [`BehaviorSet::step`] or [`BehaviorSet::notify`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StepReport {
    /// Messages that reached their kind's handler.
    pub handled:     usize,
    /// Messages whose kind no attached behavior handles.  Promiscuous
    /// observers may still have seen them.
    pub unhandled:   usize,
    /// Task lifecycle events flushed to the behaviors, in order.
    pub task_events: Vec<TaskEvent>,
}

/// The ordered behaviors of one plane.
///
/// # Validation
///
/// [`attach`](Self::attach) rejects, without modifying the set:
/// - a second behavior of an already attached kind,
/// - a dependency on a kind that is not attached yet,
/// - a dependency cycle (including self-dependency),
/// - a handler claim on a message kind another behavior already handles.
///
/// # Dispatch
///
/// [`step`](Self::step) runs the four phases for one tick; see the crate
/// documentation.
#[derive(Default)]
pub struct BehaviorSet {
    slots:  Vec<Slot>,
    /// Dependency edges `(required, dependent)` by slot index.
    edges:  Vec<(usize, usize)>,
    /// Slot indices in dependency order.
    order:  Vec<BehaviorId>,
    routes: BTreeMap<MessageKind, BehaviorId>,
}

impl BehaviorSet {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Composition ───────────────────────────────────────────────────────

    /// Attach `behavior`, validating the resulting composition.
    pub fn attach<B: Behavior>(&mut self, behavior: B) -> BehaviorResult<BehaviorId> {
        let kind = BehaviorKind::of::<B>();
        let name = behavior.name();

        if self.slots.iter().any(|s| s.kind == kind) {
            return Err(BehaviorError::DuplicateBehavior(name));
        }
        let index = self.slots.len();
        let id = u16::try_from(index)
            .map(BehaviorId)
            .map_err(|_| BehaviorError::TooManyBehaviors(u16::MAX as usize))?;

        // ── Dependency graph ──────────────────────────────────────────────
        let requires = behavior.requires();
        let mut edges = self.edges.clone();
        let mut missing = None;
        for req in &requires {
            if *req == kind {
                edges.push((index, index));
            } else if let Some(dep) = self.slots.iter().position(|s| s.kind == *req) {
                edges.push((dep, index));
            } else if missing.is_none() {
                missing = Some(req.name());
            }
        }
        let sorted = topological_sort(index + 1, &edges)
            .map_err(|_| BehaviorError::DependencyCycle { behavior: name })?;
        if let Some(missing) = missing {
            return Err(BehaviorError::MissingDependency { behavior: name, missing });
        }

        // ── Handler table ─────────────────────────────────────────────────
        for &msg_kind in behavior.handles() {
            if let Some(&owner) = self.routes.get(&msg_kind) {
                return Err(BehaviorError::DuplicateHandler {
                    kind:   msg_kind,
                    first:  self.slots[owner.index()].name,
                    second: name,
                });
            }
        }

        // ── Commit ────────────────────────────────────────────────────────
        for &msg_kind in behavior.handles() {
            self.routes.insert(msg_kind, id);
        }
        self.slots.push(Slot {
            kind,
            name,
            promiscuous: behavior.is_promiscuous(),
            initialized: false,
            behavior:    Some(Box::new(behavior)),
        });
        self.edges = edges;
        // Indices fit in u16: every index is <= the one just checked.
        self.order = sorted.into_iter().map(|i| BehaviorId(i as u16)).collect();
        Ok(id)
    }

    // ── Inspection ────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Behavior handles in dependency order.
    pub fn order(&self) -> &[BehaviorId] {
        &self.order
    }

    /// Behavior names in dependency order.
    pub fn names(&self) -> Vec<&'static str> {
        self.order.iter().map(|id| self.slots[id.index()].name).collect()
    }

    /// The behavior that handles `kind`, if any.
    pub fn handler_of(&self, kind: MessageKind) -> Option<BehaviorId> {
        self.routes.get(&kind).copied()
    }

    /// The attached behavior of type `T`.
    pub fn get<T: Behavior>(&self) -> Option<&T> {
        Deps::new(&self.slots).get::<T>()
    }

    /// Mutable access to the attached behavior of type `T`.
    pub fn get_mut<T: Behavior>(&mut self) -> Option<&mut T> {
        let kind = BehaviorKind::of::<T>();
        self.slots
            .iter_mut()
            .filter(|slot| slot.kind == kind)
            .find_map(|slot| slot.behavior.as_deref_mut())
            .and_then(|b| <dyn Behavior as AsAny>::as_any_mut(b).downcast_mut::<T>())
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    /// Run one tick for this plane.
    ///
    /// `inbox` holds the messages queued for the plane, in receipt order.
    pub fn step(&mut self, env: &mut StepEnv<'_>, inbox: Vec<Message>) -> StepReport {
        let mut report = StepReport::default();

        // ── Initialization (once per behavior) ────────────────────────────
        for k in 0..self.order.len() {
            let id = self.order[k];
            if !self.slots[id.index()].initialized {
                self.slots[id.index()].initialized = true;
                self.invoke(id, env, &mut report, |b, ctx| b.initialize(ctx));
            }
        }

        // ── Phase 1: before messages ──────────────────────────────────────
        for k in 0..self.order.len() {
            let id = self.order[k];
            self.invoke(id, env, &mut report, |b, ctx| b.before_messages(ctx));
        }

        // ── Phase 2: message delivery ─────────────────────────────────────
        for msg in &inbox {
            self.deliver(msg, env, &mut report);
        }

        // ── Phase 3: after messages ───────────────────────────────────────
        for k in 0..self.order.len() {
            let id = self.order[k];
            self.invoke(id, env, &mut report, |b, ctx| b.after_messages(ctx));
        }

        // ── Phase 4: post step ────────────────────────────────────────────
        for k in 0..self.order.len() {
            let id = self.order[k];
            self.invoke(id, env, &mut report, |b, ctx| b.post_step(ctx));
        }

        report
    }

    /// Flush task events recorded on the plane outside of a step (e.g. a task
    /// injected by the world).
    pub fn notify(&mut self, env: &mut StepEnv<'_>) -> StepReport {
        let mut report = StepReport::default();
        self.flush_task_events(env, &mut report);
        report
    }

    fn deliver(&mut self, msg: &Message, env: &mut StepEnv<'_>, report: &mut StepReport) {
        let kind = msg.kind();
        let handler = self.routes.get(&kind).copied();

        for k in 0..self.order.len() {
            let id = self.order[k];
            if Some(id) == handler || self.slots[id.index()].promiscuous {
                self.invoke(id, env, report, |b, ctx| b.on_message(msg, ctx));
            }
        }

        if handler.is_some() {
            report.handled += 1;
        } else {
            report.unhandled += 1;
            trace!(plane = %env.plane.id, sender = %msg.sender, %kind, "no handler; message dropped");
        }
    }

    /// Run one hook of one behavior, then flush any task events it caused.
    fn invoke<F>(&mut self, id: BehaviorId, env: &mut StepEnv<'_>, report: &mut StepReport, hook: F)
    where
        F: FnOnce(&mut dyn Behavior, &mut BehaviorCtx<'_>),
    {
        self.invoke_raw(id, env, hook);
        self.flush_task_events(env, report);
    }

    fn invoke_raw<F>(&mut self, id: BehaviorId, env: &mut StepEnv<'_>, hook: F)
    where
        F: FnOnce(&mut dyn Behavior, &mut BehaviorCtx<'_>),
    {
        let Some(mut behavior) = self.slots[id.index()].behavior.take() else {
            return;
        };
        {
            let mut ctx = BehaviorCtx::new(
                env.tick,
                &mut *env.plane,
                env.peers,
                Deps::new(&self.slots),
                &mut *env.outbox,
            );
            hook(&mut *behavior, &mut ctx);
        }
        self.slots[id.index()].behavior = Some(behavior);
    }

    /// Fan task events out to every behavior until the plane records no more.
    fn flush_task_events(&mut self, env: &mut StepEnv<'_>, report: &mut StepReport) {
        while env.plane.has_pending_events() {
            for event in env.plane.drain_events() {
                for k in 0..self.order.len() {
                    let id = self.order[k];
                    match &event {
                        TaskEvent::Added(task) => {
                            self.invoke_raw(id, env, |b, ctx| b.on_task_added(task, ctx));
                        }
                        TaskEvent::Removed { task, reason } => {
                            let reason = *reason;
                            self.invoke_raw(id, env, |b, ctx| b.on_task_removed(task, reason, ctx));
                        }
                    }
                }
                report.task_events.push(event);
            }
        }
    }
}
