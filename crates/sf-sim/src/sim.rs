//! The `Sim` struct and its tick loop.

use sf_agent::{PeerView, PlaneState};
use sf_behavior::{Behavior, BehaviorSet, StepEnv, StepReport};
use sf_core::{IdAllocator, PlaneId, Point, SimClock, SimConfig, Task, TaskId, Tick};
use tracing::{debug, info};

use crate::{Channel, SimObserver, SimResult, TaskLedger, TickStats};

/// The main simulation runner.
///
/// Planes live in a `Vec<PlaneState>` indexed by `PlaneId`, with their
/// behavior sets in a parallel `Vec<BehaviorSet>`.  Keeping the two apart
/// lets one plane's behaviors hold `&mut` to that plane while every other
/// plane stays readable through a [`PeerView`].
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (total ticks, seed, snapshot interval).
    pub config: SimConfig,

    /// Simulation clock.
    pub clock: SimClock,

    planes:    Vec<PlaneState>,
    behaviors: Vec<BehaviorSet>,
    channel:   Channel,
    task_ids:  IdAllocator<TaskId>,
    ledger:    TaskLedger,
}

impl std::fmt::Debug for Sim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sim")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("planes", &self.planes.len())
            .finish_non_exhaustive()
    }
}

impl Sim {
    pub(crate) fn new(config: SimConfig, planes: Vec<PlaneState>, behaviors: Vec<BehaviorSet>) -> Self {
        let channel = Channel::new(&planes);
        Self {
            config,
            clock: SimClock::new(),
            planes,
            behaviors,
            channel,
            task_ids: IdAllocator::new(),
            ledger: TaskLedger::default(),
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(planes = self.planes.len(), ticks = self.config.total_ticks, "simulation starting");
        while self.clock.current_tick < self.config.end_tick() {
            self.tick(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        info!(tick = %self.clock.current_tick, ledger = ?self.ledger, "simulation finished");
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.tick(observer);
        }
        Ok(())
    }

    /// Create a task at `location` owned by `owner`.
    ///
    /// The owner's behaviors hear about it right away, before the next tick.
    pub fn spawn_task(&mut self, owner: PlaneId, location: Point) -> SimResult<TaskId> {
        if owner.index() >= self.planes.len() {
            return Err(sf_core::CoreError::PlaneNotFound(owner).into());
        }
        let id = self.task_ids.allocate()?;
        let now = self.clock.current_tick;
        let task = Task::new(id, location, now);

        let Some((me, peers)) = PeerView::split(&mut self.planes, owner) else {
            return Err(sf_core::CoreError::PlaneNotFound(owner).into());
        };
        me.add_task(task);
        let mut outbox = Vec::new();
        let report = {
            let mut env = StepEnv { tick: now, plane: me, peers: &peers, outbox: &mut outbox };
            self.behaviors[owner.index()].notify(&mut env)
        };
        self.ledger.spawned += 1;
        self.absorb(&report);
        self.channel.route(outbox);
        debug!(task = %id, %owner, %location, "task spawned");
        Ok(id)
    }

    // ── Inspection ────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn planes(&self) -> &[PlaneState] {
        &self.planes
    }

    pub fn plane(&self, id: PlaneId) -> Option<&PlaneState> {
        self.planes.get(id.index())
    }

    /// Direct mutable access, for scenario scripting between ticks.
    pub fn plane_mut(&mut self, id: PlaneId) -> Option<&mut PlaneState> {
        self.planes.get_mut(id.index())
    }

    pub fn behaviors(&self, id: PlaneId) -> Option<&BehaviorSet> {
        self.behaviors.get(id.index())
    }

    /// The behavior of type `T` attached to `plane`.
    pub fn behavior<T: Behavior>(&self, plane: PlaneId) -> Option<&T> {
        self.behaviors.get(plane.index())?.get::<T>()
    }

    pub fn ledger(&self) -> &TaskLedger {
        &self.ledger
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Every `(owner, task)` pair, by owner then acquisition order.
    pub fn owned_tasks(&self) -> Vec<(PlaneId, TaskId)> {
        self.planes
            .iter()
            .flat_map(|p| p.tasks().iter().map(move |t| (p.id, t.id)))
            .collect()
    }

    /// Tasks inside undelivered hand-offs.
    pub fn tasks_in_flight(&self) -> Vec<TaskId> {
        self.channel.tasks_in_flight()
    }

    /// The plane currently owning `task`.
    pub fn owner_of(&self, task: TaskId) -> Option<PlaneId> {
        self.planes.iter().find(|p| p.owns(task)).map(|p| p.id)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn tick<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let stats = self.process_tick(now);
        observer.on_tick_end(now, &stats);
        if self.config.snapshot_due(now) {
            observer.on_snapshot(now, &self.planes);
        }
        self.clock.advance();
    }

    fn process_tick(&mut self, now: Tick) -> TickStats {
        // ── Phase 1: freeze positions for range checks ────────────────────
        self.channel.begin_tick(&self.planes);

        let mut stats = TickStats { tick: now, ..TickStats::default() };

        // ── Phase 2: one pass per plane, registration order ───────────────
        for i in 0..self.planes.len() {
            let id = self.planes[i].id;
            let inbox = self.channel.take_inbox(id);
            let mut outbox = Vec::new();

            let Some((me, peers)) = PeerView::split(&mut self.planes, id) else { continue };
            let report = {
                let mut env = StepEnv { tick: now, plane: me, peers: &peers, outbox: &mut outbox };
                self.behaviors[i].step(&mut env, inbox)
            };
            self.absorb(&report);
            stats.unhandled += report.unhandled;

            // Later planes hear this plane in the same tick.
            let routed = self.channel.route(outbox);
            self.ledger.returned += routed.returned;
            stats.routing.absorb(routed);
        }

        // ── Phase 3: report ───────────────────────────────────────────────
        stats.owned_tasks = self.planes.iter().map(PlaneState::task_count).sum();
        stats.in_flight = self.channel.tasks_in_flight().len();
        stats.ledger = self.ledger;
        stats
    }

    fn absorb(&mut self, report: &StepReport) {
        for event in &report.task_events {
            self.ledger.record(event);
        }
    }
}
